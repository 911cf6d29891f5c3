//! Vertex data structures and layouts for voxel rendering.
//!
//! This module defines the vertex format shared by the opaque and transparent
//! block streams and the matching buffer layout for the render pipeline.

use cgmath::Point3;

/// A vertex in the voxel rendering pipeline.
///
/// Every field is `f32` so the whole vertex can be handed to the GPU as one
/// flat float buffer.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Block Type Id: f32 (4 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Face Local Coordinates: [f32; 2] (8 bytes)
/// - Ambient Occlusion: f32 (4 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// UV texture coordinates inside the atlas (normalized 0.0-1.0)
    pub tex_coords: [f32; 2],
    /// Block type id, for per-material shading
    pub block_type_id: f32,
    /// Outward face normal
    pub normal: [f32; 3],
    /// Position within the face, (0,0) to (1,1)
    pub face_local: [f32; 2],
    /// Ambient occlusion weight, 0.0 (lit) to 0.5 (dark)
    pub ao: f32,
}

/// Number of floats in one vertex.
pub const FLOATS_PER_VERTEX: usize = std::mem::size_of::<Vertex>() / std::mem::size_of::<f32>();

impl Vertex {
    /// Creates a new vertex with the given parameters.
    ///
    /// # Arguments
    /// * `pos` - The 3D position of the vertex in world space
    /// * `tex_coords` - Atlas UV of this corner
    /// * `block_type_id` - Stable id of the block type
    /// * `normal` - Outward normal of the face
    /// * `face_local` - Corner position within the face
    /// * `ao` - Ambient occlusion weight of the corner
    pub fn new(
        pos: Point3<f32>,
        tex_coords: [f32; 2],
        block_type_id: u8,
        normal: [f32; 3],
        face_local: [f32; 2],
        ao: f32,
    ) -> Self {
        Vertex {
            position: [pos.x, pos.y, pos.z],
            tex_coords,
            block_type_id: block_type_id as f32,
            normal,
            face_local,
            ao,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: block_type_id (f32)
    /// - `location = 3`: normal (vec3<f32>)
    /// - `location = 4`: face_local (vec2<f32>)
    /// - `location = 5`: ao (f32)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 9]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 11]>() as wgpu::BufferAddress,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_twelve_floats() {
        assert_eq!(FLOATS_PER_VERTEX, 12);
        assert_eq!(std::mem::size_of::<Vertex>(), 48);
    }

    #[test]
    fn layout_matches_struct() {
        let layout = Vertex::desc();
        assert_eq!(layout.array_stride, 48);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 20, 24, 36, 44]);
    }

    #[test]
    fn fields_cast_in_declaration_order() {
        let vertex = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            [0.25, 0.5],
            7,
            [0.0, 1.0, 0.0],
            [1.0, 0.0],
            0.1,
        );
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&vertex));
        assert_eq!(
            floats,
            &[1.0, 2.0, 3.0, 0.25, 0.5, 7.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.1]
        );
    }
}
