//! Mesh data structures and operations for voxel rendering.
//!
//! This module provides the CPU-side vertex and index lists a stream of block
//! faces is turned into before it is handed to the render backend.

use crate::engine_state::buffer_state::BufferWriteCommand;
use crate::engine_state::rendering::Vertex;

use super::face::ShadedFace;

/// Index pattern of one face: two triangles over four vertices.
pub const FACE_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Vertex and index lists for one stream of block faces.
#[derive(Debug, Default, Clone)]
pub struct MeshBuffers {
    /// The vertex data, four vertices per face
    pub vertices: Vec<Vertex>,
    /// The index data, six indices per face
    pub indices: Vec<u32>,
}

impl MeshBuffers {
    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds buffers from faces in the given order.
    pub fn from_faces<'a>(faces: impl IntoIterator<Item = &'a ShadedFace>) -> Self {
        let mut mesh = MeshBuffers::new();
        for face in faces {
            mesh.push_face(face);
        }
        mesh
    }

    /// Appends one face, offsetting its indices past the existing vertices.
    pub fn push_face(&mut self, face: &ShadedFace) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&face.vertices());
        self.indices.extend(FACE_INDICES.iter().map(|index| base + index));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Commands replacing the named vertex and index buffers with this mesh.
    pub fn write_commands(
        &self,
        vertex_buffer: &'static str,
        index_buffer: &'static str,
    ) -> Vec<BufferWriteCommand> {
        vec![
            BufferWriteCommand::replace(
                format!("{vertex_buffer} ({} faces)", self.face_count()),
                vertex_buffer,
                self.vertices.clone(),
            ),
            BufferWriteCommand::replace(
                format!("{index_buffer} ({} faces)", self.face_count()),
                index_buffer,
                self.indices.clone(),
            ),
        ]
    }
}
