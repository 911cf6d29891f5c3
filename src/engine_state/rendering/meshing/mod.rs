//! Mesh generation and management for voxel rendering.
//!
//! This module turns the world's visible faces into two streams of geometry:
//! 1. Opaque faces, rebuilt only when the world's face cache changed
//! 2. Transparent faces (water, leaves), re-sorted back to front every frame
//!
//! # Architecture
//! - `MeshManager`: owns both streams and decides when to rebuild them
//! - `mesh/`: face shading and vertex/index list construction
//!
//! # Performance Considerations
//! - Opaque buffers are only regenerated for a new face cache generation
//! - Ambient occlusion for transparent faces is computed at rebuild time, so
//!   the per-frame sort never queries the world

use cgmath::Point3;
use log::{debug, info};

mod mesh;

pub use mesh::*;

use crate::engine_state::{
    buffer_state::{
        BufferWriteCommand, OPAQUE_INDEX_BUFFER, OPAQUE_VERTEX_BUFFER, TRANSPARENT_INDEX_BUFFER,
        TRANSPARENT_VERTEX_BUFFER,
    },
    voxels::world::World,
};

/// Central manager for block mesh generation.
///
/// The `MeshManager` is responsible for:
/// - Splitting visible faces into opaque and transparent streams
/// - Rebuilding both when the world's face cache generation moves
/// - Ordering transparent faces farthest first for blending
/// - Generating buffer write commands for the render backend
#[derive(Debug, Default)]
pub struct MeshManager {
    opaque: MeshBuffers,
    transparent_faces: Vec<ShadedFace>,
    transparent: MeshBuffers,
    /// Face cache generation the meshes were built from
    built_generation: Option<u64>,
}

impl MeshManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the meshes are older than the world's face cache.
    pub fn needs_rebuild(&self, world: &World) -> bool {
        self.built_generation != Some(world.generation())
    }

    /// Rebuilds the meshes if the world's face cache generation changed.
    ///
    /// # Returns
    /// The opaque buffer writes if a rebuild happened, `None` otherwise.
    pub fn rebuild_if_changed(&mut self, world: &World) -> Option<Vec<BufferWriteCommand>> {
        if self.needs_rebuild(world) {
            Some(self.rebuild(world))
        } else {
            None
        }
    }

    /// Rebuilds both streams from the world's cached visible faces.
    ///
    /// Transparent faces keep cache order until the next [`MeshManager::sort_transparent`].
    ///
    /// # Returns
    /// Buffer writes for the opaque stream.
    pub fn rebuild(&mut self, world: &World) -> Vec<BufferWriteCommand> {
        self.opaque.clear();
        self.transparent_faces.clear();

        for face in world.cached_visible_faces() {
            let shaded = ShadedFace::shade(world, face);
            if face.block.is_transparent() {
                self.transparent_faces.push(shaded);
            } else {
                self.opaque.push_face(&shaded);
            }
        }
        self.transparent = MeshBuffers::from_faces(&self.transparent_faces);
        self.built_generation = Some(world.generation());

        info!(
            "Rebuilt meshes for generation {}: {} opaque faces, {} transparent faces",
            world.generation(),
            self.opaque.face_count(),
            self.transparent_faces.len()
        );

        self.opaque
            .write_commands(OPAQUE_VERTEX_BUFFER, OPAQUE_INDEX_BUFFER)
    }

    /// Orders transparent faces farthest first from `camera` and regenerates
    /// the transparent stream.
    ///
    /// # Returns
    /// Buffer writes for the transparent stream.
    pub fn sort_transparent(&mut self, camera: Point3<f32>) -> Vec<BufferWriteCommand> {
        self.transparent_faces.sort_by(|a, b| {
            b.squared_distance_to(camera)
                .total_cmp(&a.squared_distance_to(camera))
        });
        self.transparent = MeshBuffers::from_faces(&self.transparent_faces);
        debug!(
            "Sorted {} transparent faces back to front",
            self.transparent_faces.len()
        );

        self.transparent
            .write_commands(TRANSPARENT_VERTEX_BUFFER, TRANSPARENT_INDEX_BUFFER)
    }

    pub fn opaque(&self) -> &MeshBuffers {
        &self.opaque
    }

    pub fn transparent(&self) -> &MeshBuffers {
        &self.transparent
    }

    /// Transparent faces in their current draw order.
    pub fn transparent_faces(&self) -> &[ShadedFace] {
        &self.transparent_faces
    }

    pub fn built_generation(&self) -> Option<u64> {
        self.built_generation
    }
}
