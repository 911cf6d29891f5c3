//! Rendering data for the voxel engine.
//!
//! This module owns everything the engine hands to a render backend: the
//! packed vertex format with its `wgpu` layout, and the mesh manager that
//! turns visible faces into opaque and transparent vertex/index streams.
//! Drawing itself is left to the backend that consumes the buffer writes.

pub mod meshing;
mod vertex;

// Re-export commonly used types
pub use meshing::MeshManager;
pub use vertex::{Vertex, FLOATS_PER_VERTEX};
