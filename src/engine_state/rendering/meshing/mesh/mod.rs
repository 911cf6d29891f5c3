//! Mesh generation for voxel rendering.
//!
//! - [`ShadedFace`]: a visible face with its per-vertex occlusion
//! - [`MeshBuffers`]: vertex and index lists built from a sequence of faces

mod face;
mod mesh;

pub use face::ShadedFace;
pub use mesh::*;
