//! # Voxel Engine Core
//!
//! This module contains the core voxel functionality, providing the foundation
//! for representing, generating and editing a voxel-based world.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, positions, faces and texture atlas tiles
//! * **Chunk**: 16-wide columns of sparse block storage, plus island terrain and trees
//! * **Chunk Manager**: Routes world coordinates to loaded chunks inside fixed bounds
//! * **Visibility**: The face culling rule and per-vertex ambient occlusion
//! * **World**: Owns the chunks, streams them around the player and caches visible faces
//!
//! ## Data Flow
//!
//! 1. World receives requests for block access or modification
//! 2. World delegates to the chunk manager, which routes to the owning chunk
//! 3. Changes mark the visible face cache dirty
//! 4. The next refresh rebuilds the cache and bumps its generation, which
//!    tells the mesh manager to rebuild

pub mod block;
pub mod chunk;
pub mod chunk_manager;
pub mod visibility;
pub mod world;
