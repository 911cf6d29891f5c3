//! # World Module
//!
//! This module provides the `World` struct, the single owner of block data and
//! the cache of visible block faces derived from it.
//!
//! ## Visible Face Cache
//!
//! The cache is an ordered list of `(block, face)` pairs that pass the face
//! visibility rule. It is recomputed in full whenever a block was added or
//! removed through the world, or any loaded chunk reports a change. Each
//! recomputation bumps a generation counter so consumers can tell cheaply
//! whether their derived data is stale.
//!
//! ## Streaming
//!
//! Chunks are loaded around the player and unloaded once they drift out of
//! range. Streaming only runs after the player moved a few blocks
//! horizontally, never on every frame.

use log::{debug, info};

use crate::config::{EngineConfig, StreamingConfig};

use super::block::block_side::BlockSide;
use super::block::block_type::BlockType;
use super::block::{Block, BlockPos};
use super::chunk::terrain_generation::TerrainGenerator;
use super::chunk::{world_to_chunk_coord, ChunkCoord};
use super::chunk_manager::ChunkManager;
use super::visibility::{self, BlockLookup};

/// A block face that is not covered by its neighbour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VisibleFace {
    pub block: Block,
    pub side: BlockSide,
}

/// The voxel world: loaded chunks plus the visible face cache built from them.
pub struct World {
    chunk_manager: ChunkManager,
    streaming: StreamingConfig,
    visible_faces: Vec<VisibleFace>,
    faces_dirty: bool,
    generation: u64,
    /// Horizontal position of the last streaming pass.
    stream_anchor: Option<(f32, f32)>,
}

impl BlockLookup for ChunkManager {
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.get_block(pos)
    }

    fn is_solid_at(&self, pos: BlockPos) -> bool {
        self.is_solid(pos)
    }
}

impl BlockLookup for World {
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.chunk_manager.get_block(pos)
    }

    fn is_solid_at(&self, pos: BlockPos) -> bool {
        self.chunk_manager.is_solid(pos)
    }
}

impl World {
    /// Creates a world around an existing chunk manager.
    ///
    /// No chunks are loaded here; call [`World::update_streaming`] or
    /// [`World::load_all_chunks`] first.
    pub fn new(chunk_manager: ChunkManager, streaming: StreamingConfig) -> Self {
        World {
            chunk_manager,
            streaming,
            visible_faces: Vec::new(),
            faces_dirty: true,
            generation: 0,
            stream_anchor: None,
        }
    }

    /// Builds the chunk manager and terrain generator described by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let bounds = config.world.bounds();
        let generator = TerrainGenerator::new(
            config.world.shape,
            config.world.seed,
            bounds,
            config.world.tree_density,
        );
        World::new(ChunkManager::new(bounds, generator), config.streaming.clone())
    }

    pub fn chunk_manager(&self) -> &ChunkManager {
        &self.chunk_manager
    }

    /// Loads every chunk inside the world bounds.
    pub fn load_all_chunks(&mut self) -> usize {
        let loaded = self.chunk_manager.load_all();
        if loaded > 0 {
            self.faces_dirty = true;
        }
        loaded
    }

    /// Loads chunks around `(x, z)` and unloads far ones.
    ///
    /// Does nothing until the position moved at least `update_threshold` blocks
    /// horizontally since the previous pass. The first call always runs.
    ///
    /// # Returns
    /// `true` if a streaming pass ran.
    pub fn update_streaming(&mut self, x: f32, z: f32) -> bool {
        if let Some((last_x, last_z)) = self.stream_anchor {
            let (dx, dz) = (x - last_x, z - last_z);
            let threshold = self.streaming.update_threshold;
            if dx * dx + dz * dz < threshold * threshold {
                return false;
            }
        }
        self.stream_anchor = Some((x, z));

        let center = ChunkCoord::new(
            world_to_chunk_coord(x.floor() as i32),
            world_to_chunk_coord(z.floor() as i32),
        );
        let radius = self.streaming.load_radius;
        let unload_radius = (radius + self.streaming.unload_margin) as f32;
        let distance = |coord: ChunkCoord| {
            let (dx, dz) = ((coord.x - center.x) as f32, (coord.z - center.z) as f32);
            (dx * dx + dz * dz).sqrt()
        };

        let bounds = self.chunk_manager.bounds();
        let mut loaded = 0;
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = ChunkCoord::new(center.x + dx, center.z + dz);
                if distance(coord) > radius as f32 || !bounds.contains(coord) {
                    continue;
                }
                if self.chunk_manager.load_chunk(coord) {
                    loaded += 1;
                }
            }
        }

        let far: Vec<ChunkCoord> = self
            .chunk_manager
            .loaded_coords()
            .into_iter()
            .filter(|coord| distance(*coord) > unload_radius)
            .collect();
        for coord in &far {
            self.chunk_manager.unload_chunk(*coord);
        }

        if loaded > 0 || !far.is_empty() {
            info!(
                "Streaming around chunk ({}, {}): loaded {}, unloaded {}",
                center.x,
                center.z,
                loaded,
                far.len()
            );
            self.faces_dirty = true;
        }
        true
    }

    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        self.chunk_manager.get_block(pos)
    }

    /// Solidity query for physics: true only for a solid block in a loaded chunk.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.chunk_manager.is_solid(BlockPos::new(x, y, z))
    }

    /// Whether `pos` lies inside a loaded chunk and the world height.
    pub fn is_loaded_position(&self, pos: BlockPos) -> bool {
        self.chunk_manager.is_loaded_position(pos)
    }

    /// Places a block into an empty or air cell.
    ///
    /// # Returns
    /// `false` if the cell is occupied or not inside a loaded chunk.
    pub fn add_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        let added = self.chunk_manager.add_block(pos, block_type);
        if added {
            debug!("Added {:?} at {:?}", block_type, pos);
            self.faces_dirty = true;
        }
        added
    }

    /// Turns a block into air.
    ///
    /// # Returns
    /// `false` if there is nothing to remove or the chunk is not loaded.
    pub fn remove_block(&mut self, pos: BlockPos) -> bool {
        let removed = self.chunk_manager.remove_block(pos);
        if removed {
            debug!("Removed block at {:?}", pos);
            self.faces_dirty = true;
        }
        removed
    }

    /// Overwrites whatever is at `pos`.
    pub fn set_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        let set = self.chunk_manager.set_block(pos, block_type);
        if set {
            self.faces_dirty = true;
        }
        set
    }

    /// Forces the next refresh to recompute the visible faces.
    pub fn mark_faces_dirty(&mut self) {
        self.faces_dirty = true;
    }

    /// Whether the cached faces are out of date.
    pub fn needs_refresh(&self) -> bool {
        self.faces_dirty || self.chunk_manager.any_needs_rebuild()
    }

    /// Counter bumped by every recomputation of the visible faces.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Recomputes the visible faces if anything changed.
    ///
    /// # Returns
    /// `true` if the cache was recomputed.
    pub fn refresh_visible_faces(&mut self) -> bool {
        if !self.needs_refresh() {
            return false;
        }

        let mut faces = Vec::new();
        for chunk in self.chunk_manager.loaded_chunks() {
            for block in chunk.blocks().filter(|block| !block.is_air()) {
                for side in BlockSide::all() {
                    if visibility::is_face_visible(&self.chunk_manager, block, side) {
                        faces.push(VisibleFace {
                            block: *block,
                            side,
                        });
                    }
                }
            }
        }
        faces.sort_by_key(|face| (face.block.position, face.side));

        self.visible_faces = faces;
        self.chunk_manager.mark_all_rebuilt();
        self.faces_dirty = false;
        self.generation += 1;

        info!(
            "Recalculated visible faces: {} faces (generation {})",
            self.visible_faces.len(),
            self.generation
        );
        true
    }

    /// The visible faces, ordered by block position then face index.
    ///
    /// Refreshes the cache first if it is out of date.
    pub fn visible_faces(&mut self) -> &[VisibleFace] {
        self.refresh_visible_faces();
        &self.visible_faces
    }

    /// The visible faces as of the last refresh.
    pub fn cached_visible_faces(&self) -> &[VisibleFace] {
        &self.visible_faces
    }
}
