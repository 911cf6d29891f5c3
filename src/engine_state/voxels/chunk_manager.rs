//! # Chunk Manager Module
//!
//! This module provides the `ChunkManager`, which owns every loaded chunk and
//! routes world-space block operations to the chunk that holds them.
//!
//! ## Bounds
//!
//! Only chunks inside the configured [`ChunkBounds`] ever exist. Requests for
//! anything outside the bounds, or for a chunk that is not loaded, are answered
//! with `None`/`false` instead of generating or panicking.

use std::collections::HashMap;

use log::{debug, info};

use super::block::block_type::BlockType;
use super::block::{Block, BlockPos};
use super::chunk::terrain_generation::TerrainGenerator;
use super::chunk::{Chunk, ChunkCoord};

/// Inclusive range of chunk coordinates that may be loaded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl ChunkBounds {
    pub const fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Self {
        ChunkBounds {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        (self.min_x..=self.max_x).contains(&coord.x) && (self.min_z..=self.max_z).contains(&coord.z)
    }

    /// Every coordinate inside the bounds, row by row.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        (self.min_x..=self.max_x)
            .flat_map(move |x| (self.min_z..=self.max_z).map(move |z| ChunkCoord::new(x, z)))
    }
}

/// Owns the loaded chunks of a world.
pub struct ChunkManager {
    chunks: HashMap<ChunkCoord, Chunk>,
    bounds: ChunkBounds,
    generator: TerrainGenerator,
}

impl ChunkManager {
    /// Creates a manager with no chunks loaded.
    ///
    /// # Arguments
    /// * `bounds` - The chunk range that may ever be loaded
    /// * `generator` - Fills chunks on their first load
    pub fn new(bounds: ChunkBounds, generator: TerrainGenerator) -> Self {
        ChunkManager {
            chunks: HashMap::new(),
            bounds,
            generator,
        }
    }

    pub fn bounds(&self) -> ChunkBounds {
        self.bounds
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    /// Loads and generates the chunk at `coord` if it is not loaded yet.
    ///
    /// # Returns
    /// `true` if a new chunk was generated, `false` if it was already loaded or
    /// lies outside the bounds.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> bool {
        if !self.bounds.contains(coord) || self.chunks.contains_key(&coord) {
            return false;
        }

        let chunk = self.generator.generate(coord);
        self.chunks.insert(coord, chunk);
        debug!(
            "Loaded chunk ({}, {}) (Total loaded: {})",
            coord.x,
            coord.z,
            self.chunks.len()
        );
        true
    }

    /// Loads every chunk inside the bounds.
    pub fn load_all(&mut self) -> usize {
        let coords: Vec<ChunkCoord> = self.bounds.coords().collect();
        let loaded = coords.into_iter().filter(|coord| self.load_chunk(*coord)).count();
        info!("Loaded all {} chunks inside the world bounds", loaded);
        loaded
    }

    /// Installs an already built chunk, replacing any loaded one at its coordinate.
    ///
    /// # Returns
    /// `false` if the chunk lies outside the bounds.
    pub fn insert_chunk(&mut self, chunk: Chunk) -> bool {
        if !self.bounds.contains(chunk.coord) {
            return false;
        }
        self.chunks.insert(chunk.coord, chunk);
        true
    }

    /// Drops a chunk and everything written into it.
    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> bool {
        let removed = self.chunks.remove(&coord).is_some();
        if removed {
            debug!("Unloaded chunk ({}, {})", coord.x, coord.z);
        }
        removed
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn get_chunk_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Iterates over the loaded chunks in no particular order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Coordinates of the loaded chunks, sorted.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort();
        coords
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    fn chunk_for(&self, pos: BlockPos) -> Option<&Chunk> {
        self.chunks.get(&ChunkCoord::containing(pos.x, pos.z))
    }

    fn chunk_for_mut(&mut self, pos: BlockPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&ChunkCoord::containing(pos.x, pos.z))
    }

    /// Whether a block at `pos` would live in a loaded chunk.
    pub fn is_loaded_position(&self, pos: BlockPos) -> bool {
        self.chunk_for(pos).is_some_and(|chunk| chunk.contains(pos))
    }

    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        self.chunk_for(pos)?.get_block(pos)
    }

    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.chunk_for(pos).is_some_and(|chunk| chunk.is_solid(pos))
    }

    /// Writes a block type. `false` if no loaded chunk holds the position.
    pub fn set_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        self.chunk_for_mut(pos)
            .is_some_and(|chunk| chunk.set_block(pos, block_type))
    }

    /// Places a block into an empty or air cell of a loaded chunk.
    pub fn add_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        self.chunk_for_mut(pos)
            .is_some_and(|chunk| chunk.add_block(pos, block_type))
    }

    /// Turns a non-air block of a loaded chunk into air.
    pub fn remove_block(&mut self, pos: BlockPos) -> bool {
        self.chunk_for_mut(pos)
            .is_some_and(|chunk| chunk.remove_block(pos))
    }

    /// Whether any loaded chunk changed since its last rebuild.
    pub fn any_needs_rebuild(&self) -> bool {
        self.chunks.values().any(Chunk::needs_rebuild)
    }

    pub fn mark_all_rebuilt(&mut self) {
        for chunk in self.chunks.values_mut() {
            chunk.mark_rebuilt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::chunk::terrain_generation::WorldShape;

    fn manager(shape: WorldShape) -> ChunkManager {
        let bounds = ChunkBounds::new(0, 3, 0, 3);
        ChunkManager::new(bounds, TerrainGenerator::new(shape, 42, bounds, 1.0))
    }

    #[test]
    fn chunks_outside_the_bounds_are_never_loaded() {
        let mut manager = manager(WorldShape::Flat);
        assert!(!manager.load_chunk(ChunkCoord::new(-1, 0)));
        assert!(!manager.load_chunk(ChunkCoord::new(0, 4)));
        assert_eq!(manager.loaded_count(), 0);
    }

    #[test]
    fn loading_twice_generates_once() {
        let mut manager = manager(WorldShape::Flat);
        assert!(manager.load_chunk(ChunkCoord::new(1, 1)));
        assert!(manager.set_block(BlockPos::new(20, 10, 20), BlockType::STONE));
        assert!(!manager.load_chunk(ChunkCoord::new(1, 1)));
        assert_eq!(
            manager.get_block(BlockPos::new(20, 10, 20)).map(|b| b.block_type),
            Some(BlockType::STONE)
        );
    }

    #[test]
    fn block_operations_need_a_loaded_chunk() {
        let mut manager = manager(WorldShape::Flat);
        let pos = BlockPos::new(5, 100, 5);
        assert!(!manager.add_block(pos, BlockType::DIRT));
        assert!(manager.get_block(pos).is_none());
        assert!(!manager.is_solid(pos));

        manager.load_chunk(ChunkCoord::new(0, 0));
        assert!(manager.add_block(pos, BlockType::DIRT));
        assert!(manager.is_solid(pos));
        assert!(manager.remove_block(pos));
        assert!(!manager.remove_block(pos));
    }

    #[test]
    fn negative_positions_route_to_no_chunk() {
        let mut manager = manager(WorldShape::Flat);
        manager.load_all();
        assert!(!manager.set_block(BlockPos::new(-1, 4, 0), BlockType::DIRT));
        assert!(manager.get_block(BlockPos::new(0, 4, -1)).is_none());
    }

    #[test]
    fn rebuild_flags_aggregate_over_chunks() {
        let mut manager = manager(WorldShape::Flat);
        assert_eq!(manager.load_all(), 16);
        assert!(manager.any_needs_rebuild());
        manager.mark_all_rebuilt();
        assert!(!manager.any_needs_rebuild());

        manager.set_block(BlockPos::new(40, 9, 40), BlockType::STONE);
        assert!(manager.any_needs_rebuild());
    }

    #[test]
    fn inserted_chunks_skip_generation() {
        let mut manager = manager(WorldShape::Flat);
        assert!(manager.insert_chunk(Chunk::new(ChunkCoord::new(0, 0))));
        assert!(!manager.insert_chunk(Chunk::new(ChunkCoord::new(9, 0))));
        assert!(manager.get_block(BlockPos::new(0, 0, 0)).is_none());
        assert!(!manager.load_chunk(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn unload_forgets_changes() {
        let mut manager = manager(WorldShape::Island);
        let coord = ChunkCoord::new(2, 2);
        manager.load_chunk(coord);
        let pos = BlockPos::new(32, 10, 32);
        manager.set_block(pos, BlockType::WOOD_PLANK);

        assert!(manager.unload_chunk(coord));
        assert!(!manager.unload_chunk(coord));
        assert!(manager.get_block(pos).is_none());
    }
}
