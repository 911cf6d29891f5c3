//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 16x16 columns of voxel data that span the full world height. It also hosts the
//! terrain and tree generators that fill a chunk the first time it is loaded.
//!
//! ## Storage
//!
//! Chunks keep two views of the same data:
//! - `blocks`: a sparse map from world position to block, holding every block that
//!   was ever written (broken blocks stay as `AIR` entries)
//! - `solid_array`: a bit vector (1 bit per cell of the column) mirroring which
//!   cells hold a solid block
//!
//! ### Performance Characteristics
//! - **Solidity Check**: O(1), a single bit lookup
//! - **Block Lookup**: O(1) average, a hash map lookup
//! - **Memory Usage**: 8 KiB of solidity bits per chunk + one map entry per written block

use std::collections::HashMap;

use bitvec::prelude::BitVec;

use super::block::block_type::BlockType;
use super::block::{Block, BlockPos};

pub mod terrain_generation;
pub mod tree_generation;

/// The horizontal dimension (width and depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// Number of vertical cells in every chunk column.
pub const WORLD_HEIGHT: i32 = 256;
/// The number of cells in one horizontal layer of a chunk.
pub const CHUNK_PLANE_SIZE: usize = (CHUNK_DIMENSION * CHUNK_DIMENSION) as usize;
/// The total number of cells in a chunk.
pub const CHUNK_SIZE: usize = CHUNK_PLANE_SIZE * WORLD_HEIGHT as usize;

/// Horizontal position of a chunk, in chunk units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk that owns the given world block column.
    pub fn containing(world_x: i32, world_z: i32) -> Self {
        ChunkCoord::new(world_to_chunk_coord(world_x), world_to_chunk_coord(world_z))
    }

    /// World coordinates of the chunk's minimum corner column.
    pub fn origin(self) -> (i32, i32) {
        (self.x * CHUNK_DIMENSION, self.z * CHUNK_DIMENSION)
    }
}

/// Converts a world block coordinate into the coordinate of its chunk.
///
/// Negative coordinates round toward negative infinity, so -1 lands in chunk -1
/// and -16 in chunk -1 as well.
pub fn world_to_chunk_coord(coordinate: i32) -> i32 {
    if coordinate >= 0 {
        coordinate / CHUNK_DIMENSION
    } else {
        (coordinate + 1) / CHUNK_DIMENSION - 1
    }
}

/// Represents a 16x16 column of voxel blocks spanning the full world height.
///
/// Chunks are the unit of loading and generation. Every block a chunk owns lies
/// inside its column, and every change to a block's type raises `needs_rebuild`
/// until someone calls [`Chunk::mark_rebuilt`].
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub coord: ChunkCoord,

    /// Every block written into this chunk, keyed by world position.
    blocks: HashMap<BlockPos, Block>,

    /// One bit per cell, set when the cell holds a solid block.
    ///
    /// The bits are stored in the order x, then z, then y, relative to the chunk origin.
    solid_array: BitVec,

    /// Raised by every type change, cleared by `mark_rebuilt`.
    needs_rebuild: bool,
}

impl Chunk {
    /// Creates a new, completely empty chunk.
    ///
    /// A fresh chunk starts out needing a rebuild so its first contents are picked up.
    ///
    /// # Arguments
    /// * `coord` - The chunk coordinates of the new chunk
    pub fn new(coord: ChunkCoord) -> Self {
        Chunk {
            coord,
            blocks: HashMap::new(),
            solid_array: BitVec::repeat(false, CHUNK_SIZE),
            needs_rebuild: true,
        }
    }

    /// Whether the world column (x, z) belongs to this chunk.
    pub fn contains_column(&self, world_x: i32, world_z: i32) -> bool {
        let (min_x, min_z) = self.coord.origin();
        (min_x..min_x + CHUNK_DIMENSION).contains(&world_x)
            && (min_z..min_z + CHUNK_DIMENSION).contains(&world_z)
    }

    /// Whether the position lies in this chunk's column and inside the world height.
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.contains_column(pos.x, pos.z) && (0..WORLD_HEIGHT).contains(&pos.y)
    }

    fn solid_index(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let (min_x, min_z) = self.coord.origin();
        let local_x = (pos.x - min_x) as usize;
        let local_z = (pos.z - min_z) as usize;
        Some(local_x + CHUNK_DIMENSION as usize * local_z + CHUNK_PLANE_SIZE * pos.y as usize)
    }

    /// Gets a copy of the block at the specified world position.
    ///
    /// # Returns
    /// `None` if nothing was ever written there or the position is not in this chunk.
    /// Broken blocks come back as `AIR`.
    pub fn get_block(&self, pos: BlockPos) -> Option<Block> {
        self.blocks.get(&pos).copied()
    }

    /// Checks if the cell at the specified world position holds a solid block.
    ///
    /// # Returns
    /// `true` if the block is solid, `false` if it's air, water, empty or out of bounds.
    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.solid_index(pos)
            .map(|index| self.solid_array[index])
            .unwrap_or(false)
    }

    /// Writes a block type into the chunk, creating the slot if needed.
    ///
    /// # Returns
    /// `false` without changing anything if the position lies outside this chunk
    /// or outside the world height.
    pub fn set_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        let Some(index) = self.solid_index(pos) else {
            return false;
        };

        self.blocks
            .entry(pos)
            .and_modify(|block| block.block_type = block_type)
            .or_insert_with(|| Block::new(pos, block_type));
        self.solid_array.set(index, block_type.is_solid());
        self.needs_rebuild = true;
        true
    }

    /// Places a block into an empty or air cell.
    ///
    /// # Returns
    /// `false` if the cell is occupied by a non-air block or lies outside this chunk.
    pub fn add_block(&mut self, pos: BlockPos, block_type: BlockType) -> bool {
        if !self.contains(pos) {
            return false;
        }
        if self.get_block(pos).is_some_and(|block| !block.is_air()) {
            return false;
        }
        self.set_block(pos, block_type)
    }

    /// Turns a non-air block into air. The slot itself is kept.
    ///
    /// # Returns
    /// `false` if there is no block or it is already air.
    pub fn remove_block(&mut self, pos: BlockPos) -> bool {
        match self.get_block(pos) {
            Some(block) if !block.is_air() => self.set_block(pos, BlockType::AIR),
            _ => false,
        }
    }

    /// Iterates over every stored block, air slots included, in no particular order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of stored block slots, air slots included.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    pub fn mark_rebuilt(&mut self) {
        self.needs_rebuild = false;
    }
}
