//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel world.
//! It includes block type definitions, block face geometry, atlas lookup, and
//! the plain value types used to address and describe single blocks.

use cgmath::Point3;

use block_type::BlockType;

pub mod atlas;
pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block type ids.
/// This is the value written into every vertex for material lookup.
pub type BlockTypeSize = u8;

/// Integer world position of a block, used as the key of every block map.
///
/// Ordering is lexicographic on `(x, y, z)`, which is what gives the visible
/// face cache its stable order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        BlockPos { x, y, z }
    }

    /// Returns the position shifted by the given offset.
    pub fn offset(self, offset: [i32; 3]) -> Self {
        BlockPos::new(self.x + offset[0], self.y + offset[1], self.z + offset[2])
    }

    /// The minimum corner of the block's unit cell in world space.
    pub fn to_f32(self) -> Point3<f32> {
        Point3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// The block containing a world-space point.
    pub fn containing(point: Point3<f32>) -> Self {
        BlockPos::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }
}

impl From<Point3<i32>> for BlockPos {
    fn from(point: Point3<i32>) -> Self {
        BlockPos::new(point.x, point.y, point.z)
    }
}

impl From<BlockPos> for Point3<i32> {
    fn from(pos: BlockPos) -> Self {
        Point3::new(pos.x, pos.y, pos.z)
    }
}

/// Represents a single voxel block in the world.
///
/// Blocks are plain values: lookups hand out copies, and the only way to
/// change a stored block is through the owning chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Where the block lives. Never changes after creation.
    pub position: BlockPos,
    /// What the block is made of.
    pub block_type: BlockType,
}

impl Block {
    /// Creates a new block of the specified type.
    ///
    /// # Arguments
    /// * `position` - World position of the block
    /// * `block_type` - The type of block to create
    pub fn new(position: BlockPos, block_type: BlockType) -> Self {
        Block {
            position,
            block_type,
        }
    }

    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::AIR
    }

    pub fn is_solid(&self) -> bool {
        self.block_type.is_solid()
    }

    pub fn is_transparent(&self) -> bool {
        self.block_type.is_transparent()
    }
}
