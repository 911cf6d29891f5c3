//! # Block Type Module
//!
//! This module defines the closed set of block variants in the voxel world.
//! It provides functionality for id conversion, solidity and transparency
//! classification, and per-face atlas tile lookup.

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::{atlas::AtlasTile, block_side::BlockSide, BlockTypeSize};

/// Enumerates all possible block types in the voxel world.
///
/// The discriminant of each variant is its stable id, which is written into
/// every vertex so the shader can look up per-material settings. The
/// `FromPrimitive` derive allows conversion back from that id.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[allow(non_camel_case_types)]
pub enum BlockType {
    /// Empty space. Broken blocks become air, their slot is kept.
    AIR = 0,

    /// Grass with a distinct top, side and bottom texture.
    GRASS = 1,

    /// Plain dirt, the layers directly under grass.
    DIRT = 2,

    /// Cobblestone, the bottom layer of generated terrain.
    STONE = 3,

    /// Tree foliage. Solid for collision and occlusion, but rendered blended.
    LEAVES = 4,

    /// Tree trunk with a ring texture on top and bottom.
    WOOD_LOG = 5,

    /// Planks, the default block placed by the player.
    WOOD_PLANK = 6,

    /// Still water. Neither solid nor opaque.
    WATER = 7,
}

impl BlockType {
    /// Every variant in id order.
    pub const ALL: [BlockType; 8] = [
        BlockType::AIR,
        BlockType::GRASS,
        BlockType::DIRT,
        BlockType::STONE,
        BlockType::LEAVES,
        BlockType::WOOD_LOG,
        BlockType::WOOD_PLANK,
        BlockType::WATER,
    ];

    /// Returns the stable integer id used for shader/material lookup.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Converts an id back into a `BlockType`.
    ///
    /// # Returns
    /// `None` if the id does not name a variant.
    pub fn from_id(id: BlockTypeSize) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// Whether the block stops movement, rays and light. Air and water do not.
    pub fn is_solid(self) -> bool {
        !matches!(self, BlockType::AIR | BlockType::WATER)
    }

    /// Whether the block is drawn in the blended (back-to-front) pass.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::WATER | BlockType::LEAVES)
    }

    /// Gets the atlas tile used for the given face of this block type.
    ///
    /// Grass varies by face (top, sides, bottom) and logs show their rings on
    /// the top and bottom. Every other block uses one tile on all six faces.
    pub fn texture_tile(self, side: BlockSide) -> AtlasTile {
        match self {
            BlockType::GRASS => match side {
                BlockSide::TOP => AtlasTile::GrassTop,
                BlockSide::BOTTOM => AtlasTile::Dirt,
                _ => AtlasTile::GrassSide,
            },
            BlockType::DIRT => AtlasTile::Dirt,
            BlockType::STONE => AtlasTile::Stone,
            BlockType::LEAVES => AtlasTile::Leaves,
            BlockType::WOOD_LOG => match side {
                BlockSide::TOP | BlockSide::BOTTOM => AtlasTile::LogEnd,
                _ => AtlasTile::LogSide,
            },
            BlockType::WOOD_PLANK => AtlasTile::Plank,
            BlockType::WATER => AtlasTile::Water,
            // Air is never meshed, fall back to the first tile.
            BlockType::AIR => AtlasTile::GrassSide,
        }
    }
}
