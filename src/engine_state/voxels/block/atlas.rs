//! # Texture Atlas Module
//!
//! All block faces sample a single 64x48 pixel atlas laid out as a grid of
//! 16 pixel tiles (4 columns, 3 rows). This module names each tile and converts
//! it into normalized UV coordinates.

/// Width of the atlas image in pixels.
pub const ATLAS_WIDTH: f32 = 64.0;
/// Height of the atlas image in pixels.
pub const ATLAS_HEIGHT: f32 = 48.0;
/// Edge length of one tile in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// A named tile in the block atlas.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum AtlasTile {
    GrassSide,
    Dirt,
    GrassTop,
    Stone,
    Leaves,
    LogEnd,
    LogSide,
    Plank,
    Water,
    /// First crack overlay, shown early in a break.
    BreakingLight,
    BreakingMedium,
    /// Last crack overlay before the block disappears.
    BreakingHeavy,
}

/// A normalized rectangle inside the atlas.
///
/// `v1` is the top edge of the tile in image space and `v2` the bottom edge,
/// so `v2 > v1`.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TextureRegion {
    pub u1: f32,
    pub v1: f32,
    pub u2: f32,
    pub v2: f32,
}

impl AtlasTile {
    /// Column and row of the tile in the atlas grid.
    pub fn grid_position(self) -> (u32, u32) {
        match self {
            AtlasTile::GrassSide => (0, 0),
            AtlasTile::Dirt => (1, 0),
            AtlasTile::GrassTop => (2, 0),
            AtlasTile::Stone => (3, 0),
            AtlasTile::Leaves => (0, 1),
            AtlasTile::LogEnd => (1, 1),
            AtlasTile::LogSide => (2, 1),
            AtlasTile::Plank => (3, 1),
            AtlasTile::Water => (0, 2),
            AtlasTile::BreakingLight => (1, 2),
            AtlasTile::BreakingMedium => (2, 2),
            AtlasTile::BreakingHeavy => (3, 2),
        }
    }

    /// Normalized UV rectangle covering this tile.
    pub fn region(self) -> TextureRegion {
        let (column, row) = self.grid_position();
        let (column, row) = (column as f32, row as f32);
        TextureRegion {
            u1: column * TILE_SIZE / ATLAS_WIDTH,
            v1: row * TILE_SIZE / ATLAS_HEIGHT,
            u2: (column + 1.0) * TILE_SIZE / ATLAS_WIDTH,
            v2: (row + 1.0) * TILE_SIZE / ATLAS_HEIGHT,
        }
    }
}

impl TextureRegion {
    /// UV for one of the four face vertices.
    ///
    /// Vertices 1 and 2 sit on the right edge of the tile, vertices 2 and 3 on
    /// the top edge. The top edge of a face maps to `v1` of the tile.
    pub fn vertex_uv(&self, vertex: usize) -> [f32; 2] {
        let u = if vertex == 1 || vertex == 2 { self.u2 } else { self.u1 };
        let v = if vertex == 2 || vertex == 3 { self.v1 } else { self.v2 };
        [u, v]
    }
}
