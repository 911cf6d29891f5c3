//! # Visibility Module
//!
//! Pure functions deciding which block faces can be seen and how dark each
//! face corner is. Both work against any [`BlockLookup`], so the same rules
//! serve the world cache, the mesh builder and tests.
//!
//! ## Face rule
//!
//! A face is hidden only by a neighbour that covers it:
//! - nothing or air next to it: visible
//! - the same block type: hidden (no seams inside a lake or a canopy)
//! - opaque block, transparent neighbour: visible
//! - transparent block, opaque neighbour: hidden
//! - two different transparent blocks: visible
//! - two different opaque blocks: hidden

use super::block::block_side::BlockSide;
use super::block::{Block, BlockPos};

/// Occlusion when both edge neighbours of a vertex are solid.
pub const AO_BOTH_EDGES: f32 = 0.5;
/// Occlusion when exactly one edge neighbour is solid.
pub const AO_ONE_EDGE: f32 = 0.25;
/// Occlusion when only the diagonal neighbour is solid.
pub const AO_CORNER_ONLY: f32 = 0.1;

/// Read access to blocks by world position.
pub trait BlockLookup {
    /// Returns a copy of the block at `pos`, if one was ever placed there.
    fn block_at(&self, pos: BlockPos) -> Option<Block>;

    /// Whether `pos` holds a solid block. Empty cells are not solid.
    fn is_solid_at(&self, pos: BlockPos) -> bool {
        self.block_at(pos).is_some_and(|block| block.is_solid())
    }
}

impl BlockLookup for std::collections::HashMap<BlockPos, Block> {
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.get(&pos).copied()
    }
}

/// Decides whether the given face of `block` can be seen.
///
/// # Arguments
/// * `lookup` - Source of neighbouring blocks
/// * `block` - The block owning the face
/// * `side` - Which face to test
pub fn is_face_visible<L: BlockLookup + ?Sized>(lookup: &L, block: &Block, side: BlockSide) -> bool {
    let neighbor = match lookup.block_at(block.position.offset(side.neighbor_offset())) {
        Some(neighbor) if !neighbor.is_air() => neighbor,
        _ => return true,
    };

    if neighbor.block_type == block.block_type {
        return false;
    }

    match (block.is_transparent(), neighbor.is_transparent()) {
        (false, true) => true,
        (true, false) => false,
        (true, true) => true,
        (false, false) => false,
    }
}

/// Ambient occlusion weight of one face vertex, from 0.0 (lit) to 0.5 (dark).
///
/// # Arguments
/// * `vertex` - Vertex index 0..4 in corner-table order
pub fn vertex_ao<L: BlockLookup + ?Sized>(
    lookup: &L,
    block: &Block,
    side: BlockSide,
    vertex: usize,
) -> f32 {
    let [edge_a, edge_b, corner] = side.geometry().ao_probes[vertex];
    let solid = |offset: [i32; 3]| lookup.is_solid_at(block.position.offset(offset));

    match (solid(edge_a), solid(edge_b)) {
        (true, true) => AO_BOTH_EDGES,
        (true, false) | (false, true) => AO_ONE_EDGE,
        (false, false) if solid(corner) => AO_CORNER_ONLY,
        (false, false) => 0.0,
    }
}

/// Ambient occlusion weights of all four vertices of a face.
pub fn face_ao<L: BlockLookup + ?Sized>(lookup: &L, block: &Block, side: BlockSide) -> [f32; 4] {
    std::array::from_fn(|vertex| vertex_ao(lookup, block, side, vertex))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn lookup(blocks: &[(i32, i32, i32, BlockType)]) -> HashMap<BlockPos, Block> {
        blocks
            .iter()
            .map(|&(x, y, z, block_type)| {
                let pos = BlockPos::new(x, y, z);
                (pos, Block::new(pos, block_type))
            })
            .collect()
    }

    fn visible(blocks: &HashMap<BlockPos, Block>, at: (i32, i32, i32), side: BlockSide) -> bool {
        let block = blocks[&BlockPos::new(at.0, at.1, at.2)];
        is_face_visible(blocks, &block, side)
    }

    #[test]
    fn lone_block_shows_all_faces() {
        let blocks = lookup(&[(0, 0, 0, BlockType::STONE), (0, 0, 1, BlockType::AIR)]);
        for side in BlockSide::all() {
            assert!(visible(&blocks, (0, 0, 0), side), "{side:?}");
        }
    }

    #[test]
    fn stone_next_to_water() {
        let blocks = lookup(&[(0, 0, 0, BlockType::STONE), (1, 0, 0, BlockType::WATER)]);
        assert!(visible(&blocks, (0, 0, 0), BlockSide::RIGHT));
        assert!(!visible(&blocks, (1, 0, 0), BlockSide::LEFT));
    }

    #[test]
    fn identical_neighbours_hide_each_other() {
        let blocks = lookup(&[(0, 0, 0, BlockType::WATER), (0, 0, 1, BlockType::WATER)]);
        assert!(!visible(&blocks, (0, 0, 0), BlockSide::FRONT));
        assert!(!visible(&blocks, (0, 0, 1), BlockSide::BACK));
    }

    #[test]
    fn different_transparent_blocks_show_both_faces() {
        let blocks = lookup(&[(0, 0, 0, BlockType::LEAVES), (0, 1, 0, BlockType::WATER)]);
        assert!(visible(&blocks, (0, 0, 0), BlockSide::TOP));
        assert!(visible(&blocks, (0, 1, 0), BlockSide::BOTTOM));
    }

    #[test]
    fn different_opaque_blocks_hide_each_other() {
        let blocks = lookup(&[(0, 0, 0, BlockType::DIRT), (0, 1, 0, BlockType::GRASS)]);
        assert!(!visible(&blocks, (0, 0, 0), BlockSide::TOP));
        assert!(!visible(&blocks, (0, 1, 0), BlockSide::BOTTOM));
    }

    #[test]
    fn ao_levels_follow_edge_and_corner_probes() {
        let center = Block::new(BlockPos::new(0, 0, 0), BlockType::STONE);

        let none = lookup(&[]);
        assert_eq!(vertex_ao(&none, &center, BlockSide::TOP, 0), 0.0);

        // Vertex 0 of the top face probes (-1,1,0), (0,1,1) and (-1,1,1).
        let corner = lookup(&[(-1, 1, 1, BlockType::STONE)]);
        assert_eq!(vertex_ao(&corner, &center, BlockSide::TOP, 0), AO_CORNER_ONLY);

        let one_edge = lookup(&[(-1, 1, 0, BlockType::STONE), (-1, 1, 1, BlockType::STONE)]);
        assert_eq!(vertex_ao(&one_edge, &center, BlockSide::TOP, 0), AO_ONE_EDGE);

        let both = lookup(&[(-1, 1, 0, BlockType::DIRT), (0, 1, 1, BlockType::LEAVES)]);
        assert_eq!(vertex_ao(&both, &center, BlockSide::TOP, 0), AO_BOTH_EDGES);
    }

    #[test]
    fn water_does_not_occlude() {
        let center = Block::new(BlockPos::new(0, 0, 0), BlockType::STONE);
        let water = lookup(&[(-1, 1, 0, BlockType::WATER), (0, 1, 1, BlockType::WATER)]);
        assert_eq!(face_ao(&water, &center, BlockSide::TOP), [0.0; 4]);
    }

    #[test]
    fn face_ao_reports_each_vertex() {
        let center = Block::new(BlockPos::new(0, 0, 0), BlockType::STONE);
        // Blocks the +X edge above the top face: vertices 1 and 2 darken.
        let wall = lookup(&[(1, 1, 0, BlockType::STONE)]);
        assert_eq!(face_ao(&wall, &center, BlockSide::TOP), [0.0, AO_ONE_EDGE, AO_ONE_EDGE, 0.0]);
    }
}
