//! # Tree Generation Module
//!
//! Scatters oak trees across the grass surface of a freshly generated chunk.
//! Trees never cross the chunk border: leaves that would land outside the
//! generating chunk are dropped.

use fastrand::Rng;

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::BlockPos;

use super::{Chunk, CHUNK_DIMENSION};

/// Height of the grass surface trees grow from.
pub const GROUND_Y: i32 = 3;
/// Free cells required above the ground block.
pub const TRUNK_CLEARANCE: i32 = 6;
/// Horizontal radius that must be free of other trunks.
pub const TRUNK_SPACING: i32 = 2;
/// Placement attempts per tree before giving up.
pub const ATTEMPTS_PER_TREE: usize = 10;

/// Tries to grow `max(1, 256 * density / 100)` trees in the chunk.
///
/// # Arguments
/// * `chunk` - The chunk to grow trees in
/// * `density` - Trees per 100 columns
/// * `rng` - The chunk's seeded generator
///
/// # Returns
/// The number of trees actually grown.
pub fn generate_random_trees(chunk: &mut Chunk, density: f32, rng: &mut Rng) -> usize {
    let columns = (CHUNK_DIMENSION * CHUNK_DIMENSION) as f32;
    let target = ((columns * density / 100.0) as usize).max(1);
    let max_attempts = target * ATTEMPTS_PER_TREE;

    let mut generated = 0;
    let mut attempts = 0;
    while generated < target && attempts < max_attempts {
        attempts += 1;

        let local_x = rng.i32(0..CHUNK_DIMENSION);
        let local_z = rng.i32(0..CHUNK_DIMENSION);
        let (min_x, min_z) = chunk.coord.origin();
        let (world_x, world_z) = (min_x + local_x, min_z + local_z);

        if can_place_tree(chunk, world_x, world_z, GROUND_Y) {
            grow_oak_tree(chunk, world_x, world_z, GROUND_Y, rng);
            generated += 1;
        }
    }

    generated
}

/// A tree fits if the ground is grass, the space above it is clear and no
/// other trunk stands within two blocks.
pub fn can_place_tree(chunk: &Chunk, world_x: i32, world_z: i32, ground_y: i32) -> bool {
    let ground = chunk.get_block(BlockPos::new(world_x, ground_y, world_z));
    if ground.map(|b| b.block_type) != Some(BlockType::GRASS) {
        return false;
    }

    let clear_above = (1..=TRUNK_CLEARANCE).all(|dy| {
        chunk
            .get_block(BlockPos::new(world_x, ground_y + dy, world_z))
            .map_or(true, |b| b.is_air())
    });
    if !clear_above {
        return false;
    }

    for dx in -TRUNK_SPACING..=TRUNK_SPACING {
        for dz in -TRUNK_SPACING..=TRUNK_SPACING {
            if dx == 0 && dz == 0 {
                continue;
            }
            let neighbor = chunk.get_block(BlockPos::new(world_x + dx, ground_y + 1, world_z + dz));
            if neighbor.is_some_and(|b| b.block_type == BlockType::WOOD_LOG) {
                return false;
            }
        }
    }

    true
}

/// Grows a 4 to 6 block trunk topped with three leaf layers and an optional
/// sparse fourth layer underneath.
pub fn grow_oak_tree(chunk: &mut Chunk, world_x: i32, world_z: i32, ground_y: i32, rng: &mut Rng) {
    let height = 4 + rng.i32(0..3);
    for dy in 1..=height {
        chunk.set_block(BlockPos::new(world_x, ground_y + dy, world_z), BlockType::WOOD_LOG);
    }

    let leaves_start = ground_y + height - 1;
    leaves_cross(chunk, world_x, leaves_start + 2, world_z);
    leaves_layer(chunk, world_x, leaves_start + 1, world_z, rng);
    leaves_layer(chunk, world_x, leaves_start, world_z, rng);
    if rng.bool() {
        sparse_leaves_layer(chunk, world_x, leaves_start - 1, world_z, rng);
    }
}

fn leaves_cross(chunk: &mut Chunk, center_x: i32, y: i32, center_z: i32) {
    for dx in -1..=1 {
        for dz in -1..=1 {
            if dx == 0 || dz == 0 {
                try_place_leaves(chunk, BlockPos::new(center_x + dx, y, center_z + dz));
            }
        }
    }
}

/// Radius 2 layer. Corners only get leaves 30% of the time.
fn leaves_layer(chunk: &mut Chunk, center_x: i32, y: i32, center_z: i32, rng: &mut Rng) {
    for dx in -2..=2_i32 {
        for dz in -2..=2_i32 {
            let corner = dx.abs() == 2 && dz.abs() == 2;
            if !corner || rng.f32() < 0.3 {
                try_place_leaves(chunk, BlockPos::new(center_x + dx, y, center_z + dz));
            }
        }
    }
}

/// Radius 2 layer with 60% coverage and no corners.
fn sparse_leaves_layer(chunk: &mut Chunk, center_x: i32, y: i32, center_z: i32, rng: &mut Rng) {
    for dx in -2..=2_i32 {
        for dz in -2..=2_i32 {
            if rng.f32() < 0.6 && !(dx.abs() == 2 && dz.abs() == 2) {
                try_place_leaves(chunk, BlockPos::new(center_x + dx, y, center_z + dz));
            }
        }
    }
}

/// Leaves only fill empty or air cells inside the chunk.
fn try_place_leaves(chunk: &mut Chunk, pos: BlockPos) {
    if !chunk.contains_column(pos.x, pos.z) {
        return;
    }
    if chunk.get_block(pos).map_or(true, |b| b.is_air()) {
        chunk.set_block(pos, BlockType::LEAVES);
    }
}
