//! # Terrain Generation Module
//!
//! Fills freshly loaded chunks with terrain. Two shapes are supported: a
//! floating island centred on the allowed chunk range, and an endless flat
//! plain. Both use the same four block strata:
//!
//! | y | block |
//! |---|-------|
//! | 3 | GRASS (WATER inside the pond) |
//! | 1..=2 | DIRT |
//! | 0 | STONE |
//!
//! Every chunk draws from its own generator seeded from the world seed and its
//! coordinate, so loading order never changes what a chunk looks like.

use log::debug;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::block_type::BlockType;
use crate::engine_state::voxels::block::BlockPos;
use crate::engine_state::voxels::chunk_manager::ChunkBounds;

use super::tree_generation;
use super::{Chunk, ChunkCoord, CHUNK_DIMENSION};

/// Columns this close to the island centre become the pond.
pub const POND_RADIUS: f32 = 5.0;
/// Columns up to this distance are always solid ground.
pub const ISLAND_CORE_RADIUS: f32 = 24.0;
/// Columns past this distance are always empty.
pub const ISLAND_EDGE_RADIUS: f32 = 28.0;
/// Scaling factor applied to world coordinates when sampling the edge noise.
pub const EDGE_NOISE_SCALE: f64 = 0.173;

/// Overall shape of the generated world.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldShape {
    /// A round island with a pond in the middle and a ragged edge.
    #[default]
    Island,
    /// Grass strata in every column.
    Flat,
}

/// Generates the initial contents of chunks.
pub struct TerrainGenerator {
    shape: WorldShape,
    seed: u64,
    tree_density: f32,
    center_x: f32,
    center_z: f32,
    perlin: Perlin,
}

impl TerrainGenerator {
    /// Creates a generator for a world with the given shape and seed.
    ///
    /// # Arguments
    /// * `shape` - Island or flat terrain
    /// * `seed` - World seed every chunk seed is derived from
    /// * `bounds` - Allowed chunk range; the island sits in its middle
    /// * `tree_density` - Trees per 100 columns
    pub fn new(shape: WorldShape, seed: u64, bounds: ChunkBounds, tree_density: f32) -> Self {
        let chunk_dimension = CHUNK_DIMENSION as f32;
        let half_chunk = chunk_dimension / 2.0;
        TerrainGenerator {
            shape,
            seed,
            tree_density,
            center_x: (bounds.min_x + bounds.max_x) as f32 * 0.5 * chunk_dimension + half_chunk,
            center_z: (bounds.min_z + bounds.max_z) as f32 * 0.5 * chunk_dimension + half_chunk,
            perlin: Perlin::new(seed as u32),
        }
    }

    pub fn shape(&self) -> WorldShape {
        self.shape
    }

    /// World-space centre of the island, in block units.
    pub fn island_center(&self) -> (f32, f32) {
        (self.center_x, self.center_z)
    }

    /// Seed of the generator used for one chunk.
    pub fn chunk_seed(&self, coord: ChunkCoord) -> u64 {
        let x = coord.x as i64 as u64;
        let z = coord.z as i64 as u64;
        self.seed
            ^ x.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ z.wrapping_mul(0xC2B2_AE3D_27D4_EB4F).rotate_left(31)
    }

    /// Builds the chunk at `coord`, terrain first and trees second.
    pub fn generate(&self, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord);
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(coord));
        let (min_x, min_z) = coord.origin();

        for world_x in min_x..min_x + CHUNK_DIMENSION {
            for world_z in min_z..min_z + CHUNK_DIMENSION {
                match self.shape {
                    WorldShape::Flat => fill_strata(&mut chunk, world_x, world_z, BlockType::GRASS),
                    WorldShape::Island => self.fill_island_column(&mut chunk, world_x, world_z),
                }
            }
        }

        let trees = tree_generation::generate_random_trees(&mut chunk, self.tree_density, &mut rng);
        debug!(
            "Generated {:?} terrain for chunk ({}, {}) with {} trees",
            self.shape, coord.x, coord.z, trees
        );

        chunk
    }

    fn fill_island_column(&self, chunk: &mut Chunk, world_x: i32, world_z: i32) {
        let distance = self.distance_to_center(world_x, world_z);

        if distance <= POND_RADIUS {
            fill_strata(chunk, world_x, world_z, BlockType::WATER);
        } else if distance <= ISLAND_CORE_RADIUS {
            fill_strata(chunk, world_x, world_z, BlockType::GRASS);
        } else if distance <= ISLAND_EDGE_RADIUS {
            let edge_chance = (ISLAND_EDGE_RADIUS - distance) / 4.0;
            if self.edge_sample(world_x, world_z) < edge_chance {
                fill_strata(chunk, world_x, world_z, BlockType::GRASS);
            }
        }
    }

    /// Horizontal distance from a column to the island centre.
    pub fn distance_to_center(&self, world_x: i32, world_z: i32) -> f32 {
        let dx = world_x as f32 - self.center_x;
        let dz = world_z as f32 - self.center_z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Noise value in [0, 1] for a column; sampled in world space so the edge
    /// lines up across chunk borders.
    fn edge_sample(&self, world_x: i32, world_z: i32) -> f32 {
        let sample = self.perlin.get([
            world_x as f64 * EDGE_NOISE_SCALE,
            world_z as f64 * EDGE_NOISE_SCALE,
        ]);
        ((sample + 1.0) * 0.5).clamp(0.0, 1.0) as f32
    }
}

/// Writes STONE, DIRT, DIRT and the given surface block into one column.
fn fill_strata(chunk: &mut Chunk, world_x: i32, world_z: i32, surface: BlockType) {
    chunk.set_block(BlockPos::new(world_x, 0, world_z), BlockType::STONE);
    chunk.set_block(BlockPos::new(world_x, 1, world_z), BlockType::DIRT);
    chunk.set_block(BlockPos::new(world_x, 2, world_z), BlockType::DIRT);
    chunk.set_block(BlockPos::new(world_x, 3, world_z), surface);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn island() -> TerrainGenerator {
        TerrainGenerator::new(WorldShape::Island, 7, ChunkBounds::new(0, 3, 0, 3), 1.0)
    }

    fn column(chunk: &Chunk, x: i32, z: i32) -> Vec<Option<BlockType>> {
        (0..4)
            .map(|y| chunk.get_block(BlockPos::new(x, y, z)).map(|b| b.block_type))
            .collect()
    }

    #[test]
    fn island_center_is_the_middle_of_the_bounds() {
        assert_eq!(island().island_center(), (32.0, 32.0));
    }

    #[test]
    fn pond_sits_in_the_middle_of_the_island() {
        let generator = island();
        let chunk = generator.generate(ChunkCoord::new(2, 2));
        assert_eq!(
            column(&chunk, 32, 32),
            vec![
                Some(BlockType::STONE),
                Some(BlockType::DIRT),
                Some(BlockType::DIRT),
                Some(BlockType::WATER)
            ]
        );
    }

    #[test]
    fn core_ring_has_grass_strata() {
        let generator = island();
        // Distance 15 from the centre.
        let chunk = generator.generate(ChunkCoord::new(1, 2));
        assert_eq!(
            column(&chunk, 17, 32),
            vec![
                Some(BlockType::STONE),
                Some(BlockType::DIRT),
                Some(BlockType::DIRT),
                Some(BlockType::GRASS)
            ]
        );
    }

    #[test]
    fn far_corners_stay_empty() {
        let generator = island();
        let chunk = generator.generate(ChunkCoord::new(0, 0));
        // Distance ~45 from the centre.
        assert_eq!(column(&chunk, 0, 0), vec![None, None, None, None]);
    }

    #[test]
    fn generation_is_deterministic_per_chunk() {
        let a = island().generate(ChunkCoord::new(1, 1));
        let b = island().generate(ChunkCoord::new(1, 1));

        let mut blocks_a: Vec<_> = a.blocks().copied().map(|b| (b.position, b.block_type)).collect();
        let mut blocks_b: Vec<_> = b.blocks().copied().map(|b| (b.position, b.block_type)).collect();
        blocks_a.sort();
        blocks_b.sort();
        assert_eq!(blocks_a, blocks_b);
    }

    #[test]
    fn flat_world_fills_every_column() {
        let generator =
            TerrainGenerator::new(WorldShape::Flat, 1, ChunkBounds::new(-2, 2, -2, 2), 1.0);
        let chunk = generator.generate(ChunkCoord::new(-1, -2));
        for x in -16..0 {
            for z in -32..-16 {
                assert_eq!(
                    chunk.get_block(BlockPos::new(x, 0, z)).map(|b| b.block_type),
                    Some(BlockType::STONE)
                );
            }
        }
    }

    #[test]
    fn different_chunks_get_different_seeds() {
        let generator = island();
        assert_ne!(
            generator.chunk_seed(ChunkCoord::new(1, 0)),
            generator.chunk_seed(ChunkCoord::new(0, 1))
        );
    }
}
