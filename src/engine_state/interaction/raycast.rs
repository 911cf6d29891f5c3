//! # Raycast Module
//!
//! Voxel traversal (DDA) from the player's eye along the view direction. The ray
//! walks block boundaries one at a time, so it never skips a block however thin
//! the grazing angle, and stops at the first solid block or the reach limit.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::block::block_side::BlockSide;
use crate::engine_state::voxels::block::{Block, BlockPos};
use crate::engine_state::voxels::visibility::BlockLookup;

/// Per-axis step length used when a direction component is effectively zero.
const PARALLEL_DELTA: f32 = 1e30;
/// Components (and lengths) below this are treated as zero.
const EPSILON: f32 = 1e-8;

/// What a ray cast found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastResult {
    pub hit: bool,
    /// The block that stopped the ray.
    pub block: Option<Block>,
    /// The face of `block` the ray entered through.
    pub face: Option<BlockSide>,
    /// Where the ray crossed into `block`. The origin on a miss.
    pub point: Point3<f32>,
    /// Distance travelled to `point`. The reach limit on a miss.
    pub distance: f32,
}

impl RaycastResult {
    fn miss(origin: Point3<f32>, max_reach: f32) -> Self {
        RaycastResult {
            hit: false,
            block: None,
            face: None,
            point: origin,
            distance: max_reach,
        }
    }

    /// The hit block together with its face, if the ray hit anything.
    pub fn block_and_face(&self) -> Option<(Block, BlockSide)> {
        self.block.zip(self.face)
    }
}

/// Casts a ray through the voxel grid.
///
/// # Arguments
/// * `lookup` - Source of blocks along the ray
/// * `origin` - Start of the ray in world space
/// * `direction` - Direction of the ray; need not be normalized
/// * `max_reach` - Maximum distance the ray may travel
///
/// # Returns
/// A hit for the first solid block within reach, otherwise a miss. A zero or
/// non-finite direction always misses.
pub fn raycast<L: BlockLookup + ?Sized>(
    lookup: &L,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_reach: f32,
) -> RaycastResult {
    let length = direction.magnitude();
    if !(length >= EPSILON) || !length.is_finite() {
        return RaycastResult::miss(origin, max_reach);
    }
    let dir = direction / length;

    let origin_arr = [origin.x, origin.y, origin.z];
    let dir_arr = [dir.x, dir.y, dir.z];

    let mut map = [0i32; 3];
    let mut step = [0i32; 3];
    let mut delta_dist = [0f32; 3];
    let mut side_dist = [0f32; 3];
    for axis in 0..3 {
        map[axis] = origin_arr[axis].floor() as i32;
        delta_dist[axis] = if dir_arr[axis].abs() < EPSILON {
            PARALLEL_DELTA
        } else {
            (1.0 / dir_arr[axis]).abs()
        };
        if dir_arr[axis] < 0.0 {
            step[axis] = -1;
            side_dist[axis] = (origin_arr[axis] - map[axis] as f32) * delta_dist[axis];
        } else {
            step[axis] = 1;
            side_dist[axis] = (map[axis] as f32 + 1.0 - origin_arr[axis]) * delta_dist[axis];
        }
    }

    loop {
        // X wins only when strictly smallest, then Y if strictly below Z.
        let axis = if side_dist[0] < side_dist[1] && side_dist[0] < side_dist[2] {
            0
        } else if side_dist[1] < side_dist[2] {
            1
        } else {
            2
        };

        let perp_wall_dist = side_dist[axis];
        side_dist[axis] += delta_dist[axis];
        map[axis] += step[axis];

        if !(perp_wall_dist <= max_reach) {
            return RaycastResult::miss(origin, max_reach);
        }

        let pos = BlockPos::new(map[0], map[1], map[2]);
        if !lookup.is_solid_at(pos) {
            continue;
        }
        if let Some(block) = lookup.block_at(pos) {
            return RaycastResult {
                hit: true,
                block: Some(block),
                face: Some(BlockSide::entered_by_step(axis, step[axis])),
                point: origin + dir * perp_wall_dist,
                distance: perp_wall_dist,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn blocks(entries: &[(i32, i32, i32, BlockType)]) -> HashMap<BlockPos, Block> {
        entries
            .iter()
            .map(|&(x, y, z, block_type)| {
                let pos = BlockPos::new(x, y, z);
                (pos, Block::new(pos, block_type))
            })
            .collect()
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn straight_down_the_z_axis_hits_the_front_face() {
        let world = blocks(&[(0, 0, 0, BlockType::STONE)]);
        let result = raycast(
            &world,
            Point3::new(0.0, 0.0, 5.0),
            Vector3::new(0.0, 0.0, -1.0),
            5.0,
        );
        assert!(result.hit);
        assert_eq!(result.block.map(|b| b.position), Some(BlockPos::new(0, 0, 0)));
        assert_eq!(result.face, Some(BlockSide::FRONT));
        assert!(approx(result.distance, 4.0));
        assert!(approx(result.point.x, 0.0));
        assert!(approx(result.point.y, 0.0));
        assert!(approx(result.point.z, 1.0));
    }

    #[test]
    fn each_axis_maps_to_the_entered_face() {
        let world = blocks(&[
            (3, 0, 0, BlockType::STONE),
            (-3, 0, 0, BlockType::STONE),
            (0, 3, 0, BlockType::STONE),
            (0, -3, 0, BlockType::STONE),
            (0, 0, 3, BlockType::STONE),
        ]);
        let origin = Point3::new(0.5, 0.5, 0.5);
        let cases = [
            (Vector3::new(1.0, 0.0, 0.0), BlockSide::LEFT),
            (Vector3::new(-1.0, 0.0, 0.0), BlockSide::RIGHT),
            (Vector3::new(0.0, 1.0, 0.0), BlockSide::BOTTOM),
            (Vector3::new(0.0, -1.0, 0.0), BlockSide::TOP),
            (Vector3::new(0.0, 0.0, 1.0), BlockSide::BACK),
        ];
        for (direction, face) in cases {
            let result = raycast(&world, origin, direction, 5.0);
            assert_eq!(result.face, Some(face), "{direction:?}");
            assert!(approx(result.distance, 2.5), "{direction:?}");
        }
    }

    #[test]
    fn blocks_beyond_reach_are_missed() {
        let world = blocks(&[(0, 0, -10, BlockType::STONE)]);
        let origin = Point3::new(0.5, 0.5, 0.5);
        let result = raycast(&world, origin, Vector3::new(0.0, 0.0, -1.0), 5.0);
        assert!(!result.hit);
        assert!(result.block.is_none());
        assert_eq!(result.distance, 5.0);
    }

    #[test]
    fn zero_direction_is_a_miss() {
        let world = blocks(&[(0, 0, 0, BlockType::STONE)]);
        let result = raycast(&world, Point3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, 0.0), 5.0);
        assert!(!result.hit);
        assert_eq!(result.distance, 5.0);
    }

    #[test]
    fn rays_pass_through_water_and_air() {
        let world = blocks(&[
            (0, 0, -1, BlockType::WATER),
            (0, 0, -2, BlockType::AIR),
            (0, 0, -3, BlockType::LEAVES),
        ]);
        let result = raycast(
            &world,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(0.0, 0.0, -1.0),
            5.0,
        );
        assert_eq!(result.block.map(|b| b.block_type), Some(BlockType::LEAVES));
        assert_eq!(result.face, Some(BlockSide::FRONT));
    }

    #[test]
    fn diagonal_rays_enter_through_the_crossed_face() {
        let world = blocks(&[(2, -1, 0, BlockType::DIRT)]);
        // Falling toward +X: crosses x = 2 at y = 0.5 - 1.5 * 0.5 < 0.
        let result = raycast(
            &world,
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(1.0, -0.5, 0.0),
            5.0,
        );
        assert!(result.hit);
        assert_eq!(result.block.map(|b| b.position), Some(BlockPos::new(2, -1, 0)));
        assert_eq!(result.face, Some(BlockSide::LEFT));
    }
}
