//! # Interaction Module
//!
//! Breaking and placing blocks from the player's point of view.
//!
//! ## Break State Machine
//!
//! ```text
//! Idle --(ray hits a block)--> Targeting --(break held)--> Breaking
//!   ^                                                         |
//!   +------------(progress reaches 1: block removed)----------+
//! ```
//!
//! Switching to a different target block discards any progress, and releasing
//! the break button resets progress while keeping the target for highlighting.
//!
//! ## Placement
//!
//! A block is placed against the face the view ray hits. The first placement
//! happens on the press; holding the button repeats it every `place_delay`
//! seconds.

use cgmath::{Point3, Vector3};
use log::{debug, info};

use crate::config::{InteractionConfig, PlayerConfig};

use super::voxels::block::atlas::AtlasTile;
use super::voxels::block::block_side::BlockSide;
use super::voxels::block::block_type::BlockType;
use super::voxels::block::{Block, BlockPos};
use super::voxels::world::World;

pub mod raycast;

pub use raycast::{raycast, RaycastResult};

/// The block under the crosshair and the face the view ray hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub block: Block,
    pub face: BlockSide,
}

impl Target {
    /// The target of a ray cast, if it hit anything.
    pub fn from_ray(result: &RaycastResult) -> Option<Self> {
        result
            .block_and_face()
            .map(|(block, face)| Target { block, face })
    }

    pub fn position(&self) -> BlockPos {
        self.block.position
    }
}

/// Axis aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// The player's collision box for a given eye position.
    pub fn player_at_eye(eye: Point3<f32>, player: &PlayerConfig) -> Self {
        let half_width = player.width / 2.0;
        let half_depth = player.depth / 2.0;
        let feet_y = eye.y - player.eye_height;
        Aabb {
            min: Point3::new(eye.x - half_width, feet_y, eye.z - half_depth),
            max: Point3::new(eye.x + half_width, feet_y + player.height, eye.z + half_depth),
        }
    }

    /// Whether the box overlaps the unit cell of a block. Touching is not overlapping.
    pub fn intersects_block(&self, pos: BlockPos) -> bool {
        let block_min = pos.to_f32();
        self.min.x < block_min.x + 1.0
            && self.max.x > block_min.x
            && self.min.y < block_min.y + 1.0
            && self.max.y > block_min.y
            && self.min.z < block_min.z + 1.0
            && self.max.z > block_min.z
    }
}

/// Per-session block interaction state.
#[derive(Debug)]
pub struct InteractionState {
    target: Option<Target>,
    breaking: bool,
    break_start: f32,
    break_progress: f32,
    break_duration: f32,
    max_reach: f32,
    place_delay: f32,
    /// Seconds since the last placement attempt while the place button is held.
    place_timer: f32,
    needs_mesh_rebuild: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        InteractionState::new(&InteractionConfig::default())
    }
}

impl InteractionState {
    pub fn new(config: &InteractionConfig) -> Self {
        InteractionState {
            target: None,
            breaking: false,
            break_start: 0.0,
            break_progress: 0.0,
            break_duration: config.break_time,
            max_reach: config.max_reach_distance,
            place_delay: config.place_delay,
            place_timer: 0.0,
            needs_mesh_rebuild: false,
        }
    }

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn is_breaking(&self) -> bool {
        self.breaking
    }

    /// Break progress in [0, 1].
    pub fn break_progress(&self) -> f32 {
        self.break_progress
    }

    pub fn max_reach(&self) -> f32 {
        self.max_reach
    }

    /// Raised when a block was broken and the meshes have not caught up yet.
    pub fn needs_mesh_rebuild(&self) -> bool {
        self.needs_mesh_rebuild
    }

    pub fn mark_mesh_rebuilt(&mut self) {
        self.needs_mesh_rebuild = false;
    }

    /// Casts the view ray with this session's reach.
    pub fn raycast(&self, world: &World, origin: Point3<f32>, direction: Vector3<f32>) -> RaycastResult {
        raycast(world, origin, direction, self.max_reach)
    }

    /// Changes the target. Moving to a different block discards break progress.
    pub fn set_target(&mut self, target: Option<Target>) {
        let old = self.target.map(|t| t.position());
        let new = target.map(|t| t.position());
        if old != new {
            self.stop_breaking();
        }
        self.target = target;
    }

    /// Starts breaking the current target. Does nothing without a target.
    pub fn start_breaking(&mut self, now: f32) {
        if self.target.is_some() {
            self.breaking = true;
            self.break_start = now;
            self.break_progress = 0.0;
        }
    }

    /// Resets progress. The target is kept.
    pub fn stop_breaking(&mut self) {
        self.breaking = false;
        self.break_progress = 0.0;
    }

    /// Advances the break timer and removes the target once it completes.
    ///
    /// # Returns
    /// `true` if the target block was broken by this call.
    pub fn update_breaking(&mut self, world: &mut World, now: f32) -> bool {
        if !self.breaking {
            return false;
        }
        let Some(target) = self.target else {
            return false;
        };

        let elapsed = now - self.break_start;
        self.break_progress = (elapsed / self.break_duration).clamp(0.0, 1.0);
        if self.break_progress < 1.0 {
            return false;
        }

        let removed = world.remove_block(target.position());
        if removed {
            info!(
                "Broke {:?} at {:?}",
                target.block.block_type,
                target.position()
            );
            self.needs_mesh_rebuild = true;
        }
        self.stop_breaking();
        self.set_target(None);
        removed
    }

    /// The crack overlay tile for the current break progress.
    pub fn break_stage(&self) -> Option<AtlasTile> {
        if !self.breaking {
            return None;
        }
        Some(if self.break_progress < 1.0 / 3.0 {
            AtlasTile::BreakingLight
        } else if self.break_progress < 2.0 / 3.0 {
            AtlasTile::BreakingMedium
        } else {
            AtlasTile::BreakingHeavy
        })
    }

    /// Per-frame targeting and breaking.
    ///
    /// While breaking is held, a hit starts breaking, keeps breaking the same
    /// block, or restarts on a new block; a miss stops and clears the target.
    /// When not held, breaking stops and the target just follows the crosshair.
    ///
    /// # Returns
    /// The view ray result, for highlighting.
    pub fn update(
        &mut self,
        world: &mut World,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        break_held: bool,
        now: f32,
    ) -> RaycastResult {
        let result = self.raycast(world, origin, direction);
        let hit = Target::from_ray(&result);

        if !break_held {
            self.stop_breaking();
            self.set_target(hit);
            return result;
        }

        match hit {
            Some(hit) if !self.breaking => {
                self.set_target(Some(hit));
                self.start_breaking(now);
            }
            Some(hit) if self.target.map(|t| t.position()) == Some(hit.position()) => {
                self.set_target(Some(hit));
                self.update_breaking(world, now);
            }
            Some(hit) => {
                self.stop_breaking();
                self.set_target(Some(hit));
                self.start_breaking(now);
            }
            None => {
                self.stop_breaking();
                self.set_target(None);
            }
        }
        result
    }

    /// Places a block against the face the view ray hits.
    ///
    /// # Returns
    /// `false` without changing the world if nothing is in reach, the cell is
    /// occupied, the player stands in it, or it is outside the loaded world.
    pub fn place(
        &mut self,
        world: &mut World,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        block_type: BlockType,
        player: &Aabb,
    ) -> bool {
        let result = self.raycast(world, origin, direction);
        let Some(hit) = Target::from_ray(&result) else {
            return false;
        };
        let candidate = hit.position().offset(hit.face.neighbor_offset());

        if world.get_block(candidate).is_some_and(|block| !block.is_air()) {
            debug!("Cannot place at {:?}: occupied", candidate);
            return false;
        }
        if player.intersects_block(candidate) {
            debug!("Cannot place at {:?}: overlaps the player", candidate);
            return false;
        }
        if !world.is_loaded_position(candidate) {
            debug!("Cannot place at {:?}: outside the loaded world", candidate);
            return false;
        }

        let placed = world.add_block(candidate, block_type);
        if placed {
            info!("Placed {:?} at {:?}", block_type, candidate);
        }
        placed
    }

    /// Per-frame placement: once on the press, then every `place_delay`
    /// seconds while held.
    ///
    /// # Arguments
    /// * `pressed` - The place button went down this frame
    /// * `held` - The place button is down
    /// * `delta_time` - Seconds since the previous frame
    ///
    /// # Returns
    /// `true` if a block was placed this frame.
    #[allow(clippy::too_many_arguments)]
    pub fn update_placing(
        &mut self,
        world: &mut World,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        block_type: BlockType,
        player: &Aabb,
        pressed: bool,
        held: bool,
        delta_time: f32,
    ) -> bool {
        if pressed {
            self.place_timer = 0.0;
            return self.place(world, origin, direction, block_type, player);
        }
        if !held {
            self.place_timer = 0.0;
            return false;
        }

        self.place_timer += delta_time;
        if self.place_timer < self.place_delay {
            return false;
        }
        self.place_timer = 0.0;
        self.place(world, origin, direction, block_type, player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::engine_state::voxels::chunk::terrain_generation::{TerrainGenerator, WorldShape};
    use crate::engine_state::voxels::chunk::Chunk;
    use crate::engine_state::voxels::chunk_manager::ChunkManager;

    /// Sixteen empty chunks with a single stone block at (8, 10, 8).
    fn world_with_stone() -> World {
        let config = EngineConfig::default();
        let bounds = config.world.bounds();
        let generator = TerrainGenerator::new(WorldShape::Flat, 0, bounds, 1.0);
        let mut manager = ChunkManager::new(bounds, generator);
        for coord in bounds.coords() {
            manager.insert_chunk(Chunk::new(coord));
        }
        let mut world = World::new(manager, config.streaming.clone());
        world.add_block(STONE, BlockType::STONE);
        world.refresh_visible_faces();
        world
    }

    const STONE: BlockPos = BlockPos::new(8, 10, 8);

    /// Eye three blocks above the stone, looking straight down.
    fn eye() -> Point3<f32> {
        Point3::new(8.5, 13.5, 8.5)
    }

    fn down() -> Vector3<f32> {
        Vector3::new(0.0, -1.0, 0.0)
    }

    fn far_player() -> Aabb {
        Aabb::player_at_eye(Point3::new(40.0, 20.0, 40.0), &PlayerConfig::default())
    }

    #[test]
    fn holding_break_for_the_break_time_removes_the_block() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();

        interaction.update(&mut world, eye(), down(), true, 0.0);
        assert!(interaction.is_breaking());
        assert_eq!(interaction.target().map(|t| t.face), Some(BlockSide::TOP));

        interaction.update(&mut world, eye(), down(), true, 0.5);
        assert!((interaction.break_progress() - 0.5).abs() < 1e-6);
        assert_eq!(interaction.break_stage(), Some(AtlasTile::BreakingMedium));
        assert!(world.is_solid(8, 10, 8));

        interaction.update(&mut world, eye(), down(), true, 1.0);
        assert!(!world.is_solid(8, 10, 8));
        assert_eq!(
            world.get_block(STONE).map(|b| b.block_type),
            Some(BlockType::AIR)
        );
        assert!(interaction.needs_mesh_rebuild());
        assert!(interaction.target().is_none());
        assert!(!interaction.is_breaking());
        assert!(world.needs_refresh());
    }

    #[test]
    fn releasing_early_keeps_the_block_and_target() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();

        interaction.update(&mut world, eye(), down(), true, 0.0);
        interaction.update(&mut world, eye(), down(), true, 0.9);
        interaction.update(&mut world, eye(), down(), false, 0.95);

        assert!(world.is_solid(8, 10, 8));
        assert!(!interaction.is_breaking());
        assert_eq!(interaction.break_progress(), 0.0);
        assert_eq!(interaction.target().map(|t| t.position()), Some(STONE));
        assert_eq!(interaction.break_stage(), None);
    }

    #[test]
    fn changing_target_discards_progress() {
        let mut world = world_with_stone();
        let other = BlockPos::new(12, 10, 8);
        world.add_block(other, BlockType::DIRT);
        let mut interaction = InteractionState::default();

        interaction.update(&mut world, eye(), down(), true, 0.0);
        interaction.update(&mut world, eye(), down(), true, 0.8);

        let other_eye = Point3::new(12.5, 13.5, 8.5);
        interaction.update(&mut world, other_eye, down(), true, 0.9);
        assert_eq!(interaction.target().map(|t| t.position()), Some(other));
        assert_eq!(interaction.break_progress(), 0.0);

        // Not yet a full second on the new block.
        interaction.update(&mut world, other_eye, down(), true, 1.5);
        assert!(world.is_solid(12, 10, 8));
        interaction.update(&mut world, other_eye, down(), true, 2.0);
        assert!(!world.is_solid(12, 10, 8));
        assert!(world.is_solid(8, 10, 8));
    }

    #[test]
    fn missing_while_held_clears_the_target() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();
        interaction.update(&mut world, eye(), down(), true, 0.0);
        interaction.update(&mut world, eye(), Vector3::new(0.0, 1.0, 0.0), true, 0.1);
        assert!(interaction.target().is_none());
        assert!(!interaction.is_breaking());
    }

    #[test]
    fn start_breaking_needs_a_target() {
        let mut interaction = InteractionState::default();
        interaction.start_breaking(0.0);
        assert!(!interaction.is_breaking());
    }

    #[test]
    fn placing_puts_the_block_on_the_hit_face() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();

        assert!(interaction.place(&mut world, eye(), down(), BlockType::WOOD_PLANK, &far_player()));
        assert_eq!(
            world.get_block(BlockPos::new(8, 11, 8)).map(|b| b.block_type),
            Some(BlockType::WOOD_PLANK)
        );
        assert!(world.needs_refresh());
    }

    #[test]
    fn placing_inside_the_player_is_rejected() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();
        // Feet at y = 11, exactly on top of the stone.
        let player = Aabb::player_at_eye(Point3::new(8.5, 12.625, 8.5), &PlayerConfig::default());

        assert!(!interaction.place(&mut world, eye(), down(), BlockType::WOOD_PLANK, &player));
        assert!(world.get_block(BlockPos::new(8, 11, 8)).is_none());
    }

    #[test]
    fn touching_the_player_is_not_overlapping() {
        let player = Aabb::player_at_eye(Point3::new(8.5, 12.625, 8.5), &PlayerConfig::default());
        // The stone sits right under the feet.
        assert!(!player.intersects_block(STONE));
        assert!(player.intersects_block(BlockPos::new(8, 12, 8)));
        assert!(!player.intersects_block(BlockPos::new(9, 11, 8)));
    }

    #[test]
    fn placing_outside_the_loaded_world_is_rejected() {
        let mut world = world_with_stone();
        let edge = BlockPos::new(0, 10, 8);
        world.add_block(edge, BlockType::STONE);
        let mut interaction = InteractionState::default();

        // Looking at the -X face of the edge block: the cell beyond is x = -1.
        let origin = Point3::new(-2.5, 10.5, 8.5);
        let east = Vector3::new(1.0, 0.0, 0.0);
        assert!(!interaction.place(&mut world, origin, east, BlockType::DIRT, &far_player()));
        assert!(world.get_block(BlockPos::new(-1, 10, 8)).is_none());
    }

    #[test]
    fn placing_with_nothing_in_reach_fails() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();
        let up = Vector3::new(0.0, 1.0, 0.0);
        assert!(!interaction.place(&mut world, eye(), up, BlockType::DIRT, &far_player()));
    }

    #[test]
    fn held_place_repeats_after_the_delay() {
        let mut world = world_with_stone();
        let mut interaction = InteractionState::default();
        let player = far_player();
        let block = BlockType::WOOD_PLANK;

        assert!(interaction.update_placing(&mut world, eye(), down(), block, &player, true, true, 0.016));
        assert!(!interaction.update_placing(&mut world, eye(), down(), block, &player, false, true, 0.1));
        assert!(interaction.update_placing(&mut world, eye(), down(), block, &player, false, true, 0.1));
        assert_eq!(
            world.get_block(BlockPos::new(8, 12, 8)).map(|b| b.block_type),
            Some(block)
        );
        assert!(!interaction.update_placing(&mut world, eye(), down(), block, &player, false, false, 1.0));
    }
}
