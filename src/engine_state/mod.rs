//! # Engine State Module
//!
//! The core engine module that owns the voxel world and drives it one frame
//! at a time.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `buffer_state` - Buffer write commands and an in-process buffer mirror
//! * `interaction` - View ray, block breaking and block placing
//! * `rendering` - Vertex format and opaque/transparent mesh building
//! * `voxels` - Blocks, chunks, terrain and the world with its face cache
//!
//! ## Frame Order
//!
//! Every frame runs the same steps in the same order on one thread:
//!
//! 1. Input: capture toggles and translated player actions
//! 2. World update: chunk streaming around the eye
//! 3. Interaction: targeting, breaking and placing
//! 4. Visible face refresh and opaque/transparent rebuild, only if dirty
//! 5. Transparent back-to-front sort against the eye
//!
//! The resulting buffer writes are returned to the caller, which hands them
//! to whatever render backend it owns.

use cgmath::{InnerSpace, Point3, Vector3};
use log::{debug, info};
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::{
    application_state::input_state::ProcessedInputState,
    config::{ConfigError, EngineConfig},
};

use buffer_state::BufferWriteCommand;
use interaction::{Aabb, InteractionState, RaycastResult};
use rendering::MeshManager;
use voxels::{block::block_type::BlockType, world::World};

pub mod buffer_state;
pub mod interaction;
pub mod rendering;
pub mod voxels;

/// The view ray starts this far along the view direction, in blocks.
const RAY_START_OFFSET: f32 = 0.1;

/// Camera input for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// World position of the player's eye
    pub eye: Point3<f32>,
    /// Direction the player is looking; need not be normalized
    pub view_direction: Vector3<f32>,
    /// Seconds since the previous frame
    pub delta_time: f32,
}

/// Represents player actions derived from input
///
/// Breaking is driven by the held state of the left button, placing by the
/// right button's press and hold, and F1 toggles mouse capture.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerAction {
    /// Break button went down this frame
    pub break_pressed: bool,
    /// Break button is down
    pub break_held: bool,
    /// Place button went down this frame
    pub place_pressed: bool,
    /// Place button is down
    pub place_held: bool,

    /// Actions that should only trigger on key press, not hold
    pub toggle_capture: bool,
    pub release_capture: bool,
}

impl PlayerAction {
    /// Translates a processed input snapshot into player actions.
    ///
    /// # Arguments
    /// * `input` - The processed input state to translate
    ///
    /// # Returns
    /// A PlayerAction struct with the appropriate actions set
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let left = input.get_mouse_button_state(MouseButton::Left);
        let right = input.get_mouse_button_state(MouseButton::Right);

        PlayerAction {
            break_pressed: left.is_just_pressed(),
            break_held: left.is_active(),
            place_pressed: right.is_just_pressed(),
            place_held: right.is_active(),
            toggle_capture: input.get_key_state(KeyCode::F1).is_just_pressed(),
            release_capture: input.get_key_state(KeyCode::Escape).is_just_pressed(),
        }
    }
}

/// The main state container for the voxel engine
///
/// This struct owns the world and every per-session system built on it, and
/// runs them in a fixed order once per frame.
pub struct EngineState {
    config: EngineConfig,
    /// The voxel world containing all chunk data
    world: World,
    /// Opaque and transparent meshes built from the world's visible faces
    mesh_manager: MeshManager,
    interaction: InteractionState,
    /// Block type the place button puts down
    place_block_type: BlockType,
    /// Breaking and placing only happen while the mouse is captured
    mouse_captured: bool,
    /// Seconds since the engine started, summed from frame deltas
    elapsed: f32,
}

impl EngineState {
    /// Creates an engine with a generated world, streamed in around the spawn
    /// point.
    ///
    /// # Arguments
    /// * `config` - Engine configuration; validated before use
    ///
    /// # Returns
    /// The engine, or the configuration error that prevented it.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = World::from_config(&config);
        let mut engine = EngineState::with_world(config, world);

        let spawn = engine.spawn_eye();
        engine.world.update_streaming(spawn.x, spawn.z);
        info!(
            "Engine ready: {} chunks loaded, spawn at ({:.1}, {:.1}, {:.1})",
            engine.world.chunk_manager().loaded_count(),
            spawn.x,
            spawn.y,
            spawn.z
        );
        Ok(engine)
    }

    /// Creates an engine around an already built world.
    pub fn with_world(config: EngineConfig, world: World) -> Self {
        let interaction = InteractionState::new(&config.interaction);
        EngineState {
            config,
            world,
            mesh_manager: MeshManager::new(),
            interaction,
            place_block_type: BlockType::WOOD_PLANK,
            mouse_captured: true,
            elapsed: 0.0,
        }
    }

    /// Eye position above the island's grass, a little south of the pond.
    pub fn spawn_eye(&self) -> Point3<f32> {
        let (center_x, center_z) = self.world.chunk_manager().generator().island_center();
        let ground = 4.0;
        Point3::new(
            center_x.floor() + 0.5,
            ground + self.config.player.eye_height,
            center_z.floor() + 10.5,
        )
    }

    /// Runs one frame.
    ///
    /// # Arguments
    /// * `input` - Eye, view direction and frame time
    /// * `actions` - Player actions for this frame
    ///
    /// # Returns
    /// Buffer writes for the render backend: the opaque and transparent
    /// buffers after a rebuild, followed by the re-sorted transparent buffers.
    pub fn frame(&mut self, input: &FrameInput, actions: &PlayerAction) -> Vec<BufferWriteCommand> {
        self.elapsed += input.delta_time.max(0.0);

        let click_consumed = self.update_capture(actions);

        self.world.update_streaming(input.eye.x, input.eye.z);

        self.interact(input, actions, click_consumed);

        let mut commands = Vec::new();
        self.world.refresh_visible_faces();
        if let Some(rebuilt) = self.mesh_manager.rebuild_if_changed(&self.world) {
            commands.extend(rebuilt);
            self.interaction.mark_mesh_rebuilt();
        }
        commands.extend(self.mesh_manager.sort_transparent(input.eye));
        commands
    }

    /// Applies capture changes.
    ///
    /// # Returns
    /// `true` if a click was used to recapture the mouse and must not act on
    /// the world.
    fn update_capture(&mut self, actions: &PlayerAction) -> bool {
        if actions.toggle_capture {
            self.mouse_captured = !self.mouse_captured;
            info!("Mouse captured: {}", self.mouse_captured);
            return false;
        }
        if actions.release_capture && self.mouse_captured {
            self.mouse_captured = false;
            info!("Mouse released");
            return false;
        }
        if !self.mouse_captured && (actions.break_pressed || actions.place_pressed) {
            self.mouse_captured = true;
            info!("Mouse captured by click");
            return true;
        }
        false
    }

    fn interact(&mut self, input: &FrameInput, actions: &PlayerAction, click_consumed: bool) -> RaycastResult {
        let origin = ray_origin(input.eye, input.view_direction);
        let direction = input.view_direction;
        let active = self.mouse_captured && !click_consumed;

        let break_held = active && actions.break_held;
        let result = self
            .interaction
            .update(&mut self.world, origin, direction, break_held, self.elapsed);

        if active {
            let player = Aabb::player_at_eye(input.eye, &self.config.player);
            let placed = self.interaction.update_placing(
                &mut self.world,
                origin,
                direction,
                self.place_block_type,
                &player,
                actions.place_pressed,
                actions.place_held,
                input.delta_time,
            );
            if placed {
                debug!("Placed {:?} this frame", self.place_block_type);
            }
        }
        result
    }

    /// Physics query passthrough.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.world.is_solid(x, y, z)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn mesh_manager(&self) -> &MeshManager {
        &self.mesh_manager
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_mouse_captured(&self) -> bool {
        self.mouse_captured
    }

    pub fn place_block_type(&self) -> BlockType {
        self.place_block_type
    }

    /// Changes the block type the place button puts down. Air is ignored.
    pub fn set_place_block_type(&mut self, block_type: BlockType) {
        if block_type != BlockType::AIR {
            self.place_block_type = block_type;
        }
    }

    /// Seconds of frame time since the engine started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// Nudges the ray start forward so it never begins on the eye's own cell face.
fn ray_origin(eye: Point3<f32>, direction: Vector3<f32>) -> Point3<f32> {
    let length = direction.magnitude();
    if !length.is_finite() || length < 1e-8 {
        return eye;
    }
    eye + direction / length * RAY_START_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::buffer_state::{OPAQUE_VERTEX_BUFFER, TRANSPARENT_VERTEX_BUFFER};
    use crate::engine_state::voxels::block::BlockPos;
    use crate::engine_state::voxels::chunk::terrain_generation::{TerrainGenerator, WorldShape};
    use crate::engine_state::voxels::chunk::Chunk;
    use crate::engine_state::voxels::chunk_manager::ChunkManager;

    const STONE: BlockPos = BlockPos::new(8, 10, 8);

    /// Empty chunks with one stone block, for predictable rays.
    fn engine_with_stone() -> EngineState {
        let config = EngineConfig::default();
        let bounds = config.world.bounds();
        let generator = TerrainGenerator::new(WorldShape::Flat, 0, bounds, 1.0);
        let mut manager = ChunkManager::new(bounds, generator);
        for coord in bounds.coords() {
            manager.insert_chunk(Chunk::new(coord));
        }
        let mut world = World::new(manager, config.streaming.clone());
        world.add_block(STONE, BlockType::STONE);
        EngineState::with_world(config, world)
    }

    fn looking_down(delta_time: f32) -> FrameInput {
        FrameInput {
            eye: Point3::new(8.5, 14.5, 8.5),
            view_direction: Vector3::new(0.0, -1.0, 0.0),
            delta_time,
        }
    }

    fn breaking() -> PlayerAction {
        PlayerAction {
            break_held: true,
            ..PlayerAction::default()
        }
    }

    #[test]
    fn first_frame_uploads_both_streams_then_only_transparent() {
        let mut engine = engine_with_stone();

        let first = engine.frame(&looking_down(0.016), &PlayerAction::default());
        assert!(first.iter().any(|c| c.buffer_name == OPAQUE_VERTEX_BUFFER));

        let second = engine.frame(&looking_down(0.016), &PlayerAction::default());
        assert!(second.iter().all(|c| c.buffer_name != OPAQUE_VERTEX_BUFFER));
        assert!(second.iter().any(|c| c.buffer_name == TRANSPARENT_VERTEX_BUFFER));
    }

    #[test]
    fn holding_break_removes_the_block_and_rebuilds() {
        let mut engine = engine_with_stone();
        engine.frame(&looking_down(0.5), &breaking());
        assert!(engine.interaction().is_breaking());

        let mut rebuilt = false;
        for _ in 0..5 {
            let commands = engine.frame(&looking_down(0.5), &breaking());
            rebuilt |= commands.iter().any(|c| c.buffer_name == OPAQUE_VERTEX_BUFFER);
        }
        assert!(!engine.is_solid(STONE.x, STONE.y, STONE.z));
        assert!(rebuilt);
        assert_eq!(engine.mesh_manager().opaque().face_count(), 0);
    }

    #[test]
    fn place_press_puts_a_plank_on_the_hit_face() {
        let mut engine = engine_with_stone();
        let place = PlayerAction {
            place_pressed: true,
            place_held: true,
            ..PlayerAction::default()
        };
        engine.frame(&looking_down(0.016), &place);

        let placed = engine.world().get_block(BlockPos::new(8, 11, 8));
        assert_eq!(placed.map(|b| b.block_type), Some(BlockType::WOOD_PLANK));
    }

    #[test]
    fn released_mouse_does_not_break_and_a_click_recaptures() {
        let mut engine = engine_with_stone();
        let toggle = PlayerAction {
            toggle_capture: true,
            ..PlayerAction::default()
        };
        engine.frame(&looking_down(0.016), &toggle);
        assert!(!engine.is_mouse_captured());

        let click = PlayerAction {
            break_pressed: true,
            break_held: true,
            ..PlayerAction::default()
        };
        engine.frame(&looking_down(0.016), &click);
        assert!(engine.is_mouse_captured());
        assert!(!engine.interaction().is_breaking());

        engine.frame(&looking_down(0.016), &breaking());
        assert!(engine.interaction().is_breaking());
    }

    #[test]
    fn actions_follow_button_transitions() {
        use crate::application_state::input_manager::InputManager;

        let mut input = InputManager::new();
        input.set_mouse_button(MouseButton::Right, true);
        input.set_key(KeyCode::F1, true);
        let actions = PlayerAction::from_input(&input.process());
        assert!(actions.place_pressed && actions.place_held);
        assert!(actions.toggle_capture);
        assert!(!actions.break_held);

        let actions = PlayerAction::from_input(&input.process());
        assert!(!actions.place_pressed && actions.place_held);
        assert!(!actions.toggle_capture);
    }

    #[test]
    fn degenerate_view_direction_keeps_the_eye_as_ray_origin() {
        let eye = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(ray_origin(eye, Vector3::new(0.0, 0.0, 0.0)), eye);
        let nudged = ray_origin(eye, Vector3::new(0.0, 0.0, -2.0));
        assert!((nudged.z - 2.9).abs() < 1e-6);
    }
}
