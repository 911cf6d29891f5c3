#![warn(rustdoc::missing_crate_level_docs)]

//! # Voxel Island
//!
//! The world core of a small voxel sandbox: a bounded island of chunks,
//! face culling with ambient occlusion, opaque and transparent meshes, and
//! block breaking and placing through a view ray.
//!
//! ## Key Modules
//!
//! * `application_state` - Input intake and per-frame input snapshots
//! * `config` - JSON engine configuration and its validation
//! * `engine_state` - The world, its meshes and the per-frame driver
//!
//! ## Architecture
//!
//! Everything runs on one thread in a fixed per-frame order. The engine never
//! talks to the GPU; it returns named buffer writes and leaves drawing to the
//! backend that consumes them.
//!
//! ## Usage
//!
//! ```text
//! fn main() {
//!     voxel_island::run();
//! }
//! ```

use std::fs::File;

use cgmath::{Point3, Vector3};
use log::{error, info};
use web_time::Instant;
use winit::{event::MouseButton, keyboard::KeyCode};

use application_state::input_manager::InputManager;
use config::{ConfigError, EngineConfig};
use engine_state::{buffer_state::BufferState, EngineState, FrameInput, PlayerAction};

pub mod application_state;
pub mod config;
pub mod engine_state;

/// Name of the stopwatch covering engine construction.
pub const APPLICATION_INITIALIZATION_STOPWATCH: &str = "Application Initialization";

/// Fixed frame time of the headless session, in seconds.
const FRAME_TIME: f32 = 1.0 / 60.0;

/// Frames the headless session runs for.
const SESSION_FRAMES: u32 = 240;

/// Initializes logging, loads the configuration named by the first command
/// line argument (defaults otherwise) and runs a short headless session.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let config = match load_config(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(err) => {
            error!("Could not load configuration: {err}");
            return;
        }
    };

    let start = Instant::now();
    let engine = match EngineState::new(config) {
        Ok(engine) => engine,
        Err(err) => {
            error!("Invalid configuration: {err}");
            return;
        }
    };
    info!(
        "{}: {:?}",
        APPLICATION_INITIALIZATION_STOPWATCH,
        start.elapsed()
    );

    run_session(engine);
}

/// Reads the configuration file at `path`, or returns the defaults.
fn load_config(path: Option<String>) -> Result<EngineConfig, ConfigError> {
    match path {
        Some(path) => {
            info!("Loading configuration from {path}");
            EngineConfig::from_reader(File::open(path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Drives the engine with scripted input: dig into the ground below the
/// spawn point, place a plank, then walk east.
fn run_session(mut engine: EngineState) {
    let mut input = InputManager::new();
    let mut buffers = BufferState::new();
    let mut eye = engine.spawn_eye();
    let down = Vector3::new(0.0, -1.0, 0.0);
    let east = Vector3::new(1.0, -0.25, 0.0);

    let start = Instant::now();
    for frame in 0..SESSION_FRAMES {
        input.set_mouse_button(MouseButton::Left, frame < 90);
        input.set_mouse_button(MouseButton::Right, (100..102).contains(&frame));
        input.set_key(KeyCode::F1, frame == 200);

        let view_direction = if frame < 150 { down } else { east };
        if frame >= 150 {
            eye = Point3::new(eye.x + 0.2, eye.y, eye.z);
        }

        let actions = PlayerAction::from_input(&input.process());
        let commands = engine.frame(
            &FrameInput {
                eye,
                view_direction,
                delta_time: FRAME_TIME,
            },
            &actions,
        );
        buffers.write_all(commands);
    }

    info!(
        "Ran {} frames in {:?}: {} opaque faces, {} transparent faces, {} chunks loaded, {} bytes buffered",
        SESSION_FRAMES,
        start.elapsed(),
        engine.mesh_manager().opaque().face_count(),
        engine.mesh_manager().transparent().face_count(),
        engine.world().chunk_manager().loaded_count(),
        buffers.total_used_memory()
    );
}
