//! # Application State Management
//!
//! This module handles the application's side of input, including:
//! - Intake of `winit` keyboard and mouse events
//! - Per-frame pressed/held/released snapshots
//!
//! The engine reads these snapshots through `PlayerAction`.

pub mod input_manager;
pub mod input_state;
