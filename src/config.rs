//! # Configuration Module
//!
//! Engine settings, grouped the same way the engine is: world generation,
//! player dimensions, block interaction and chunk streaming. Every field has a
//! default, so an empty JSON object is a complete configuration.
//!
//! Reading configuration files from disk is left to the caller; this module
//! only parses and validates.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::chunk::terrain_generation::WorldShape;
use crate::engine_state::voxels::chunk_manager::ChunkBounds;

/// Errors produced while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top level engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub interaction: InteractionConfig,
    pub streaming: StreamingConfig,
}

/// How the world is generated and which chunks may exist.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub shape: WorldShape,
    pub seed: u64,
    pub min_chunk: i32,
    pub max_chunk: i32,
    /// Trees per 100 columns of a chunk.
    pub tree_density: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            shape: WorldShape::Island,
            seed: 0x5EED,
            min_chunk: 0,
            max_chunk: 3,
            tree_density: 1.0,
        }
    }
}

impl WorldConfig {
    /// The square chunk range `min_chunk..=max_chunk` on both axes.
    pub fn bounds(&self) -> ChunkBounds {
        ChunkBounds::new(self.min_chunk, self.max_chunk, self.min_chunk, self.max_chunk)
    }
}

/// Player collision box, in blocks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Eye height above the feet.
    pub eye_height: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            width: 0.625,
            depth: 0.625,
            height: 1.8125,
            eye_height: 1.625,
        }
    }
}

/// Block breaking and placing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Seconds of holding the break button needed to break a block.
    pub break_time: f32,
    pub max_reach_distance: f32,
    /// Seconds between repeated placements while the place button is held.
    pub place_delay: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        InteractionConfig {
            break_time: 1.0,
            max_reach_distance: 5.0,
            place_delay: 0.2,
        }
    }
}

/// Distance based chunk loading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks within this many chunks of the player are loaded.
    pub load_radius: i32,
    /// Chunks are unloaded once they are this much further than `load_radius`.
    pub unload_margin: i32,
    /// Horizontal distance in blocks the player must move before streaming runs again.
    pub update_threshold: f32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        StreamingConfig {
            load_radius: 12,
            unload_margin: 2,
            update_threshold: 4.0,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration from any reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ConfigError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.min_chunk > self.world.max_chunk {
            return Err(ConfigError::Invalid(format!(
                "world.min_chunk ({}) is greater than world.max_chunk ({})",
                self.world.min_chunk, self.world.max_chunk
            )));
        }
        if !(self.world.tree_density >= 0.0) {
            return Err(ConfigError::Invalid(
                "world.tree_density must not be negative".to_string(),
            ));
        }

        let player = &self.player;
        for (name, value) in [
            ("player.width", player.width),
            ("player.depth", player.depth),
            ("player.height", player.height),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !(0.0..=player.height).contains(&player.eye_height) {
            return Err(ConfigError::Invalid(
                "player.eye_height must lie between the feet and the head".to_string(),
            ));
        }

        let interaction = &self.interaction;
        for (name, value) in [
            ("interaction.break_time", interaction.break_time),
            ("interaction.max_reach_distance", interaction.max_reach_distance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !(interaction.place_delay >= 0.0) {
            return Err(ConfigError::Invalid(
                "interaction.place_delay must not be negative".to_string(),
            ));
        }

        let streaming = &self.streaming;
        if streaming.load_radius < 0 || streaming.unload_margin < 0 {
            return Err(ConfigError::Invalid(
                "streaming radii must not be negative".to_string(),
            ));
        }
        if !(streaming.update_threshold >= 0.0) {
            return Err(ConfigError::Invalid(
                "streaming.update_threshold must not be negative".to_string(),
            ));
        }

        Ok(())
    }
}
