use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Top-level engine configuration, parsed from `data/engine.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Chunk width in cells.
    #[serde(default = "default_chunk_size")]
    pub chunk_width: u32,
    /// Chunk height in cells.
    #[serde(default = "default_chunk_size")]
    pub chunk_height: u32,
    #[serde(default)]
    pub breaking: BreakingConfig,
    #[serde(default)]
    pub mesh: MeshConfig,
}

/// Tuning for progressive tile destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakingConfig {
    /// Health of a tile when breaking starts.
    pub initial_health: i32,
    /// Health removed per tick while the tile is being worked on.
    pub damage_per_tick: i32,
    /// Ticks without a touch after which a breaking record is dropped.
    pub liveness_ticks: u64,
}

/// Depth placement of generated tile meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Base z of the tile layer.
    pub layer_z: f32,
    /// z offset per unit of tile priority (toward the camera).
    pub z_priority_step: f32,
}

fn default_chunk_size() -> u32 {
    CHUNK_SIZE
}

impl Default for BreakingConfig {
    fn default() -> Self {
        Self {
            initial_health: DEFAULT_TILE_HEALTH,
            damage_per_tick: DEFAULT_BREAK_DAMAGE_PER_TICK,
            liveness_ticks: DEFAULT_BREAK_LIVENESS_TICKS,
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            layer_z: DEFAULT_LAYER_Z,
            z_priority_step: Z_PRIORITY_STEP,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_width: CHUNK_SIZE,
            chunk_height: CHUNK_SIZE,
            breaking: BreakingConfig::default(),
            mesh: MeshConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate an engine config from a RON string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: EngineConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the engine misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunk size {}x{} must be non-zero",
                self.chunk_width, self.chunk_height
            )));
        }
        if self.breaking.initial_health <= 0 {
            return Err(ConfigError::Invalid(format!(
                "initial_health {} must be positive",
                self.breaking.initial_health
            )));
        }
        if self.breaking.damage_per_tick <= 0 {
            return Err(ConfigError::Invalid(format!(
                "damage_per_tick {} must be positive",
                self.breaking.damage_per_tick
            )));
        }
        if !self.mesh.z_priority_step.is_finite() || self.mesh.z_priority_step <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "z_priority_step {} must be a positive number",
                self.mesh.z_priority_step
            )));
        }
        if !self.chunk_width.is_power_of_two() || self.chunk_width != self.chunk_height {
            log::warn!(
                "chunk size {}x{} is not a square power of two; collider regions will be padded",
                self.chunk_width,
                self.chunk_height
            );
        }
        Ok(())
    }
}
