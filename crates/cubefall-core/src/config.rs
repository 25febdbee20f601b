//! Session configuration.
//!
//! Every field has a serde default, so an empty TOML document is a valid
//! config and a partial one only overrides what it names.

use std::time::Duration;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::BacklogPolicy;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub frame_rate: FrameRateConfig,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub world: WorldConfig,
    /// Seed for the spawn jitter RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: u32,
    #[serde(default = "default_max_steps")]
    pub max_steps_per_frame: u32,
    #[serde(default = "default_solver_iterations")]
    pub solver_iterations: u32,
    #[serde(default)]
    pub backlog: BacklogPolicy,
}

fn default_fixed_hz() -> u32 {
    FIXED_HZ
}
fn default_max_steps() -> u32 {
    MAX_STEPS_PER_FRAME
}
fn default_solver_iterations() -> u32 {
    SOLVER_ITERATIONS
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            fixed_hz: default_fixed_hz(),
            max_steps_per_frame: default_max_steps(),
            solver_iterations: default_solver_iterations(),
            backlog: BacklogPolicy::default(),
        }
    }
}

impl FrameConfig {
    /// Seconds per physics step.
    pub fn fixed_step(&self) -> f64 {
        1.0 / self.fixed_hz.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRateConfig {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,
}

fn default_window_ms() -> u64 {
    FRAME_RATE_WINDOW_MS
}

impl Default for FrameRateConfig {
    fn default() -> Self {
        Self { window_ms: default_window_ms() }
    }
}

impl FrameRateConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Spawn only while the frame-rate estimate is strictly above this.
    #[serde(default = "default_min_frame_rate")]
    pub min_frame_rate: u32,
    /// Position hint every spawn starts from.
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "default_jitter")]
    pub jitter: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_cube_half_extents")]
    pub half_extents: [f64; 3],
}

fn default_interval_ms() -> u64 {
    SPAWN_INTERVAL_MS
}
fn default_min_frame_rate() -> u32 {
    SPAWN_MIN_FRAME_RATE
}
fn default_jitter() -> f64 {
    SPAWN_JITTER
}
fn default_height() -> f64 {
    SPAWN_HEIGHT
}
fn default_cube_half_extents() -> [f64; 3] {
    CUBE_HALF_EXTENTS
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            min_frame_rate: default_min_frame_rate(),
            origin: [0.0; 3],
            jitter: default_jitter(),
            height: default_height(),
            half_extents: default_cube_half_extents(),
        }
    }
}

impl SpawnConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn origin(&self) -> DVec3 {
        DVec3::from_array(self.origin)
    }

    pub fn half_extents(&self) -> DVec3 {
        DVec3::from_array(self.half_extents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_ground_half_extents")]
    pub ground_half_extents: [f64; 3],
    #[serde(default)]
    pub ground_position: [f64; 3],
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],
}

fn default_ground_half_extents() -> [f64; 3] {
    GROUND_HALF_EXTENTS
}
fn default_gravity() -> [f64; 3] {
    GRAVITY
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_half_extents: default_ground_half_extents(),
            ground_position: [0.0; 3],
            gravity: default_gravity(),
        }
    }
}

impl WorldConfig {
    pub fn ground_half_extents(&self) -> DVec3 {
        DVec3::from_array(self.ground_half_extents)
    }

    pub fn ground_position(&self) -> DVec3 {
        DVec3::from_array(self.ground_position)
    }

    pub fn gravity(&self) -> DVec3 {
        DVec3::from_array(self.gravity)
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: SessionConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.fixed_hz == 0 {
            return Err(ConfigError::invalid("frame.fixed_hz", "must be at least 1"));
        }
        if self.frame.max_steps_per_frame == 0 {
            return Err(ConfigError::invalid(
                "frame.max_steps_per_frame",
                "must be at least 1",
            ));
        }
        if self.frame_rate.window_ms == 0 {
            return Err(ConfigError::invalid("frame_rate.window_ms", "must be at least 1"));
        }
        if self.spawn.interval_ms == 0 {
            return Err(ConfigError::invalid("spawn.interval_ms", "must be at least 1"));
        }
        if !self.spawn.jitter.is_finite() || self.spawn.jitter < 0.0 {
            return Err(ConfigError::invalid("spawn.jitter", "must be finite and >= 0"));
        }
        if !positive_extents(&self.spawn.half_extents) {
            return Err(ConfigError::invalid("spawn.half_extents", "must all be > 0"));
        }
        if !positive_extents(&self.world.ground_half_extents) {
            return Err(ConfigError::invalid(
                "world.ground_half_extents",
                "must all be > 0",
            ));
        }
        Ok(())
    }
}

fn positive_extents(e: &[f64; 3]) -> bool {
    e.iter().all(|v| v.is_finite() && *v > 0.0)
}
