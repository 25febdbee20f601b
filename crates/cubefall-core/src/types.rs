//! Handle types shared between the loop and the external services.
//!
//! Handles are plain IDs. The services own the resources behind them.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use glam::{DQuat, DVec3};

/// Non-owning reference to a body inside the physics service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Non-owning reference to a primitive inside the render service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderHandle {
    pub index: u32,
    pub generation: u32,
}

impl RenderHandle {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{:x}", self.0)
    }
}

impl fmt::Display for RenderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}g{}", self.index, self.generation)
    }
}

/// Position + orientation pair, as read from physics and written to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: DVec3,
    pub orientation: DQuat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }
}

/// Object layer a body is placed on. Which layers collide is physics-side setup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u8);

impl CollisionLayer {
    /// The single layer everything lives on unless configured otherwise.
    pub const DEFAULT: CollisionLayer = CollisionLayer(0);
}
