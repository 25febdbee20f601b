//! Components attached to body entities.
//!
//! Plain data, no methods. Static bodies carry no velocity components.

use glam::{DQuat, DVec3};

/// Axis-aligned box extents in body space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    pub half_extents: DVec3,
}

/// World-space position (box center) and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: DVec3,
    pub orientation: DQuat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinearVelocity(pub DVec3);

/// Angular velocity as a scaled axis (rad/s).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngularVelocity(pub DVec3);

/// Marker: the body takes part in integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Active;
