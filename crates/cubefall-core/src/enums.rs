//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Whether a body is immovable or responds to forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    Static,
    #[default]
    Dynamic,
}

/// What the loop does with simulated time left over after hitting the step cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BacklogPolicy {
    /// Keep the backlog in the accumulator; later frames keep catching up,
    /// at most `max_steps_per_frame` steps at a time.
    #[default]
    Retain,
    /// Drop whole steps of backlog, keeping only the sub-step remainder.
    Discard,
}
