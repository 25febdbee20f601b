//! Outcomes reported by the per-frame and per-spawn-tick entry points.

use serde::{Deserialize, Serialize};

/// What one render callback did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Delta added to the accumulator after clamping.
    pub delta_secs: f64,
    /// Physics steps executed this frame.
    pub steps: u32,
    /// The step cap stopped the catch-up phase with a full step still pending.
    pub capped: bool,
    /// The raw delta was NaN, infinite or not positive and was clamped to zero.
    pub anomaly: bool,
    /// Frame-rate estimate reported this frame.
    pub frame_rate: u32,
    /// Accumulator after the catch-up phase.
    pub accumulator: f64,
    /// Entities whose transforms were synced.
    pub synced: usize,
}

/// Result of one spawn-cadence tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpawnOutcome {
    /// A new entity was created; `count` is the registry size afterwards.
    Spawned { count: usize },
    /// The frame-rate estimate was too low to admit a new entity.
    Gated { estimate: u32 },
}
