//! Session snapshot: the statistics a host displays or logs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Render callbacks processed.
    pub frame_index: u64,
    /// Physics steps executed since the session started.
    pub fixed_ticks: u64,
    /// fixed_ticks * fixed step.
    pub simulated_secs: f64,
    /// Unconsumed simulated time.
    pub accumulator: f64,
    pub frame_rate: u32,
    pub entity_count: usize,
    /// Frames that stopped at the step cap.
    pub capped_frames: u64,
    /// Frames whose delta was clamped to zero.
    pub timing_anomalies: u64,
    pub spawn_ticks: u64,
    pub gated_spawns: u64,
}
