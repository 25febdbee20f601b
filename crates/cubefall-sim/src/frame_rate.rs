//! Windowed frame-rate estimator.
//!
//! Counts render callbacks and only recomputes the estimate once a full
//! window of wall-clock time has passed. Between recomputations the last
//! estimate is returned unchanged, so per-frame timing jitter never reaches
//! the spawn policy.

use std::time::Duration;

use log::debug;

#[derive(Debug, Clone)]
pub struct FrameRateEstimator {
    window: Duration,
    window_start: Duration,
    frame_count: u32,
    estimate: u32,
}

impl FrameRateEstimator {
    /// Start an estimator whose first window opens at `start`.
    pub fn new(window: Duration, start: Duration) -> Self {
        Self {
            window: window.max(Duration::from_millis(1)),
            window_start: start,
            frame_count: 0,
            estimate: 0,
        }
    }

    /// Record one render callback at `now` and return the current estimate.
    pub fn sample(&mut self, now: Duration) -> u32 {
        self.frame_count += 1;

        if now >= self.window_start + self.window {
            // The window guard keeps elapsed_ms >= 1.
            let elapsed_ms = (now - self.window_start).as_secs_f64() * 1000.0;
            self.estimate = (self.frame_count as f64 * 1000.0 / elapsed_ms).round() as u32;
            debug!(
                "frame rate {} fps ({} frames in {:.1} ms)",
                self.estimate, self.frame_count, elapsed_ms
            );
            self.frame_count = 0;
            self.window_start = now;
        }

        self.estimate
    }

    /// Last computed estimate (frames per second). Does not count a frame.
    pub fn current(&self) -> u32 {
        self.estimate
    }

    /// Callbacks counted in the open window.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn window_start(&self) -> Duration {
        self.window_start
    }

    /// Pin the estimate without waiting for a window to close.
    #[cfg(test)]
    pub(crate) fn force_estimate(&mut self, estimate: u32) {
        self.estimate = estimate;
    }
}
