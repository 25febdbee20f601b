//! Optional observability hooks.
//!
//! Every method defaults to a no-op, and the session treats a missing
//! observer the same as one that ignores everything.

pub trait SessionObserver {
    /// Called once per render callback with the latest frame-rate estimate.
    fn on_frame_rate_update(&mut self, _fps: u32) {}

    /// Called after a spawn tick created an entity.
    fn on_entity_count_update(&mut self, _count: usize) {}

    /// Called when a frame stopped stepping at the cap with `backlog_secs`
    /// of simulated time still unconsumed.
    fn on_step_cap_reached(&mut self, _backlog_secs: f64) {}
}
