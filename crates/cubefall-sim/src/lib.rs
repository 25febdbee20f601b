//! Fixed-step simulation loop for cubefall.
//!
//! Owns the accumulator, the frame-rate estimator, the spawn policy and the
//! entity registry, and drives an external physics service and render
//! service through the traits in `cubefall-core`. Completely headless, so
//! every timing property can be tested with a manual clock.

pub mod clock;
pub mod frame_rate;
pub mod registry;
pub mod session;
pub mod spawn;
pub mod world_setup;

pub use cubefall_core as core;
pub use clock::{ManualClock, SimulationClock, WallClock};
pub use session::SimulationSession;
