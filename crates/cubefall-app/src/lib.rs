//! Headless host for the cubefall simulation.
//!
//! Wires the reference physics and scene services into a session, runs it
//! on a dedicated thread at a simulated display rate, and reports statistics
//! through the log.

pub mod game_loop;
pub mod logging;
pub mod observer;
pub mod state;

pub use cubefall_core as core;
