//! Simulation constants and tuning parameters.
//!
//! These are the defaults behind `SessionConfig`; code that runs from a
//! config should read the config, not these.

// --- Fixed step ---

/// Physics step rate (Hz).
pub const FIXED_HZ: u32 = 60;

/// Seconds per physics step.
pub const FIXED_STEP: f64 = 1.0 / FIXED_HZ as f64;

/// Maximum physics steps executed in one render callback.
pub const MAX_STEPS_PER_FRAME: u32 = 5;

/// Solver iterations passed to every physics step.
pub const SOLVER_ITERATIONS: u32 = 1;

// --- Frame-rate estimation ---

/// Minimum wall-clock window between frame-rate recomputations (milliseconds).
pub const FRAME_RATE_WINDOW_MS: u64 = 500;

// --- Spawning ---

/// Spawn cadence (milliseconds). Independent of the render rate.
pub const SPAWN_INTERVAL_MS: u64 = 100;

/// A spawn tick only creates an entity when the estimate is strictly above this.
pub const SPAWN_MIN_FRAME_RATE: u32 = 50;

/// Horizontal jitter range added to the spawn hint, per axis: [0, SPAWN_JITTER).
pub const SPAWN_JITTER: f64 = 3.0;

/// Spawn height (meters).
pub const SPAWN_HEIGHT: f64 = 15.0;

/// Half extents of a spawned cube (meters). A 2 m cube.
pub const CUBE_HALF_EXTENTS: [f64; 3] = [1.0, 1.0, 1.0];

// --- World ---

/// Half extents of the static ground slab (50 x 2 x 50 m).
pub const GROUND_HALF_EXTENTS: [f64; 3] = [25.0, 1.0, 25.0];

/// Gravity (m/s^2), +Y is up.
pub const GRAVITY: [f64; 3] = [0.0, -9.81, 0.0];

/// Default RNG seed for spawn jitter.
pub const DEFAULT_SEED: u64 = 42;

// --- Camera ---

/// Vertical field of view (degrees).
pub const CAMERA_FOV_DEGREES: f64 = 75.0;

/// Near clip plane (meters).
pub const CAMERA_NEAR_CLIP: f64 = 0.1;

/// Far clip plane (meters).
pub const CAMERA_FAR_CLIP: f64 = 1000.0;

/// Camera position looking down at the drop zone.
pub const CAMERA_POSITION: [f64; 3] = [0.0, 20.0, 30.0];

/// Camera pitch around X (radians, negative looks down).
pub const CAMERA_PITCH: f64 = -0.7;

// --- Host ---

/// Default display refresh rate for the headless host (Hz).
pub const DISPLAY_HZ: u32 = 60;

/// Default viewport size.
pub const VIEWPORT_WIDTH: u32 = 1280;
pub const VIEWPORT_HEIGHT: u32 = 720;
