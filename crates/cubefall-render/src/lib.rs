//! Headless render service for cubefall.
//!
//! Keeps a flat scene graph of box primitives and counts presented frames.
//! Hosts with a real renderer implement `RenderService` themselves.

pub mod scene;

pub use scene::{HeadlessScene, ScenePrimitive};
