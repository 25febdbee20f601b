//! Reference physics service for cubefall.
//!
//! Box bodies live as entities in an hecs world and are advanced by plain
//! systems each step. This backend exists so the loop runs headless and
//! deterministically; it does not try to be a general rigid-body solver.

pub mod components;
pub mod layers;
pub mod systems;
pub mod world;

pub use layers::LayerTable;
pub use world::{BoxPhysicsWorld, PhysicsSettings};

#[cfg(test)]
mod tests;
