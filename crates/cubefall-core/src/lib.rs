//! Core types and definitions for the cubefall simulation loop.
//!
//! This crate defines the vocabulary shared across all other crates:
//! handles, service interfaces, configuration, errors, events and constants.
//! It has no dependency on any physics engine or renderer.

pub mod camera;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod observer;
pub mod services;
pub mod state;
pub mod types;

pub use camera::Camera;
pub use config::SessionConfig;
pub use error::{ConfigError, ServiceError, SessionError};
pub use observer::SessionObserver;
pub use services::{PhysicsService, RenderService};
