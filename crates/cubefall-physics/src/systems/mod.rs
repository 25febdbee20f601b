//! Systems run by `BoxPhysicsWorld::step`.
//!
//! Systems are pure functions over `&mut World`. They do not own state.

pub mod contacts;
pub mod integrate;
