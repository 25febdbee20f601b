//! Interfaces of the external collaborators the loop drives.
//!
//! The physics service owns every body and the render service owns every
//! primitive. The loop only ever holds the handles they give out.

use glam::{DQuat, DVec3};

use crate::camera::Camera;
use crate::enums::MotionKind;
use crate::error::ServiceError;
use crate::types::{BodyHandle, CollisionLayer, RenderHandle};

pub trait PhysicsService {
    /// Create a box body and add it to the world already active.
    fn create_box_body(
        &mut self,
        motion: MotionKind,
        position: DVec3,
        half_extents: DVec3,
        layer: CollisionLayer,
    ) -> Result<BodyHandle, ServiceError>;

    /// Remove a body and free everything behind its handle.
    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), ServiceError>;

    /// Advance the world by exactly `delta_secs`.
    fn step(&mut self, delta_secs: f64, solver_iterations: u32);

    fn position(&self, handle: BodyHandle) -> Result<DVec3, ServiceError>;

    fn orientation(&self, handle: BodyHandle) -> Result<DQuat, ServiceError>;

    fn body_count(&self) -> usize;
}

pub trait RenderService {
    fn create_box_primitive(&mut self, half_extents: DVec3) -> Result<RenderHandle, ServiceError>;

    fn remove_primitive(&mut self, handle: RenderHandle) -> Result<(), ServiceError>;

    fn set_transform(
        &mut self,
        handle: RenderHandle,
        position: DVec3,
        orientation: DQuat,
    ) -> Result<(), ServiceError>;

    /// Draw the scene as seen from `camera`.
    fn present_frame(&mut self, camera: &Camera) -> Result<(), ServiceError>;

    fn resize_viewport(&mut self, width: u32, height: u32);
}
