//! Static scenery created once per session.
//!
//! The ground is not an `Entity`: it never moves, so it is never synced,
//! but its resources are released with the rest on shutdown.

use log::{debug, warn};

use cubefall_core::config::WorldConfig;
use cubefall_core::enums::MotionKind;
use cubefall_core::error::{ServiceError, SessionError};
use cubefall_core::services::{PhysicsService, RenderService};
use cubefall_core::types::{BodyHandle, CollisionLayer, RenderHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenery {
    pub ground_body: BodyHandle,
    pub ground_primitive: RenderHandle,
}

/// Create the static ground slab in both services.
pub fn build_ground<P, R>(
    world: &WorldConfig,
    physics: &mut P,
    render: &mut R,
) -> Result<Scenery, SessionError>
where
    P: PhysicsService,
    R: RenderService,
{
    let half_extents = world.ground_half_extents();
    let position = world.ground_position();

    let ground_body = physics
        .create_box_body(MotionKind::Static, position, half_extents, CollisionLayer::DEFAULT)
        .map_err(SessionError::ResourceCreation)?;

    let ground_primitive = match render.create_box_primitive(half_extents) {
        Ok(h) => h,
        Err(e) => {
            rollback_body(physics, ground_body);
            return Err(SessionError::ResourceCreation(e));
        }
    };

    let placed = physics
        .orientation(ground_body)
        .and_then(|q| render.set_transform(ground_primitive, position, q));
    if let Err(e) = placed {
        rollback_body(physics, ground_body);
        if let Err(re) = render.remove_primitive(ground_primitive) {
            warn!("rollback of ground primitive {ground_primitive} failed: {re}");
        }
        return Err(SessionError::ResourceCreation(e));
    }

    debug!("ground {ground_body}/{ground_primitive} at {position}, half extents {half_extents}");
    Ok(Scenery {
        ground_body,
        ground_primitive,
    })
}

impl Scenery {
    /// Release the ground from both services, attempting both.
    pub fn release<P, R>(self, physics: &mut P, render: &mut R) -> Result<(), SessionError>
    where
        P: PhysicsService,
        R: RenderService,
    {
        let primitive: Result<(), ServiceError> = render.remove_primitive(self.ground_primitive);
        let body = physics.destroy_body(self.ground_body);
        primitive.and(body).map_err(SessionError::Release)
    }
}

fn rollback_body<P: PhysicsService>(physics: &mut P, body: BodyHandle) {
    if let Err(e) = physics.destroy_body(body) {
        warn!("rollback of ground body {body} failed: {e}");
    }
}
