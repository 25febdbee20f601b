//! Entity registry: pairs each physics body with its render primitive.
//!
//! Entities are append-only and kept in creation order. The registry holds
//! handles only; the physics and render services own the resources.

use glam::DVec3;
use log::{debug, warn};
use rand::Rng;

use cubefall_core::config::SpawnConfig;
use cubefall_core::enums::MotionKind;
use cubefall_core::error::{ServiceError, SessionError};
use cubefall_core::services::{PhysicsService, RenderService};
use cubefall_core::types::{BodyHandle, CollisionLayer, RenderHandle};

/// One simulated cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub body: BodyHandle,
    pub render: RenderHandle,
}

#[derive(Debug, Clone)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    jitter: f64,
    height: f64,
    half_extents: DVec3,
}

impl EntityRegistry {
    pub fn new(spawn: &SpawnConfig) -> Self {
        Self {
            entities: Vec::new(),
            jitter: spawn.jitter,
            height: spawn.height,
            half_extents: spawn.half_extents(),
        }
    }

    /// Where a cube spawned from `hint` lands: jittered on X and Z within
    /// `[0, jitter)`, at the configured height.
    pub fn spawn_position<G: Rng>(&self, rng: &mut G, hint: DVec3) -> DVec3 {
        let dx = rng.gen::<f64>() * self.jitter;
        let dz = rng.gen::<f64>() * self.jitter;
        DVec3::new(hint.x + dx, self.height, hint.z + dz)
    }

    /// Create a body and a matching primitive and register the pair.
    ///
    /// On failure nothing stays allocated in either service.
    pub fn create_entity<P, R, G>(
        &mut self,
        physics: &mut P,
        render: &mut R,
        rng: &mut G,
        hint: DVec3,
    ) -> Result<Entity, SessionError>
    where
        P: PhysicsService,
        R: RenderService,
        G: Rng,
    {
        let position = self.spawn_position(rng, hint);

        let body = physics
            .create_box_body(
                MotionKind::Dynamic,
                position,
                self.half_extents,
                CollisionLayer::DEFAULT,
            )
            .map_err(SessionError::ResourceCreation)?;

        let render_handle = match render.create_box_primitive(self.half_extents) {
            Ok(h) => h,
            Err(e) => {
                rollback_body(physics, body);
                return Err(SessionError::ResourceCreation(e));
            }
        };

        let initial = physics
            .orientation(body)
            .and_then(|q| render.set_transform(render_handle, position, q));
        if let Err(e) = initial {
            rollback_body(physics, body);
            if let Err(re) = render.remove_primitive(render_handle) {
                warn!("rollback of primitive {render_handle} failed: {re}");
            }
            return Err(SessionError::ResourceCreation(e));
        }

        let entity = Entity {
            body,
            render: render_handle,
        };
        self.entities.push(entity);
        debug!(
            "spawned entity #{} ({body}, {render_handle}) at {position}",
            self.entities.len()
        );
        Ok(entity)
    }

    /// Copy every body's position and orientation onto its primitive, in
    /// creation order. Returns the number of entities synced.
    pub fn sync_all<P, R>(&self, physics: &P, render: &mut R) -> Result<usize, SessionError>
    where
        P: PhysicsService,
        R: RenderService,
    {
        for entity in &self.entities {
            let position = physics.position(entity.body).map_err(SessionError::Sync)?;
            let orientation = physics
                .orientation(entity.body)
                .map_err(SessionError::Sync)?;
            render
                .set_transform(entity.render, position, orientation)
                .map_err(SessionError::Sync)?;
        }
        Ok(self.entities.len())
    }

    /// Release both resources of every entity and empty the registry.
    ///
    /// Every release is attempted; the first failure is returned.
    pub fn release_all<P, R>(&mut self, physics: &mut P, render: &mut R) -> Result<(), SessionError>
    where
        P: PhysicsService,
        R: RenderService,
    {
        let mut first: Option<ServiceError> = None;
        for entity in self.entities.drain(..) {
            if let Err(e) = render.remove_primitive(entity.render) {
                warn!("failed to remove primitive {}: {e}", entity.render);
                first = first.or(Some(e));
            }
            if let Err(e) = physics.destroy_body(entity.body) {
                warn!("failed to destroy body {}: {e}", entity.body);
                first = first.or(Some(e));
            }
        }
        match first {
            Some(e) => Err(SessionError::Release(e)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }
}

fn rollback_body<P: PhysicsService>(physics: &mut P, body: BodyHandle) {
    if let Err(e) = physics.destroy_body(body) {
        warn!("rollback of body {body} failed: {e}");
    }
}
