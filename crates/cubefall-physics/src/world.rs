//! `BoxPhysicsWorld`: the hecs-backed physics service.

use glam::{DQuat, DVec3};
use hecs::{Entity, World};
use log::trace;

use cubefall_core::config::WorldConfig;
use cubefall_core::enums::MotionKind;
use cubefall_core::error::ServiceError;
use cubefall_core::services::PhysicsService;
use cubefall_core::types::{BodyHandle, CollisionLayer};

use crate::components::{Active, AngularVelocity, BodyShape, LinearVelocity, Pose};
use crate::layers::LayerTable;
use crate::systems;
use crate::systems::contacts::ContactProxy;

/// Construction parameters for the physics world.
#[derive(Debug, Clone)]
pub struct PhysicsSettings {
    pub gravity: DVec3,
    pub layers: LayerTable,
    /// Refuse to create bodies past this count.
    pub max_bodies: Option<usize>,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self::from(&WorldConfig::default())
    }
}

impl From<&WorldConfig> for PhysicsSettings {
    fn from(config: &WorldConfig) -> Self {
        Self {
            gravity: config.gravity(),
            layers: LayerTable::default(),
            max_bodies: None,
        }
    }
}

pub struct BoxPhysicsWorld {
    world: World,
    settings: PhysicsSettings,
    proxies: Vec<ContactProxy>,
    steps: u64,
}

impl BoxPhysicsWorld {
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            world: World::new(),
            settings,
            proxies: Vec::new(),
            steps: 0,
        }
    }

    /// Steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Read-only access to the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Result<DVec3, ServiceError> {
        let entity = self.entity(handle)?;
        self.world
            .get::<&LinearVelocity>(entity)
            .map(|v| v.0)
            .map_err(|_| ServiceError::UnknownBody(handle))
    }

    pub fn set_linear_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: DVec3,
    ) -> Result<(), ServiceError> {
        let entity = self.entity(handle)?;
        let mut v = self
            .world
            .get::<&mut LinearVelocity>(entity)
            .map_err(|_| ServiceError::UnknownBody(handle))?;
        v.0 = velocity;
        Ok(())
    }

    pub fn set_angular_velocity(
        &mut self,
        handle: BodyHandle,
        velocity: DVec3,
    ) -> Result<(), ServiceError> {
        let entity = self.entity(handle)?;
        let mut w = self
            .world
            .get::<&mut AngularVelocity>(entity)
            .map_err(|_| ServiceError::UnknownBody(handle))?;
        w.0 = velocity;
        Ok(())
    }

    /// Add or remove a dynamic body from integration. Static bodies ignore this.
    pub fn set_active(&mut self, handle: BodyHandle, active: bool) -> Result<(), ServiceError> {
        let entity = self.entity(handle)?;
        let is_dynamic = self
            .world
            .get::<&MotionKind>(entity)
            .map(|m| *m == MotionKind::Dynamic)
            .map_err(|_| ServiceError::UnknownBody(handle))?;
        if !is_dynamic {
            return Ok(());
        }
        if active {
            self.world
                .insert_one(entity, Active)
                .map_err(|_| ServiceError::UnknownBody(handle))?;
        } else if self.world.get::<&Active>(entity).is_ok() {
            self.world
                .remove_one::<Active>(entity)
                .map_err(|_| ServiceError::UnknownBody(handle))?;
        }
        Ok(())
    }

    pub fn is_active(&self, handle: BodyHandle) -> bool {
        self.entity(handle)
            .map(|e| self.world.get::<&Active>(e).is_ok())
            .unwrap_or(false)
    }

    fn entity(&self, handle: BodyHandle) -> Result<Entity, ServiceError> {
        Entity::from_bits(handle.0)
            .filter(|e| self.world.contains(*e))
            .ok_or(ServiceError::UnknownBody(handle))
    }

    fn pose(&self, handle: BodyHandle) -> Result<Pose, ServiceError> {
        let entity = self.entity(handle)?;
        self.world
            .get::<&Pose>(entity)
            .map(|p| *p)
            .map_err(|_| ServiceError::UnknownBody(handle))
    }
}

impl PhysicsService for BoxPhysicsWorld {
    fn create_box_body(
        &mut self,
        motion: MotionKind,
        position: DVec3,
        half_extents: DVec3,
        layer: CollisionLayer,
    ) -> Result<BodyHandle, ServiceError> {
        if let Some(max) = self.settings.max_bodies {
            if self.body_count() >= max {
                return Err(ServiceError::BodyCreation(format!(
                    "capacity of {max} bodies reached"
                )));
            }
        }
        if !position.is_finite() {
            return Err(ServiceError::BodyCreation(format!(
                "non-finite position {position}"
            )));
        }
        if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
            return Err(ServiceError::BodyCreation(format!(
                "invalid half extents {half_extents}"
            )));
        }
        if !self.settings.layers.contains(layer) {
            return Err(ServiceError::BodyCreation(format!(
                "unknown collision layer {}",
                layer.0
            )));
        }

        let pose = Pose {
            position,
            orientation: DQuat::IDENTITY,
        };
        let shape = BodyShape { half_extents };
        let entity = match motion {
            MotionKind::Static => self.world.spawn((pose, shape, motion, layer)),
            // Dynamic bodies start active.
            MotionKind::Dynamic => self.world.spawn((
                pose,
                shape,
                motion,
                layer,
                LinearVelocity::default(),
                AngularVelocity::default(),
                Active,
            )),
        };

        let handle = BodyHandle(entity.to_bits().get());
        trace!("created {motion:?} body {handle} at {position}");
        Ok(handle)
    }

    fn destroy_body(&mut self, handle: BodyHandle) -> Result<(), ServiceError> {
        let entity = self.entity(handle)?;
        self.world
            .despawn(entity)
            .map_err(|_| ServiceError::UnknownBody(handle))?;
        trace!("destroyed body {handle}");
        Ok(())
    }

    fn step(&mut self, delta_secs: f64, solver_iterations: u32) {
        systems::integrate::run(&mut self.world, self.settings.gravity, delta_secs);
        systems::contacts::run(
            &mut self.world,
            &self.settings.layers,
            solver_iterations.max(1),
            &mut self.proxies,
        );
        self.steps += 1;
    }

    fn position(&self, handle: BodyHandle) -> Result<DVec3, ServiceError> {
        self.pose(handle).map(|p| p.position)
    }

    fn orientation(&self, handle: BodyHandle) -> Result<DQuat, ServiceError> {
        self.pose(handle).map(|p| p.orientation)
    }

    fn body_count(&self) -> usize {
        self.world.len() as usize
    }
}
