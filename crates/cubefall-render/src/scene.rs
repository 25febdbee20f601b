use glam::{DMat4, DQuat, DVec3};
use log::trace;

use cubefall_core::camera::Camera;
use cubefall_core::error::ServiceError;
use cubefall_core::services::RenderService;
use cubefall_core::types::{RenderHandle, Transform};

/// A box mesh in the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePrimitive {
    pub half_extents: DVec3,
    pub transform: Transform,
}

impl ScenePrimitive {
    pub fn model_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            self.half_extents * 2.0,
            self.transform.orientation,
            self.transform.position,
        )
    }
}

/// Scene graph with generational slot storage, so a stale handle never
/// aliases a primitive created later in the same slot.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    slots: Vec<Option<ScenePrimitive>>,
    generations: Vec<u32>,
    free: Vec<u32>,
    live: usize,
    frames_presented: u64,
    viewport: (u32, u32),
    last_view_projection: Option<DMat4>,
    max_primitives: Option<usize>,
}

impl HeadlessScene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width, height),
            ..Default::default()
        }
    }

    /// Refuse to create primitives past `max`.
    pub fn with_capacity_limit(mut self, max: usize) -> Self {
        self.max_primitives = Some(max);
        self
    }

    pub fn get(&self, handle: RenderHandle) -> Option<&ScenePrimitive> {
        if !self.is_alive(handle) {
            return None;
        }
        self.slots[handle.index as usize].as_ref()
    }

    pub fn primitive_count(&self) -> usize {
        self.live
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// View-projection of the camera used by the last presented frame.
    pub fn last_view_projection(&self) -> Option<DMat4> {
        self.last_view_projection
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderHandle, &ScenePrimitive)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|p| (RenderHandle::new(i as u32, self.generations[i]), p))
        })
    }

    fn is_alive(&self, handle: RenderHandle) -> bool {
        let idx = handle.index as usize;
        idx < self.slots.len()
            && self.generations[idx] == handle.generation
            && self.slots[idx].is_some()
    }

    fn allocate(&mut self, primitive: ScenePrimitive) -> RenderHandle {
        let handle = if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(primitive);
            RenderHandle::new(index, self.generations[index as usize])
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Some(primitive));
            self.generations.push(0);
            RenderHandle::new(index, 0)
        };
        self.live += 1;
        handle
    }
}

impl RenderService for HeadlessScene {
    fn create_box_primitive(&mut self, half_extents: DVec3) -> Result<RenderHandle, ServiceError> {
        if let Some(max) = self.max_primitives {
            if self.live >= max {
                return Err(ServiceError::PrimitiveCreation(format!(
                    "capacity of {max} primitives reached"
                )));
            }
        }
        if !half_extents.is_finite() || half_extents.min_element() <= 0.0 {
            return Err(ServiceError::PrimitiveCreation(format!(
                "invalid half extents {half_extents}"
            )));
        }

        let handle = self.allocate(ScenePrimitive {
            half_extents,
            transform: Transform::default(),
        });
        trace!("created primitive {handle}");
        Ok(handle)
    }

    fn remove_primitive(&mut self, handle: RenderHandle) -> Result<(), ServiceError> {
        if !self.is_alive(handle) {
            return Err(ServiceError::UnknownPrimitive(handle));
        }
        let idx = handle.index as usize;
        self.slots[idx] = None;
        self.generations[idx] += 1;
        self.free.push(handle.index);
        self.live -= 1;
        Ok(())
    }

    fn set_transform(
        &mut self,
        handle: RenderHandle,
        position: DVec3,
        orientation: DQuat,
    ) -> Result<(), ServiceError> {
        if !self.is_alive(handle) {
            return Err(ServiceError::UnknownPrimitive(handle));
        }
        if let Some(primitive) = self.slots[handle.index as usize].as_mut() {
            primitive.transform = Transform::new(position, orientation);
        }
        Ok(())
    }

    fn present_frame(&mut self, camera: &Camera) -> Result<(), ServiceError> {
        let view_projection = camera.projection() * camera.view();
        if !view_projection.is_finite() {
            return Err(ServiceError::Present("degenerate camera".into()));
        }
        self.last_view_projection = Some(view_projection);
        self.frames_presented += 1;
        Ok(())
    }

    fn resize_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}
