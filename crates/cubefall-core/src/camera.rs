//! Perspective camera looking at the drop zone.

use glam::{DMat4, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
    pub orientation: DQuat,
    /// Viewport width / height.
    pub aspect: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
    }
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            fov_degrees: CAMERA_FOV_DEGREES,
            near: CAMERA_NEAR_CLIP,
            far: CAMERA_FAR_CLIP,
            position: DVec3::from_array(CAMERA_POSITION),
            orientation: DQuat::from_rotation_x(CAMERA_PITCH),
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Track a viewport size change. A zero-height viewport (minimized window)
    /// keeps the previous aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f64 / height as f64;
    }

    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> DMat4 {
        DMat4::from_rotation_translation(self.orientation, self.position).inverse()
    }
}
