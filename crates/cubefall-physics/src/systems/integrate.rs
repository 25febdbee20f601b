//! Semi-implicit Euler integration for active dynamic bodies.

use glam::{DQuat, DVec3};
use hecs::World;

use crate::components::{Active, AngularVelocity, LinearVelocity, Pose};

/// Below this angular speed (rad/s) orientation is left untouched.
const MIN_ANGULAR_SPEED: f64 = 1e-9;

/// Apply gravity to velocity, then velocity to pose.
pub fn run(world: &mut World, gravity: DVec3, dt: f64) {
    for (_entity, (pose, linear, angular, _active)) in
        world.query_mut::<(&mut Pose, &mut LinearVelocity, &AngularVelocity, &Active)>()
    {
        linear.0 += gravity * dt;
        pose.position += linear.0 * dt;

        if angular.0.length_squared() > MIN_ANGULAR_SPEED * MIN_ANGULAR_SPEED {
            let spin = DQuat::from_scaled_axis(angular.0 * dt);
            pose.orientation = (spin * pose.orientation).normalize();
        }
    }
}
