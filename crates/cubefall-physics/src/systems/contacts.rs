//! Box contact resolution.
//!
//! Boxes are treated as axis-aligned for contact purposes. Each solver
//! iteration pushes every overlapping pair apart along the axis of least
//! penetration and removes the approaching part of the velocity, so contacts
//! are fully inelastic.

use glam::DVec3;
use hecs::{Entity, World};

use cubefall_core::enums::MotionKind;
use cubefall_core::types::CollisionLayer;

use crate::components::{AngularVelocity, BodyShape, LinearVelocity, Pose};
use crate::layers::LayerTable;

/// Angular velocity kept per resolved contact.
const CONTACT_SPIN_DAMPING: f64 = 0.9;

/// Working copy of one body for the duration of a step.
#[derive(Debug, Clone, Copy)]
pub struct ContactProxy {
    entity: Entity,
    center: DVec3,
    half_extents: DVec3,
    dynamic: bool,
    layer: CollisionLayer,
    velocity: DVec3,
    touched: bool,
}

/// Resolve contacts with `iterations` passes. `proxies` is a reusable buffer.
pub fn run(
    world: &mut World,
    layers: &LayerTable,
    iterations: u32,
    proxies: &mut Vec<ContactProxy>,
) {
    proxies.clear();

    for (entity, (pose, shape, motion, layer, velocity)) in world
        .query::<(
            &Pose,
            &BodyShape,
            &MotionKind,
            &CollisionLayer,
            Option<&LinearVelocity>,
        )>()
        .iter()
    {
        proxies.push(ContactProxy {
            entity,
            center: pose.position,
            half_extents: shape.half_extents,
            dynamic: *motion == MotionKind::Dynamic,
            layer: *layer,
            velocity: velocity.map(|v| v.0).unwrap_or(DVec3::ZERO),
            touched: false,
        });
    }

    for _ in 0..iterations {
        for i in 0..proxies.len() {
            for j in (i + 1)..proxies.len() {
                let (a, b) = (proxies[i], proxies[j]);
                if !(a.dynamic || b.dynamic) || !layers.collides(a.layer, b.layer) {
                    continue;
                }
                let Some((normal, depth)) = penetration(&a, &b) else {
                    continue;
                };

                // `normal` points from a towards b.
                let (share_a, share_b) = match (a.dynamic, b.dynamic) {
                    (true, true) => (0.5, 0.5),
                    (true, false) => (1.0, 0.0),
                    _ => (0.0, 1.0),
                };
                resolve(&mut proxies[i], -normal, depth * share_a);
                resolve(&mut proxies[j], normal, depth * share_b);
            }
        }
    }

    for proxy in proxies.iter().filter(|p| p.dynamic) {
        if let Ok((pose, linear, angular)) = world
            .query_one_mut::<(&mut Pose, &mut LinearVelocity, &mut AngularVelocity)>(proxy.entity)
        {
            pose.position = proxy.center;
            linear.0 = proxy.velocity;
            if proxy.touched {
                angular.0 *= CONTACT_SPIN_DAMPING;
            }
        }
    }
}

/// Move `proxy` by `depth` along `push` and drop velocity heading against it.
fn resolve(proxy: &mut ContactProxy, push: DVec3, depth: f64) {
    if !proxy.dynamic || depth <= 0.0 {
        return;
    }
    proxy.center += push * depth;
    let approach = proxy.velocity.dot(push);
    if approach < 0.0 {
        proxy.velocity -= push * approach;
    }
    proxy.touched = true;
}

/// Axis of least penetration (unit, a -> b) and depth, if the boxes overlap.
fn penetration(a: &ContactProxy, b: &ContactProxy) -> Option<(DVec3, f64)> {
    let delta = b.center - a.center;
    let overlap = (a.half_extents + b.half_extents) - delta.abs();
    if overlap.min_element() <= 0.0 {
        return None;
    }

    let (axis, depth) = if overlap.x <= overlap.y && overlap.x <= overlap.z {
        (DVec3::X, overlap.x)
    } else if overlap.y <= overlap.z {
        (DVec3::Y, overlap.y)
    } else {
        (DVec3::Z, overlap.z)
    };
    let side = if delta.dot(axis) < 0.0 { -1.0 } else { 1.0 };
    Some((axis * side, depth))
}
