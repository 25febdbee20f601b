//! Tests for the reference physics service.

use glam::{DQuat, DVec3};

use cubefall_core::constants::FIXED_STEP;
use cubefall_core::enums::MotionKind;
use cubefall_core::error::ServiceError;
use cubefall_core::services::PhysicsService;
use cubefall_core::types::{BodyHandle, CollisionLayer};

use crate::layers::LayerTable;
use crate::world::{BoxPhysicsWorld, PhysicsSettings};

fn world_with_ground() -> (BoxPhysicsWorld, BodyHandle) {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let ground = world
        .create_box_body(
            MotionKind::Static,
            DVec3::ZERO,
            DVec3::new(25.0, 1.0, 25.0),
            CollisionLayer::DEFAULT,
        )
        .unwrap();
    (world, ground)
}

fn drop_cube(world: &mut BoxPhysicsWorld, position: DVec3) -> BodyHandle {
    world
        .create_box_body(
            MotionKind::Dynamic,
            position,
            DVec3::ONE,
            CollisionLayer::DEFAULT,
        )
        .unwrap()
}

// ---- Creation ----

#[test]
fn test_created_bodies_report_initial_pose() {
    let (mut world, ground) = world_with_ground();
    let cube = drop_cube(&mut world, DVec3::new(1.5, 15.0, 2.0));

    assert_eq!(world.body_count(), 2);
    assert_eq!(world.position(ground).unwrap(), DVec3::ZERO);
    assert_eq!(world.position(cube).unwrap(), DVec3::new(1.5, 15.0, 2.0));
    assert_eq!(world.orientation(cube).unwrap(), DQuat::IDENTITY);
    assert!(world.is_active(cube));
    assert!(!world.is_active(ground));
}

#[test]
fn test_creation_respects_capacity() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings {
        max_bodies: Some(1),
        ..Default::default()
    });
    drop_cube(&mut world, DVec3::ZERO);
    let err = world
        .create_box_body(
            MotionKind::Dynamic,
            DVec3::ZERO,
            DVec3::ONE,
            CollisionLayer::DEFAULT,
        )
        .unwrap_err();
    assert!(matches!(err, ServiceError::BodyCreation(_)));
    assert_eq!(world.body_count(), 1);
}

#[test]
fn test_creation_rejects_invalid_input() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let bad_position = world.create_box_body(
        MotionKind::Dynamic,
        DVec3::new(f64::NAN, 0.0, 0.0),
        DVec3::ONE,
        CollisionLayer::DEFAULT,
    );
    assert!(matches!(bad_position, Err(ServiceError::BodyCreation(_))));

    let bad_extents = world.create_box_body(
        MotionKind::Dynamic,
        DVec3::ZERO,
        DVec3::new(1.0, 0.0, 1.0),
        CollisionLayer::DEFAULT,
    );
    assert!(matches!(bad_extents, Err(ServiceError::BodyCreation(_))));

    let bad_layer = world.create_box_body(
        MotionKind::Dynamic,
        DVec3::ZERO,
        DVec3::ONE,
        CollisionLayer(4),
    );
    assert!(matches!(bad_layer, Err(ServiceError::BodyCreation(_))));
    assert_eq!(world.body_count(), 0);
}

#[test]
fn test_destroyed_body_is_unknown() {
    let (mut world, _ground) = world_with_ground();
    let cube = drop_cube(&mut world, DVec3::new(0.0, 10.0, 0.0));
    world.destroy_body(cube).unwrap();

    assert_eq!(world.body_count(), 1);
    assert!(matches!(
        world.position(cube),
        Err(ServiceError::UnknownBody(h)) if h == cube
    ));
    assert!(world.destroy_body(cube).is_err());
}

#[test]
fn test_garbage_handle_is_unknown() {
    let world = BoxPhysicsWorld::new(PhysicsSettings::default());
    assert!(world.position(BodyHandle(0)).is_err());
    assert!(world.orientation(BodyHandle(u64::MAX)).is_err());
}

// ---- Integration ----

#[test]
fn test_free_fall_matches_semi_implicit_euler() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let cube = drop_cube(&mut world, DVec3::new(0.0, 100.0, 0.0));

    let steps = 30;
    for _ in 0..steps {
        world.step(FIXED_STEP, 1);
    }

    // y_n = y_0 - g dt^2 n(n+1)/2 for velocity-first integration.
    let n = steps as f64;
    let expected = 100.0 - 9.81 * FIXED_STEP * FIXED_STEP * n * (n + 1.0) / 2.0;
    let y = world.position(cube).unwrap().y;
    assert!((y - expected).abs() < 1e-9, "y = {y}, expected {expected}");
    assert_eq!(world.steps(), steps);
}

#[test]
fn test_static_bodies_do_not_move() {
    let (mut world, ground) = world_with_ground();
    for _ in 0..120 {
        world.step(FIXED_STEP, 1);
    }
    assert_eq!(world.position(ground).unwrap(), DVec3::ZERO);
}

#[test]
fn test_inactive_body_is_not_integrated() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let cube = drop_cube(&mut world, DVec3::new(0.0, 5.0, 0.0));
    world.set_active(cube, false).unwrap();
    world.step(FIXED_STEP, 1);
    assert_eq!(world.position(cube).unwrap().y, 5.0);

    world.set_active(cube, true).unwrap();
    world.step(FIXED_STEP, 1);
    assert!(world.position(cube).unwrap().y < 5.0);
}

#[test]
fn test_angular_velocity_rotates_body() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let cube = drop_cube(&mut world, DVec3::new(0.0, 50.0, 0.0));
    world
        .set_angular_velocity(cube, DVec3::new(0.0, std::f64::consts::PI, 0.0))
        .unwrap();
    for _ in 0..60 {
        world.step(FIXED_STEP, 1);
    }
    let q = world.orientation(cube).unwrap();
    assert!(q.is_normalized());
    // Half a turn around Y after one second.
    let angle = q.angle_between(DQuat::IDENTITY);
    assert!((angle - std::f64::consts::PI).abs() < 1e-6, "angle = {angle}");
}

#[test]
fn test_linear_velocity_carries_body_sideways() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let cube = drop_cube(&mut world, DVec3::new(0.0, 50.0, 0.0));
    world
        .set_linear_velocity(cube, DVec3::new(3.0, 0.0, -1.5))
        .unwrap();
    for _ in 0..60 {
        world.step(FIXED_STEP, 1);
    }
    let pos = world.position(cube).unwrap();
    assert!((pos.x - 3.0).abs() < 1e-9, "x = {}", pos.x);
    assert!((pos.z + 1.5).abs() < 1e-9, "z = {}", pos.z);
    assert_eq!(world.linear_velocity(cube).unwrap().x, 3.0);
}

#[test]
fn test_deactivating_twice_is_harmless() {
    let mut world = BoxPhysicsWorld::new(PhysicsSettings::default());
    let cube = drop_cube(&mut world, DVec3::new(0.0, 5.0, 0.0));
    world.set_active(cube, false).unwrap();
    world.set_active(cube, false).unwrap();
    assert!(!world.is_active(cube));
    world.set_active(cube, true).unwrap();
    assert!(world.is_active(cube));
}

// ---- Contacts ----

#[test]
fn test_cube_comes_to_rest_on_ground() {
    let (mut world, _ground) = world_with_ground();
    let cube = drop_cube(&mut world, DVec3::new(0.0, 15.0, 0.0));

    for _ in 0..600 {
        world.step(FIXED_STEP, 1);
    }

    // Ground top at y = 1, cube half height 1.
    let pos = world.position(cube).unwrap();
    assert!((pos.y - 2.0).abs() < 0.01, "cube rests at y = {}", pos.y);
    assert!(world.linear_velocity(cube).unwrap().y.abs() < 0.2);
}

#[test]
fn test_stacked_cubes_do_not_interpenetrate() {
    let (mut world, _ground) = world_with_ground();
    let lower = drop_cube(&mut world, DVec3::new(0.0, 5.0, 0.0));
    let upper = drop_cube(&mut world, DVec3::new(0.2, 9.0, 0.1));

    for _ in 0..900 {
        world.step(FIXED_STEP, 4);
    }

    let a = world.position(lower).unwrap();
    let b = world.position(upper).unwrap();
    let gap = (b - a).abs();
    assert!(
        gap.x >= 1.9 || gap.y >= 1.9 || gap.z >= 1.9,
        "cubes overlap: {a} vs {b}"
    );
    assert!(a.y >= 1.9 && b.y >= 1.9);
}

#[test]
fn test_layers_without_collision_pass_through() {
    let mut layers = LayerTable::new(2);
    layers.enable_collision(CollisionLayer(0), CollisionLayer(0));
    let mut world = BoxPhysicsWorld::new(PhysicsSettings {
        layers,
        ..Default::default()
    });
    world
        .create_box_body(
            MotionKind::Static,
            DVec3::ZERO,
            DVec3::new(25.0, 1.0, 25.0),
            CollisionLayer(0),
        )
        .unwrap();
    let ghost = world
        .create_box_body(
            MotionKind::Dynamic,
            DVec3::new(0.0, 5.0, 0.0),
            DVec3::ONE,
            CollisionLayer(1),
        )
        .unwrap();

    for _ in 0..120 {
        world.step(FIXED_STEP, 1);
    }
    assert!(world.position(ghost).unwrap().y < 0.0);
}

#[test]
fn test_stepping_is_deterministic() {
    let run = || {
        let (mut world, _ground) = world_with_ground();
        let cubes: Vec<_> = (0..8)
            .map(|i| drop_cube(&mut world, DVec3::new(i as f64 * 0.7, 4.0 + i as f64 * 2.5, 0.3)))
            .collect();
        for _ in 0..300 {
            world.step(FIXED_STEP, 1);
        }
        cubes
            .iter()
            .map(|c| world.position(*c).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
