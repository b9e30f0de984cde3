use approx::assert_relative_eq;
use glam::{Quat, Vec3};
use rigid_impulse::{Arena, EntityId, MassProperties, RigidBody, Transform};

const DT: f32 = 1.0 / 60.0;

#[test]
fn free_fall_matches_closed_form() {
    let mut body = RigidBody::new(EntityId::from_index(0), MassProperties::default());
    body.set_gravity(Vec3::new(0.0, -10.0, 0.0));

    for _ in 0..60 {
        body.apply_forces(DT);
        body.integrate_velocities(DT);
        let predicted = body.predict_integrated_transform(DT);
        body.proceed_to_transform(predicted);
    }

    // One second of fall: v = -10, y ~ -5 (explicit Euler lands slightly low).
    println!("fall velocity: {}", body.velocity.linear.y);
    assert!((body.velocity.linear.y + 10.0).abs() < 1e-3);
    assert!(body.transform.position.y < -4.5 && body.transform.position.y > -5.5);
}

#[test]
fn static_body_never_moves() {
    let mut body = RigidBody::fixed(EntityId::from_index(0));
    body.set_gravity(Vec3::new(0.0, -10.0, 0.0));
    body.apply_central_force(Vec3::splat(1.0e6));
    body.apply_torque(Vec3::splat(1.0e6));
    body.apply_forces(DT);
    body.integrate_velocities(DT);
    body.apply_impulse(Vec3::splat(1.0e6), Vec3::X);

    assert_eq!(body.velocity.linear, Vec3::ZERO);
    assert_eq!(body.velocity.angular, Vec3::ZERO);
    let predicted = body.predict_integrated_transform(DT);
    assert!((predicted.position - body.transform.position).length() < 1e-9);
}

#[test]
fn kinematic_state_recovers_velocity_from_moved_pose() {
    let mut body = RigidBody::new(EntityId::from_index(0), MassProperties::default());
    let previous = body.transform;

    // Something outside the solver drags the body.
    body.proceed_to_transform(Transform::new(
        Vec3::new(0.1, 0.0, 0.0),
        Quat::from_rotation_y(0.05),
    ));
    body.save_kinematic_state(&previous, DT);

    assert_relative_eq!(body.velocity.linear.x, 6.0, epsilon = 1e-3);
    assert_relative_eq!(body.velocity.angular.y, 3.0, epsilon = 1e-2);

    // Zero step leaves the stored velocity alone.
    let kept = body.velocity;
    body.save_kinematic_state(&previous, 0.0);
    assert!((body.velocity.linear - kept.linear).length() < 1e-9);
}

#[test]
fn angular_velocity_is_clamped_per_step() {
    let mut body = RigidBody::new(EntityId::from_index(0), MassProperties::default());
    body.apply_torque(Vec3::new(0.0, 1.0e6, 0.0));
    body.integrate_velocities(DT);
    assert!(body.velocity.angular.length() * DT <= std::f32::consts::FRAC_PI_2 + 1e-3);
}

#[test]
fn arena_round_trip_keeps_body_ids_consistent() {
    let mut bodies: Arena<RigidBody> = Arena::new();
    let id = bodies.insert_with(|id| RigidBody::new(id, MassProperties::default()));
    assert_eq!(bodies.get(id).unwrap().id, id);

    bodies.remove(id);
    assert!(bodies.get(id).is_none());

    let reused = bodies.insert_with(RigidBody::fixed);
    assert_eq!(reused.index(), id.index());
    assert!(bodies.get(id).is_none());
    assert!(bodies.get(reused).unwrap().is_static());
}
