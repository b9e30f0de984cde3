use glam::Vec3;
use rigid_impulse::{
    Arena, Constraint, EntityId, HingeConstraint, MassProperties, PointToPointConstraint,
    RigidBody, SequentialImpulseSolver, SixDofConstraint, SolvableConstraint, Transform,
};

const DT: f32 = 1.0 / 60.0;

fn dynamic_body(bodies: &mut Arena<RigidBody>, position: Vec3) -> EntityId {
    bodies.insert_with(|id| {
        let mut body = RigidBody::new(id, MassProperties::default());
        body.set_center_of_mass_transform(Transform::from_position(position));
        body
    })
}

fn static_body(bodies: &mut Arena<RigidBody>, position: Vec3) -> EntityId {
    bodies.insert_with(|id| {
        let mut body = RigidBody::fixed(id);
        body.set_center_of_mass_transform(Transform::from_position(position));
        body
    })
}

fn step(
    bodies: &mut Arena<RigidBody>,
    constraints: &mut [Constraint],
    solver: &SequentialImpulseSolver,
) {
    for body in bodies.iter_mut() {
        body.apply_forces(DT);
        body.integrate_velocities(DT);
    }
    solver.solve(bodies, constraints, DT);
    for body in bodies.iter_mut() {
        let predicted = body.predict_integrated_transform(DT);
        body.proceed_to_transform(predicted);
    }
}

#[test]
fn point_joint_holds_a_pendulum_under_gravity() {
    let mut bodies = Arena::new();
    let anchor = static_body(&mut bodies, Vec3::ZERO);
    let bob = dynamic_body(&mut bodies, Vec3::new(0.0, -1.0, 0.0));
    bodies
        .get_mut(bob)
        .unwrap()
        .set_gravity(Vec3::new(0.0, -10.0, 0.0));

    let mut constraints = vec![Constraint::PointToPoint(PointToPointConstraint::new(
        anchor,
        bob,
        Vec3::new(0.0, -1.0, 0.0),
        Vec3::ZERO,
    ))];
    let solver = SequentialImpulseSolver::default();

    for _ in 0..120 {
        step(&mut bodies, &mut constraints, &solver);
    }

    let bob_body = bodies.get(bob).unwrap();
    let pivot_gap = (bob_body.transform.position - Vec3::new(0.0, -1.0, 0.0)).length();
    println!("pivot gap after 2s: {}", pivot_gap);
    assert!(pivot_gap < 0.1);

    // Anchor is static and must not have budged.
    let anchor_body = bodies.get(anchor).unwrap();
    assert!(anchor_body.transform.position.length() < 1e-9);
}

#[test]
fn point_joint_conserves_pair_momentum() {
    let mut bodies = Arena::new();
    let a = dynamic_body(&mut bodies, Vec3::ZERO);
    let b = dynamic_body(&mut bodies, Vec3::new(1.5, 0.0, 0.0));

    let mut constraints = vec![Constraint::PointToPoint(PointToPointConstraint::new(
        a,
        b,
        Vec3::ZERO,
        Vec3::ZERO,
    ))];
    let solver = SequentialImpulseSolver::default();

    for _ in 0..60 {
        step(&mut bodies, &mut constraints, &solver);
    }

    let momentum =
        bodies.get(a).unwrap().velocity.linear + bodies.get(b).unwrap().velocity.linear;
    assert!(momentum.length() < 1e-3);
    // The gap between the pivots shrinks.
    let gap = (bodies.get(a).unwrap().transform.position
        - bodies.get(b).unwrap().transform.position)
        .length();
    assert!(gap < 1.5);
}

#[test]
fn rigid_setting_converges_at_fixed_pose() {
    // Bodies held in place: repeated solves must drive the relative pivot
    // velocity to depth * tau / dt and nothing further.
    let mut a = RigidBody::new(EntityId::from_index(0), MassProperties::default());
    let mut b = RigidBody::new(EntityId::from_index(1), MassProperties::default());
    b.set_center_of_mass_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)));

    let mut joint = PointToPointConstraint::new(a.id, b.id, Vec3::ZERO, Vec3::ZERO);
    joint.setting.tau = 1.0;
    joint.setting.damping = 1.0;

    joint.build_jacobian(&mut a, &mut b);
    for _ in 0..60 {
        joint.solve(&mut a, &mut b, DT);
    }

    let rel_vel = a.velocity.linear.x - b.velocity.linear.x;
    let target = 1.0 / DT;
    println!("converged rel_vel: {rel_vel}, target: {target}");
    assert!((rel_vel - target).abs() < 0.5);
}

#[test]
fn hinge_pendulum_keeps_its_axis() {
    let mut bodies = Arena::new();
    let anchor = static_body(&mut bodies, Vec3::ZERO);
    let bob = dynamic_body(&mut bodies, Vec3::new(1.0, 0.0, 0.0));
    {
        let body = bodies.get_mut(bob).unwrap();
        body.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        body.velocity.angular = Vec3::new(0.5, 0.5, 0.0);
    }

    let mut constraints = vec![Constraint::Hinge(HingeConstraint::new(
        anchor,
        bob,
        Vec3::ZERO,
        Vec3::new(-1.0, 0.0, 0.0),
        Vec3::Z,
        Vec3::Z,
    ))];
    let solver = SequentialImpulseSolver::default();

    for _ in 0..120 {
        step(&mut bodies, &mut constraints, &solver);
    }

    // The body axis must still line up with the world hinge axis.
    let bob_body = bodies.get(bob).unwrap();
    let axis_world = bob_body.transform.rotation * Vec3::Z;
    println!("axis drift: {}", axis_world.dot(Vec3::Z));
    assert!(axis_world.dot(Vec3::Z) > 0.99);

    // The pivot must still sit at the anchor.
    let pivot = bob_body.transform.transform_point(Vec3::new(-1.0, 0.0, 0.0));
    assert!(pivot.length() < 0.1);
}

#[test]
fn six_dof_locked_pose_survives_gravity() {
    let mut bodies = Arena::new();
    let anchor = static_body(&mut bodies, Vec3::ZERO);
    let hanging = dynamic_body(&mut bodies, Vec3::new(0.0, -1.0, 0.0));
    bodies
        .get_mut(hanging)
        .unwrap()
        .set_gravity(Vec3::new(0.0, -10.0, 0.0));

    let mut joint = SixDofConstraint::new(
        anchor,
        hanging,
        Transform::from_position(Vec3::new(0.0, -1.0, 0.0)),
        Transform::default(),
    );
    // All six axes locked by default.
    for axis in 0..6 {
        assert!(joint.is_limited(axis));
    }
    let mut constraints = vec![Constraint::SixDof(joint)];
    let solver = SequentialImpulseSolver::default();

    for _ in 0..240 {
        step(&mut bodies, &mut constraints, &solver);
    }

    let body = bodies.get(hanging).unwrap();
    let sag = (body.transform.position - Vec3::new(0.0, -1.0, 0.0)).length();
    println!("six-dof sag: {sag}");
    assert!(sag < 0.25);
}

#[test]
fn six_dof_freed_axis_slides() {
    let mut bodies = Arena::new();
    let anchor = static_body(&mut bodies, Vec3::ZERO);
    let slider = dynamic_body(&mut bodies, Vec3::ZERO);
    bodies.get_mut(slider).unwrap().velocity.linear = Vec3::new(1.0, 0.0, 0.0);

    let mut joint =
        SixDofConstraint::new(anchor, slider, Transform::default(), Transform::default());
    // Free linear x (inverted range), keep everything else locked.
    joint.set_limit(0, 1.0, -1.0);
    let mut constraints = vec![Constraint::SixDof(joint)];
    let solver = SequentialImpulseSolver::default();

    for _ in 0..60 {
        step(&mut bodies, &mut constraints, &solver);
    }

    let body = bodies.get(slider).unwrap();
    // Still moving along x, pinned everywhere else.
    assert!(body.velocity.linear.x > 0.9);
    assert!(body.transform.position.x > 0.9);
    assert!(body.transform.position.y.abs() < 1e-2);
    assert!(body.transform.position.z.abs() < 1e-2);
}
