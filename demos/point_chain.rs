use rigid_impulse::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mut bodies = Arena::new();
    let mut constraints: Vec<Constraint> = Vec::new();

    // Static anchor with a chain of five links swinging under gravity.
    let anchor = bodies.insert_with(RigidBody::fixed);
    let mut previous = anchor;
    for i in 1..=5 {
        let link = bodies.insert_with(|id| {
            let mut body = RigidBody::new(id, MassProperties::default());
            body.set_center_of_mass_transform(Transform::from_position(Vec3::new(
                i as f32, 0.0, 0.0,
            )));
            body.set_gravity(Vec3::new(0.0, -9.81, 0.0));
            body
        });
        constraints.push(Constraint::PointToPoint(PointToPointConstraint::new(
            previous,
            link,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-0.5, 0.0, 0.0),
        )));
        previous = link;
    }

    let solver = SequentialImpulseSolver::default();
    for frame in 0..=240 {
        for body in bodies.iter_mut() {
            body.apply_forces(DT);
            body.integrate_velocities(DT);
        }
        solver.solve(&mut bodies, &mut constraints, DT);
        for body in bodies.iter_mut() {
            let predicted = body.predict_integrated_transform(DT);
            body.proceed_to_transform(predicted);
        }

        if frame % 60 == 0 {
            let tip = bodies.get(previous).unwrap();
            println!(
                "t = {:.1}s  chain tip at {:?}",
                frame as f32 * DT,
                tip.transform.position
            );
        }
    }
}
