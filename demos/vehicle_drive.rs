use rigid_impulse::*;

const DT: f32 = 1.0 / 60.0;

fn main() {
    let mut bodies = Arena::new();

    let chassis = bodies.insert_with(|id| {
        let mut body =
            RigidBody::new(id, MassProperties::solid_box(Vec3::new(1.0, 0.5, 2.0), 800.0));
        body.set_center_of_mass_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        body.set_gravity(Vec3::new(0.0, -9.81, 0.0));
        body
    });
    let ground = bodies.insert_with(RigidBody::fixed);

    let mut vehicle = RaycastVehicle::new(chassis, ground);
    for (x, z, front) in [
        (-1.0, 1.8, true),
        (1.0, 1.8, true),
        (-1.0, -1.8, false),
        (1.0, -1.8, false),
    ] {
        vehicle.add_wheel(WheelConstructionInfo {
            chassis_connection_cs: Vec3::new(x, -0.3, z),
            wheel_axle_cs: Vec3::NEG_X,
            is_front_wheel: front,
            ..WheelConstructionInfo::default()
        });
    }

    let mut ray = PlaneRaycaster::new(0.0);
    for frame in 0..=600 {
        // Drive off once the suspension has settled, steering gently left.
        if frame == 120 {
            for i in 0..vehicle.num_wheels() {
                if vehicle.wheel(i).is_front_wheel {
                    vehicle.set_steering_value(0.15, i);
                } else {
                    vehicle.apply_engine_force(1500.0, i);
                }
            }
        }

        for body in bodies.iter_mut() {
            body.apply_forces(DT);
            body.integrate_velocities(DT);
        }
        vehicle.update_vehicle(&mut bodies, &mut ray, DT);
        for body in bodies.iter_mut() {
            let predicted = body.predict_integrated_transform(DT);
            body.proceed_to_transform(predicted);
        }

        if frame % 120 == 0 {
            let body = bodies.get(chassis).unwrap();
            println!(
                "t = {:.1}s  pos {:?}  speed {:.1} km/h",
                frame as f32 * DT,
                body.transform.position,
                vehicle.current_speed_kmh()
            );
        }
    }
}
