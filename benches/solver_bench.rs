use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rigid_impulse::*;
use std::hint::black_box;

const DT: f32 = 1.0 / 60.0;

fn build_chain(links: usize) -> (Arena<RigidBody>, Vec<Constraint>) {
    let mut bodies = Arena::new();
    let mut constraints = Vec::new();

    let anchor = bodies.insert_with(RigidBody::fixed);
    let mut previous = anchor;
    for i in 1..=links {
        let body = bodies.insert_with(|id| {
            let mut body = RigidBody::new(id, MassProperties::default());
            body.set_center_of_mass_transform(Transform::from_position(Vec3::new(
                i as f32, 0.0, 0.0,
            )));
            body.set_gravity(Vec3::new(0.0, -10.0, 0.0));
            body
        });
        constraints.push(Constraint::PointToPoint(PointToPointConstraint::new(
            previous,
            body,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-0.5, 0.0, 0.0),
        )));
        previous = body;
    }
    (bodies, constraints)
}

fn step_chain(bodies: &mut Arena<RigidBody>, constraints: &mut [Constraint], solver: &SequentialImpulseSolver) {
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

fn bench_chain_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_step");
    for &links in &[8usize, 64, 256] {
        group.bench_with_input(BenchmarkId::new("p2p", links), &links, |b, &links| {
            let (mut bodies, mut constraints) = build_chain(links);
            let solver = SequentialImpulseSolver::default();
            b.iter(|| {
                step_chain(&mut bodies, &mut constraints, &solver);
                black_box(bodies.len())
            })
        });
    }
    group.finish();
}

fn bench_solver_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_iterations");
    for &iters in &[1u32, 4, 16] {
        group.bench_with_input(BenchmarkId::new("chain64", iters), &iters, |b, &iters| {
            let (mut bodies, mut constraints) = build_chain(64);
            let solver = SequentialImpulseSolver::new(iters);
            b.iter(|| {
                solver.solve(&mut bodies, &mut constraints, black_box(DT));
            })
        });
    }
    group.finish();
}

fn bench_vehicle_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("vehicle_step");
    group.bench_function("four_wheels", |b| {
        let mut bodies = Arena::new();
        let chassis = bodies.insert_with(|id| {
            let mut body =
                RigidBody::new(id, MassProperties::solid_box(Vec3::new(1.0, 0.5, 2.0), 800.0));
            body.set_center_of_mass_transform(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
            body.set_gravity(Vec3::new(0.0, -10.0, 0.0));
            body
        });
        let ground = bodies.insert_with(RigidBody::fixed);
        let mut vehicle = RaycastVehicle::new(chassis, ground);
        for (x, z) in [(-1.0, 1.8), (1.0, 1.8), (-1.0, -1.8), (1.0, -1.8)] {
            vehicle.add_wheel(WheelConstructionInfo {
                chassis_connection_cs: Vec3::new(x, -0.3, z),
                wheel_axle_cs: Vec3::NEG_X,
                ..WheelConstructionInfo::default()
            });
        }
        let mut ray = PlaneRaycaster::new(0.0);
        b.iter(|| {
            vehicle.update_vehicle(&mut bodies, &mut ray, black_box(DT));
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_chain_step,
    bench_solver_iterations,
    bench_vehicle_step
);
criterion_main!(benches);
