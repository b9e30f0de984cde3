use super::constraint::Constraint;
use crate::core::rigidbody::RigidBody;
use crate::utils::allocator::Arena;
use crate::utils::logging::PhaseTimer;

/// Minimal sequential-impulse loop: one build pass, then `iterations` solve
/// passes over every constraint. Island management and scheduling live with
/// the caller; this just fixes the build-once/solve-N contract.
#[derive(Debug, Clone)]
pub struct SequentialImpulseSolver {
    pub iterations: u32,
}

impl Default for SequentialImpulseSolver {
    fn default() -> Self {
        Self { iterations: 4 }
    }
}

impl SequentialImpulseSolver {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn solve(
        &self,
        bodies: &mut Arena<RigidBody>,
        constraints: &mut [Constraint],
        step: f32,
    ) {
        let _timer = PhaseTimer::new("constraint solve");

        for constraint in constraints.iter_mut() {
            let (id_a, id_b) = constraint.bodies();
            if let Some((body_a, body_b)) = bodies.get2_mut(id_a, id_b) {
                constraint.build_jacobian(body_a, body_b);
            }
        }

        for _ in 0..self.iterations {
            for constraint in constraints.iter_mut() {
                let (id_a, id_b) = constraint.bodies();
                if let Some((body_a, body_b)) = bodies.get2_mut(id_a, id_b) {
                    constraint.solve(body_a, body_b, step);
                }
            }
        }
    }
}
