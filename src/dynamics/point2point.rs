use glam::Vec3;

use super::constraint::{ConstraintBase, ConstraintSetting, SolvableConstraint};
use super::jacobian::JacobianEntry;
use crate::core::rigidbody::RigidBody;
use crate::utils::allocator::EntityId;

const WORLD_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Ball-socket joint: drives a pivot point, given in each body's local frame,
/// to a common world position. All three translational axes are always
/// active.
#[derive(Debug, Clone)]
pub struct PointToPointConstraint {
    pub base: ConstraintBase,
    pub pivot_in_a: Vec3,
    pub pivot_in_b: Vec3,
    pub setting: ConstraintSetting,
    jac: [JacobianEntry; 3],
    accumulated: [f32; 3],
}

impl PointToPointConstraint {
    pub fn new(body_a: EntityId, body_b: EntityId, pivot_in_a: Vec3, pivot_in_b: Vec3) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            pivot_in_a,
            pivot_in_b,
            setting: ConstraintSetting::default(),
            jac: [JacobianEntry::default(); 3],
            accumulated: [0.0; 3],
        }
    }

    pub fn set_pivot_a(&mut self, pivot: Vec3) {
        self.pivot_in_a = pivot;
    }

    pub fn set_pivot_b(&mut self, pivot: Vec3) {
        self.pivot_in_b = pivot;
    }
}

impl SolvableConstraint for PointToPointConstraint {
    fn bodies(&self) -> (EntityId, EntityId) {
        (self.base.body_a, self.base.body_b)
    }

    fn build_jacobian(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        let world_to_a = body_a.transform.basis().transpose();
        let world_to_b = body_b.transform.basis().transpose();
        let rel_pos_a = body_a.transform.rotation * self.pivot_in_a;
        let rel_pos_b = body_b.transform.rotation * self.pivot_in_b;

        for (i, axis) in WORLD_AXES.iter().enumerate() {
            self.jac[i] = JacobianEntry::linear(
                &world_to_a,
                &world_to_b,
                rel_pos_a,
                rel_pos_b,
                *axis,
                body_a.inv_inertia_local,
                body_a.inverse_mass,
                body_b.inv_inertia_local,
                body_b.inverse_mass,
            );
        }

        // Warm start: put the impulse accumulated so far back in, so the new
        // jacobians do not discard prior corrective work.
        let carried = Vec3::from(self.accumulated);
        if carried != Vec3::ZERO {
            body_a.apply_impulse(carried, rel_pos_a);
            body_b.apply_impulse(-carried, rel_pos_b);
        }
    }

    fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, step: f32) {
        let pivot_a_world = body_a.transform.transform_point(self.pivot_in_a);
        let pivot_b_world = body_b.transform.transform_point(self.pivot_in_b);
        let rel_pos_a = pivot_a_world - body_a.transform.position;
        let rel_pos_b = pivot_b_world - body_b.transform.position;

        for (i, axis) in WORLD_AXES.iter().enumerate() {
            let jac_diag_inv = 1.0 / self.jac[i].diagonal();

            let vel_a = body_a.velocity_in_local_point(rel_pos_a);
            let vel_b = body_b.velocity_in_local_point(rel_pos_b);
            let rel_vel = axis.dot(vel_a - vel_b);

            // positional error along this axis
            let depth = -(pivot_a_world - pivot_b_world).dot(*axis);

            let impulse = depth * self.setting.tau / step * jac_diag_inv
                - self.setting.damping * rel_vel * jac_diag_inv;
            self.accumulated[i] += impulse;
            self.base.applied_impulse += impulse;

            let impulse_vector = *axis * impulse;
            body_a.apply_impulse(impulse_vector, rel_pos_a);
            body_b.apply_impulse(-impulse_vector, rel_pos_b);
        }
    }

    fn applied_impulse(&self) -> f32 {
        self.base.applied_impulse
    }
}
