use glam::Vec3;

use super::constraint::{ConstraintBase, SolvableConstraint};
use super::jacobian::JacobianEntry;
use crate::config;
use crate::core::rigidbody::RigidBody;
use crate::core::types::Transform;
use crate::utils::allocator::EntityId;
use crate::utils::math::basis_swing_angle;

const WORLD_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Column pairing for the derived angular axes. Axis 0 couples column 1 of
/// frame A with column 2 of frame B, axis 1 couples 2 with 0, axis 2 couples
/// 0 with 1; the asymmetry is intentional and load-bearing.
const ANGULAR_COL_A: [usize; 3] = [1, 2, 0];
const ANGULAR_COL_B: [usize; 3] = [2, 0, 1];
const ANGULAR_SIGN: [f32; 3] = [1.0, -1.0, 1.0];

/// Generic six-degree-of-freedom joint: a constraint frame per body and six
/// independently configurable axes (x/y/z linear, then x/y/z angular).
///
/// Limit semantics per axis: `lower > upper` frees the axis entirely,
/// `lower == upper` locks it. `lower < upper` marks it limited, but the
/// numeric range is only stored — the solver still drives the axis rigidly
/// to zero error, exactly like a locked axis. Range clamping is unfinished
/// upstream behavior that is preserved deliberately; see DESIGN.md.
#[derive(Debug, Clone)]
pub struct SixDofConstraint {
    pub base: ConstraintBase,
    pub frame_in_a: Transform,
    pub frame_in_b: Transform,
    lower_limit: [f32; 6],
    upper_limit: [f32; 6],
    jac_linear: [JacobianEntry; 3],
    jac_angular: [JacobianEntry; 3],
    accumulated: [f32; 6],
}

impl SixDofConstraint {
    /// All six axes start locked.
    pub fn new(
        body_a: EntityId,
        body_b: EntityId,
        frame_in_a: Transform,
        frame_in_b: Transform,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            frame_in_a,
            frame_in_b,
            lower_limit: [0.0; 6],
            upper_limit: [0.0; 6],
            jac_linear: [JacobianEntry::default(); 3],
            jac_angular: [JacobianEntry::default(); 3],
            accumulated: [0.0; 6],
        }
    }

    pub fn set_limit(&mut self, axis: usize, lower: f32, upper: f32) {
        self.lower_limit[axis] = lower;
        self.upper_limit[axis] = upper;
    }

    pub fn limit(&self, axis: usize) -> (f32, f32) {
        (self.lower_limit[axis], self.upper_limit[axis])
    }

    /// An axis participates in the solve iff its range is non-inverted.
    pub fn is_limited(&self, axis: usize) -> bool {
        self.upper_limit[axis] >= self.lower_limit[axis]
    }

    pub fn accumulated_impulse(&self, axis: usize) -> f32 {
        self.accumulated[axis]
    }

    /// Constraint frames moved into world space.
    fn calculated_transforms(
        &self,
        body_a: &RigidBody,
        body_b: &RigidBody,
    ) -> (Transform, Transform) {
        (
            body_a.transform.combine(&self.frame_in_a),
            body_b.transform.combine(&self.frame_in_b),
        )
    }

    fn angular_axis(frame_a: &Transform, frame_b: &Transform, i: usize) -> Vec3 {
        let col_a = frame_a.basis().col(ANGULAR_COL_A[i]);
        let col_b = frame_b.basis().col(ANGULAR_COL_B[i]);
        ANGULAR_SIGN[i] * col_a.cross(col_b)
    }
}

impl SolvableConstraint for SixDofConstraint {
    fn bodies(&self) -> (EntityId, EntityId) {
        (self.base.body_a, self.base.body_b)
    }

    fn build_jacobian(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        let (frame_a, frame_b) = self.calculated_transforms(body_a, body_b);
        let rel_pos_a = frame_a.position - body_a.transform.position;
        let rel_pos_b = frame_b.position - body_b.transform.position;
        let world_to_a = body_a.transform.basis().transpose();
        let world_to_b = body_b.transform.basis().transpose();

        let mut carried_linear = Vec3::ZERO;
        for (i, axis) in WORLD_AXES.iter().enumerate() {
            if !self.is_limited(i) {
                continue;
            }
            self.jac_linear[i] = JacobianEntry::linear(
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
            carried_linear += *axis * self.accumulated[i];
        }

        for i in 0..3 {
            if !self.is_limited(i + 3) {
                continue;
            }
            let axis = Self::angular_axis(&frame_a, &frame_b, i);
            self.jac_angular[i] = JacobianEntry::angular(
                axis,
                &world_to_a,
                &world_to_b,
                body_a.inv_inertia_local,
                body_b.inv_inertia_local,
            );
            // Warm start the angular axes in place.
            let carried = axis * self.accumulated[i + 3];
            if carried != Vec3::ZERO {
                body_a.apply_torque_impulse(carried);
                body_b.apply_torque_impulse(-carried);
            }
        }

        if carried_linear != Vec3::ZERO {
            body_a.apply_impulse(carried_linear, rel_pos_a);
            body_b.apply_impulse(-carried_linear, rel_pos_b);
        }
    }

    fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, step: f32) {
        let tau = config::SIX_DOF_TAU;
        let damping = config::CONSTRAINT_DAMPING;

        let (frame_a, frame_b) = self.calculated_transforms(body_a, body_b);
        let rel_pos_a = frame_a.position - body_a.transform.position;
        let rel_pos_b = frame_b.position - body_b.transform.position;
        let world_to_a = body_a.transform.basis().transpose();
        let world_to_b = body_b.transform.basis().transpose();
        let ang_vel_a_local = world_to_a * body_a.velocity.angular;
        let ang_vel_b_local = world_to_b * body_b.velocity.angular;

        for (i, axis) in WORLD_AXES.iter().enumerate() {
            if !self.is_limited(i) {
                continue;
            }
            let jac_diag_inv = 1.0 / self.jac_linear[i].diagonal();
            let rel_vel = self.jac_linear[i].relative_velocity(
                body_a.velocity.linear,
                ang_vel_a_local,
                body_b.velocity.linear,
                ang_vel_b_local,
            );
            let depth = -(frame_a.position - frame_b.position).dot(*axis);

            let impulse =
                depth * tau / step * jac_diag_inv - damping * rel_vel * jac_diag_inv;
            self.accumulated[i] += impulse;
            self.base.applied_impulse += impulse;

            let impulse_vector = *axis * impulse;
            body_a.apply_impulse(impulse_vector, rel_pos_a);
            body_b.apply_impulse(-impulse_vector, rel_pos_b);
        }

        let basis_a = frame_a.basis();
        let basis_b = frame_b.basis();
        for i in 0..3 {
            if !self.is_limited(i + 3) {
                continue;
            }
            let axis = Self::angular_axis(&frame_a, &frame_b, i);
            let jac_diag_inv = 1.0 / self.jac_angular[i].diagonal();
            let rel_vel = self.jac_angular[i].relative_velocity(
                body_a.velocity.linear,
                ang_vel_a_local,
                body_b.velocity.linear,
                ang_vel_b_local,
            );
            let depth = -basis_swing_angle(&basis_a, &basis_b, i);

            let impulse =
                depth * tau / step * jac_diag_inv - damping * rel_vel * jac_diag_inv;
            self.accumulated[i + 3] += impulse;
            self.base.applied_impulse += impulse;

            let impulse_vector = axis * impulse;
            body_a.apply_torque_impulse(impulse_vector);
            body_b.apply_torque_impulse(-impulse_vector);
        }
    }

    fn applied_impulse(&self) -> f32 {
        self.base.applied_impulse
    }
}
