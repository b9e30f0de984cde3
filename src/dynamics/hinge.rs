use glam::Vec3;

use super::constraint::{ConstraintBase, ConstraintSetting, SolvableConstraint};
use super::jacobian::JacobianEntry;
use crate::config;
use crate::core::rigidbody::RigidBody;
use crate::utils::allocator::EntityId;
use crate::utils::math::{basis_swing_angle, plane_space};

const WORLD_AXES: [Vec3; 3] = [Vec3::X, Vec3::Y, Vec3::Z];

/// Hinge joint: pins two bodies at a pivot while leaving rotation about a
/// shared axis free.
///
/// The pivot is handled exactly like a point-to-point joint; the angular
/// correction runs outside the jacobian/accumulation path and directly
/// cancels the relative angular velocity orthogonal to the hinge axis plus
/// the drift between the two axis directions.
#[derive(Debug, Clone)]
pub struct HingeConstraint {
    pub base: ConstraintBase,
    pub pivot_in_a: Vec3,
    pub pivot_in_b: Vec3,
    pub axis_in_a: Vec3,
    pub axis_in_b: Vec3,
    /// Skip the translational entries; used when the pivot is constrained
    /// elsewhere and only the axis alignment matters.
    pub angular_only: bool,
    pub setting: ConstraintSetting,
    jac: [JacobianEntry; 3],
    /// Auxiliary entries spanning the plane perpendicular to the hinge axis,
    /// kept for diagnostics and angle readback rather than impulse solving.
    jac_ang: [JacobianEntry; 2],
    accumulated: [f32; 3],
}

impl HingeConstraint {
    pub fn new(
        body_a: EntityId,
        body_b: EntityId,
        pivot_in_a: Vec3,
        pivot_in_b: Vec3,
        axis_in_a: Vec3,
        axis_in_b: Vec3,
    ) -> Self {
        Self {
            base: ConstraintBase::new(body_a, body_b),
            pivot_in_a,
            pivot_in_b,
            axis_in_a,
            axis_in_b,
            angular_only: false,
            setting: ConstraintSetting::default(),
            jac: [JacobianEntry::default(); 3],
            jac_ang: [JacobianEntry::default(); 2],
            accumulated: [0.0; 3],
        }
    }

    pub fn set_angular_only(&mut self, angular_only: bool) {
        self.angular_only = angular_only;
    }

    /// Signed swing angle between corresponding basis columns of the two
    /// bodies; readback for limit logic living outside the solver.
    pub fn compute_angle(&self, body_a: &RigidBody, body_b: &RigidBody, axis: usize) -> f32 {
        basis_swing_angle(&body_a.transform.basis(), &body_b.transform.basis(), axis)
    }

    /// Diagonals of the auxiliary angular entries (diagnostics).
    pub fn angular_diagonals(&self) -> [f32; 2] {
        [self.jac_ang[0].diagonal(), self.jac_ang[1].diagonal()]
    }
}

impl SolvableConstraint for HingeConstraint {
    fn bodies(&self) -> (EntityId, EntityId) {
        (self.base.body_a, self.base.body_b)
    }

    fn build_jacobian(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        let basis_a = body_a.transform.basis();
        let world_to_a = basis_a.transpose();
        let world_to_b = body_b.transform.basis().transpose();
        let rel_pos_a = body_a.transform.rotation * self.pivot_in_a;
        let rel_pos_b = body_b.transform.rotation * self.pivot_in_b;

        if !self.angular_only {
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

            let carried = Vec3::from(self.accumulated);
            if carried != Vec3::ZERO {
                body_a.apply_impulse(carried, rel_pos_a);
                body_b.apply_impulse(-carried, rel_pos_b);
            }
        }

        let (plane_0, plane_1) = plane_space(self.axis_in_a);
        for (entry, local_axis) in self.jac_ang.iter_mut().zip([plane_0, plane_1]) {
            *entry = JacobianEntry::angular(
                basis_a * local_axis,
                &world_to_a,
                &world_to_b,
                body_a.inv_inertia_local,
                body_b.inv_inertia_local,
            );
        }
    }

    fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, step: f32) {
        let pivot_a_world = body_a.transform.transform_point(self.pivot_in_a);
        let pivot_b_world = body_b.transform.transform_point(self.pivot_in_b);
        let rel_pos_a = pivot_a_world - body_a.transform.position;
        let rel_pos_b = pivot_b_world - body_b.transform.position;

        if !self.angular_only {
            for (i, axis) in WORLD_AXES.iter().enumerate() {
                let jac_diag_inv = 1.0 / self.jac[i].diagonal();

                let vel_a = body_a.velocity_in_local_point(rel_pos_a);
                let vel_b = body_b.velocity_in_local_point(rel_pos_b);
                let rel_vel = axis.dot(vel_a - vel_b);
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

        let axis_a = body_a.transform.rotation * self.axis_in_a;
        let axis_b = body_b.transform.rotation * self.axis_in_b;

        let ang_vel_a = body_a.velocity.angular;
        let ang_vel_b = body_b.velocity.angular;
        let ang_a_orthog = ang_vel_a - axis_a * axis_a.dot(ang_vel_a);
        let ang_b_orthog = ang_vel_b - axis_b * axis_b.dot(ang_vel_b);

        let relaxation = 1.0;
        let mut vel_rel_orthog = ang_a_orthog - ang_b_orthog;
        let len = vel_rel_orthog.length();
        if len > config::NEAR_ZERO_VELOCITY {
            let normal = vel_rel_orthog / len;
            let denom = body_a.compute_angular_impulse_denominator(normal)
                + body_b.compute_angular_impulse_denominator(normal);
            vel_rel_orthog *= (1.0 / denom) * config::HINGE_VELOCITY_RELAXATION;
        }

        // Axis drift: nonzero once the two hinge axes fall out of alignment.
        let mut angular_error = axis_a.cross(axis_b) * (1.0 / step);
        let len2 = angular_error.length();
        if len2 > config::NEAR_ZERO_VELOCITY {
            let normal2 = angular_error / len2;
            let denom2 = body_a.compute_angular_impulse_denominator(normal2)
                + body_b.compute_angular_impulse_denominator(normal2);
            angular_error *= (1.0 / denom2) * relaxation;
        }

        body_a.apply_torque_impulse(-vel_rel_orthog + angular_error);
        body_b.apply_torque_impulse(vel_rel_orthog - angular_error);
    }

    fn applied_impulse(&self) -> f32 {
        self.base.applied_impulse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MassProperties, Transform};
    use glam::Quat;

    fn unit_body(index: u32, position: Vec3) -> RigidBody {
        let mut body = RigidBody::new(EntityId::from_index(index), MassProperties::default());
        body.set_center_of_mass_transform(Transform::from_position(position));
        body
    }

    #[test]
    fn spin_about_hinge_axis_is_left_alone() {
        let mut a = unit_body(0, Vec3::ZERO);
        let mut b = unit_body(1, Vec3::ZERO);
        b.velocity.angular = Vec3::new(0.0, 0.0, 3.0);
        let mut hinge = HingeConstraint::new(a.id, b.id, Vec3::ZERO, Vec3::ZERO, Vec3::Z, Vec3::Z);
        hinge.build_jacobian(&mut a, &mut b);
        hinge.solve(&mut a, &mut b, 1.0 / 60.0);
        assert!((b.velocity.angular.z - 3.0).abs() < 1e-5);
        assert!(a.velocity.angular.length() < 1e-5);
        // Auxiliary entries span the plane perpendicular to the axis; for two
        // unit-inertia bodies each diagonal is 2.
        for diag in hinge.angular_diagonals() {
            assert!((diag - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn off_axis_spin_is_cancelled() {
        let mut a = unit_body(0, Vec3::ZERO);
        let mut b = unit_body(1, Vec3::ZERO);
        b.velocity.angular = Vec3::new(4.0, 0.0, 0.0);
        let mut hinge = HingeConstraint::new(a.id, b.id, Vec3::ZERO, Vec3::ZERO, Vec3::Z, Vec3::Z);
        hinge.set_angular_only(true);
        hinge.build_jacobian(&mut a, &mut b);
        let before = (b.velocity.angular - a.velocity.angular).x.abs();
        hinge.solve(&mut a, &mut b, 1.0 / 60.0);
        let after = (b.velocity.angular - a.velocity.angular).x.abs();
        assert!(after < before);
    }

    #[test]
    fn drifted_axes_get_a_restoring_torque() {
        let mut a = unit_body(0, Vec3::ZERO);
        let mut b = unit_body(1, Vec3::ZERO);
        b.set_center_of_mass_transform(Transform::new(Vec3::ZERO, Quat::from_rotation_x(0.2)));
        let mut hinge = HingeConstraint::new(a.id, b.id, Vec3::ZERO, Vec3::ZERO, Vec3::Z, Vec3::Z);
        hinge.set_angular_only(true);
        hinge.build_jacobian(&mut a, &mut b);
        hinge.solve(&mut a, &mut b, 1.0 / 60.0);
        // Restoring torques are equal and opposite.
        assert!(a.velocity.angular.length() > 0.0);
        assert!((a.velocity.angular + b.velocity.angular).length() < 1e-4);
    }

    #[test]
    fn compute_angle_tracks_rotation_about_hinge() {
        let a = unit_body(0, Vec3::ZERO);
        let mut b = unit_body(1, Vec3::ZERO);
        b.set_center_of_mass_transform(Transform::new(Vec3::ZERO, Quat::from_rotation_x(0.3)));
        let hinge = HingeConstraint::new(a.id, b.id, Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::X);
        let angle = hinge.compute_angle(&a, &b, 0);
        assert!((angle.abs() - 0.3).abs() < 1e-5);
    }
}
