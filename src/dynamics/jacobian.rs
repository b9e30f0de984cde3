use glam::{Mat3, Vec3};

/// Precomputed per-axis constraint data for one body pair: the constraint
/// direction, the angular response arms in each body's local frame, and the
/// effective inverse mass ("diagonal") along the axis.
///
/// Entries hold no references and go stale the moment either body moves;
/// constraints rebuild them from scratch on every build pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct JacobianEntry {
    linear_joint_axis: Vec3,
    a_j: Vec3,
    b_j: Vec3,
    minv_jt_a: Vec3,
    minv_jt_b: Vec3,
    a_diag: f32,
}

impl JacobianEntry {
    /// Entry for a linear axis: couples both translation and the torque
    /// induced at each body's offset.
    ///
    /// `world_to_a`/`world_to_b` are the transposed body bases; `rel_pos_*`
    /// are the constraint points relative to each center of mass;
    /// `joint_axis` must be unit length.
    #[allow(clippy::too_many_arguments)]
    pub fn linear(
        world_to_a: &Mat3,
        world_to_b: &Mat3,
        rel_pos_a: Vec3,
        rel_pos_b: Vec3,
        joint_axis: Vec3,
        inv_inertia_a: Vec3,
        inv_mass_a: f32,
        inv_inertia_b: Vec3,
        inv_mass_b: f32,
    ) -> Self {
        let a_j = *world_to_a * rel_pos_a.cross(joint_axis);
        let b_j = *world_to_b * rel_pos_b.cross(-joint_axis);
        let minv_jt_a = inv_inertia_a * a_j;
        let minv_jt_b = inv_inertia_b * b_j;
        let a_diag = inv_mass_a + minv_jt_a.dot(a_j) + inv_mass_b + minv_jt_b.dot(b_j);
        Self {
            linear_joint_axis: joint_axis,
            a_j,
            b_j,
            minv_jt_a,
            minv_jt_b,
            a_diag,
        }
    }

    /// Entry constraining relative rotation only; no mass terms in the
    /// diagonal.
    pub fn angular(
        joint_axis: Vec3,
        world_to_a: &Mat3,
        world_to_b: &Mat3,
        inv_inertia_a: Vec3,
        inv_inertia_b: Vec3,
    ) -> Self {
        let a_j = *world_to_a * joint_axis;
        let b_j = *world_to_b * -joint_axis;
        let minv_jt_a = inv_inertia_a * a_j;
        let minv_jt_b = inv_inertia_b * b_j;
        let a_diag = minv_jt_a.dot(a_j) + minv_jt_b.dot(b_j);
        Self {
            linear_joint_axis: Vec3::ZERO,
            a_j,
            b_j,
            minv_jt_a,
            minv_jt_b,
            a_diag,
        }
    }

    /// Effective inverse mass along the constraint axis. The solvers divide
    /// by this without a zero guard; a degenerate pair (two static bodies)
    /// yields the same instability as the original.
    pub fn diagonal(&self) -> f32 {
        self.a_diag
    }

    /// Scalar velocity error along the constraint. Angular velocities are
    /// expected in each body's local frame (the arms were stored there).
    pub fn relative_velocity(
        &self,
        lin_vel_a: Vec3,
        ang_vel_a: Vec3,
        lin_vel_b: Vec3,
        ang_vel_b: Vec3,
    ) -> f32 {
        let linear = (lin_vel_a - lin_vel_b) * self.linear_joint_axis;
        let angular_a = ang_vel_a * self.a_j;
        let angular_b = ang_vel_b * self.b_j;
        (linear + angular_a + angular_b).element_sum()
    }
}
