use glam::{Mat3, Vec3};

use super::types::{MassProperties, Transform, Velocity};
use crate::config;
use crate::dynamics::integrator;
use crate::utils::allocator::EntityId;
use crate::utils::logging::warn_on_nonfinite;

/// Rigid body state: pose, velocity, mass/inertia, and the force/torque
/// accumulators consumed by `integrate_velocities`.
///
/// A body with `inverse_mass == 0` is static. Its world inertia tensor is the
/// zero matrix, so both impulse paths leave it untouched without any explicit
/// branching; constraint code relies on that.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub id: EntityId,
    pub transform: Transform,
    pub velocity: Velocity,
    pub inverse_mass: f32,
    /// Inverse principal moments in the body's local frame.
    pub inv_inertia_local: Vec3,
    /// `basis * diag(inv_inertia_local) * basis^T`; must be refreshed whenever
    /// the orientation changes, see `update_inertia_tensor`.
    pub inv_inertia_world: Mat3,
    /// Gravity stored as a force, see `set_gravity`.
    pub gravity: Vec3,
    pub total_force: Vec3,
    pub total_torque: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new(EntityId::default(), MassProperties::default())
    }
}

impl RigidBody {
    pub fn new(id: EntityId, mass_properties: MassProperties) -> Self {
        let mut body = Self {
            id,
            transform: Transform::default(),
            velocity: Velocity::default(),
            inverse_mass: 0.0,
            inv_inertia_local: Vec3::ZERO,
            inv_inertia_world: Mat3::ZERO,
            gravity: Vec3::ZERO,
            total_force: Vec3::ZERO,
            total_torque: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            friction: 0.5,
            restitution: 0.0,
        };
        body.set_mass_properties(mass_properties);
        body
    }

    /// Infinite-mass body, used for static geometry and as the vehicle's
    /// ground placeholder.
    pub fn fixed(id: EntityId) -> Self {
        Self::new(id, MassProperties::fixed())
    }

    pub fn is_static(&self) -> bool {
        self.inverse_mass == 0.0
    }

    pub fn mass(&self) -> f32 {
        if self.inverse_mass == 0.0 {
            0.0
        } else {
            1.0 / self.inverse_mass
        }
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.inverse_mass = if props.mass == 0.0 { 0.0 } else { 1.0 / props.mass };
        self.inv_inertia_local = Vec3::new(
            if props.local_inertia.x == 0.0 { 0.0 } else { 1.0 / props.local_inertia.x },
            if props.local_inertia.y == 0.0 { 0.0 } else { 1.0 / props.local_inertia.y },
            if props.local_inertia.z == 0.0 { 0.0 } else { 1.0 / props.local_inertia.z },
        );
        self.update_inertia_tensor();
    }

    /// Stores gravity as a force so `apply_forces` can accumulate it directly.
    pub fn set_gravity(&mut self, acceleration: Vec3) {
        if self.inverse_mass != 0.0 {
            self.gravity = acceleration * (1.0 / self.inverse_mass);
        }
    }

    /// Rebuilds the world-space inverse inertia tensor from the current
    /// orientation.
    pub fn update_inertia_tensor(&mut self) {
        let basis = self.transform.basis();
        let scaled = Mat3::from_cols(
            basis.x_axis * self.inv_inertia_local.x,
            basis.y_axis * self.inv_inertia_local.y,
            basis.z_axis * self.inv_inertia_local.z,
        );
        self.inv_inertia_world = scaled * basis.transpose();
    }

    pub fn set_center_of_mass_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.update_inertia_tensor();
    }

    /// Driver-facing alias used after constraint solving each frame.
    pub fn proceed_to_transform(&mut self, transform: Transform) {
        self.set_center_of_mass_transform(transform);
    }

    pub fn apply_central_force(&mut self, force: Vec3) {
        self.total_force += force;
    }

    pub fn apply_torque(&mut self, torque: Vec3) {
        self.total_torque += torque;
    }

    /// Applies an impulse at `rel_pos` (offset from the center of mass).
    ///
    /// No static check here: a static body has zero inverse mass and a zero
    /// world inertia tensor, so the deltas vanish. Callers that want to skip
    /// static bodies entirely do so themselves.
    pub fn apply_impulse(&mut self, impulse: Vec3, rel_pos: Vec3) {
        self.velocity.linear += impulse * self.inverse_mass;
        self.velocity.angular += self.inv_inertia_world * rel_pos.cross(impulse);
    }

    pub fn apply_torque_impulse(&mut self, torque_impulse: Vec3) {
        self.velocity.angular += self.inv_inertia_world * torque_impulse;
    }

    /// Gravity plus damping, run once per step before velocity integration.
    pub fn apply_forces(&mut self, step: f32) {
        if self.is_static() {
            return;
        }
        self.apply_central_force(self.gravity);

        let linear_scale =
            (1.0 - step * config::LINEAR_AIR_DAMPING * self.linear_damping).clamp(0.0, 1.0);
        let angular_scale = (1.0 - step * self.angular_damping).clamp(0.0, 1.0);
        self.velocity.linear *= linear_scale;
        self.velocity.angular *= angular_scale;

        // Soft stop: bleed a fixed decrement off nearly-resting bodies instead
        // of letting the exponential decay run forever.
        let speed = self.velocity.linear.length();
        if speed < self.linear_damping {
            if speed > config::EXTRA_DAMPING_DECREMENT {
                self.velocity.linear -=
                    self.velocity.linear / speed * config::EXTRA_DAMPING_DECREMENT;
            } else {
                self.velocity.linear = Vec3::ZERO;
            }
        }
        let ang_speed = self.velocity.angular.length();
        if ang_speed < self.angular_damping {
            if ang_speed > config::EXTRA_DAMPING_DECREMENT {
                self.velocity.angular -=
                    self.velocity.angular / ang_speed * config::EXTRA_DAMPING_DECREMENT;
            } else {
                self.velocity.angular = Vec3::ZERO;
            }
        }
    }

    /// Integrates the force/torque accumulators into the velocities and
    /// clears them. No-op for static bodies.
    pub fn integrate_velocities(&mut self, step: f32) {
        if self.is_static() {
            return;
        }
        self.velocity.linear += self.total_force * self.inverse_mass * step;
        self.velocity.angular += self.inv_inertia_world * self.total_torque * step;

        // Clamp angular motion per step; large spins tunnel through the
        // orientation integration otherwise.
        let ang_speed = self.velocity.angular.length();
        if ang_speed * step > config::MAX_ANGULAR_MOTION {
            self.velocity.angular *= (config::MAX_ANGULAR_MOTION / step) / ang_speed;
        }
        warn_on_nonfinite("integrate_velocities linear", self.velocity.linear);
        warn_on_nonfinite("integrate_velocities angular", self.velocity.angular);

        self.total_force = Vec3::ZERO;
        self.total_torque = Vec3::ZERO;
    }

    /// Extrapolates the pose `step` seconds ahead along the current
    /// velocities, without mutating the body.
    pub fn predict_integrated_transform(&self, step: f32) -> Transform {
        integrator::integrate_transform(
            &self.transform,
            self.velocity.linear,
            self.velocity.angular,
            step,
        )
    }

    /// Back-derives the velocities implied by an externally driven move from
    /// `previous` to the current transform. Used for kinematic bodies so
    /// constraints and vehicles see a plausible velocity.
    pub fn save_kinematic_state(&mut self, previous: &Transform, step: f32) {
        if step == 0.0 {
            return;
        }
        let (linear, angular) = integrator::calculate_velocity(previous, &self.transform, step);
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    /// Velocity of the material point at `rel_pos` from the center of mass.
    pub fn velocity_in_local_point(&self, rel_pos: Vec3) -> Vec3 {
        self.velocity.linear + self.velocity.angular.cross(rel_pos)
    }

    /// Effective inverse angular mass about a world-space axis.
    pub fn compute_angular_impulse_denominator(&self, axis: Vec3) -> f32 {
        axis.dot(self.inv_inertia_world * axis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn static_body_ignores_impulses() {
        let mut body = RigidBody::fixed(EntityId::from_index(0));
        body.apply_impulse(Vec3::new(100.0, 100.0, 100.0), Vec3::new(1.0, 0.0, 0.0));
        body.apply_torque_impulse(Vec3::splat(50.0));
        assert_eq!(body.velocity.linear, Vec3::ZERO);
        assert_eq!(body.velocity.angular, Vec3::ZERO);
    }

    #[test]
    fn impulse_at_offset_spins_the_body() {
        let mut body = RigidBody::new(EntityId::from_index(1), MassProperties::default());
        body.apply_impulse(Vec3::Y, Vec3::X);
        assert!((body.velocity.linear - Vec3::Y).length() < 1e-6);
        // r x j = X x Y = Z, unit inertia
        assert!((body.velocity.angular - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn inertia_tensor_follows_orientation() {
        let mut body = RigidBody::new(
            EntityId::from_index(2),
            MassProperties {
                mass: 1.0,
                local_inertia: Vec3::new(1.0, 2.0, 4.0),
            },
        );
        body.set_center_of_mass_transform(Transform::new(
            Vec3::ZERO,
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        ));
        // Local x now points along world y, so a world-y torque impulse sees
        // the local-x inverse inertia (1.0).
        body.apply_torque_impulse(Vec3::Y);
        assert!((body.velocity.angular.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn soft_stop_zeroes_slow_bodies() {
        let mut body = RigidBody::new(EntityId::from_index(3), MassProperties::default());
        body.linear_damping = 0.1;
        body.velocity.linear = Vec3::new(0.004, 0.0, 0.0);
        body.apply_forces(1.0 / 60.0);
        assert_eq!(body.velocity.linear, Vec3::ZERO);
    }

    #[test]
    fn gravity_accumulates_as_force() {
        let mut body = RigidBody::new(
            EntityId::from_index(4),
            MassProperties {
                mass: 2.0,
                local_inertia: Vec3::ONE,
            },
        );
        body.set_gravity(Vec3::new(0.0, -10.0, 0.0));
        body.apply_forces(1.0);
        body.integrate_velocities(1.0);
        assert!((body.velocity.linear.y + 10.0).abs() < 1e-5);
    }
}
