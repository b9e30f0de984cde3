//! Pose extrapolation utilities shared by prediction and kinematic bodies.

use glam::{Quat, Vec3};

use crate::config;
use crate::core::types::Transform;

/// Advances `transform` along the given velocities using the exponential map.
///
/// The per-step rotation is capped at the angular-motion threshold, and the
/// axis switches to a series expansion below 0.001 rad to avoid dividing by a
/// vanishing angle.
pub fn integrate_transform(
    transform: &Transform,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    step: f32,
) -> Transform {
    let position = transform.position + linear_velocity * step;

    let mut angle = angular_velocity.length();
    if angle * step > config::ANGULAR_MOTION_THRESHOLD {
        angle = config::ANGULAR_MOTION_THRESHOLD / step;
    }

    let axis = if angle < 0.001 {
        // Taylor expansion of sin(angle*step/2)/angle
        angular_velocity * (0.5 * step - step * step * step * (1.0 / 48.0) * angle * angle)
    } else {
        angular_velocity * ((0.5 * angle * step).sin() / angle)
    };
    let delta = Quat::from_xyzw(axis.x, axis.y, axis.z, (angle * step * 0.5).cos());
    let rotation = (delta * transform.rotation).normalize();

    Transform { position, rotation }
}

/// Back-derives the (linear, angular) velocity that carries `from` onto `to`
/// in `step` seconds.
pub fn calculate_velocity(from: &Transform, to: &Transform, step: f32) -> (Vec3, Vec3) {
    let linear = (to.position - from.position) / step;

    let delta = (to.rotation * from.rotation.inverse()).normalize();
    let (axis, mut angle) = delta.to_axis_angle();
    if angle > std::f32::consts::PI {
        angle -= 2.0 * std::f32::consts::PI;
    }
    let angular = axis * (angle / step);

    (linear, angular)
}
