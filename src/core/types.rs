use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform: position plus orientation. Bodies never scale, so there
/// is no scale column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotation expressed as a 3x3 basis.
    pub fn basis(&self) -> Mat3 {
        Mat3::from_quat(self.rotation)
    }

    /// Maps a point from this transform's local space into world space.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Applies another transform on top of this one, returning the composition.
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * other.position,
            rotation: (self.rotation * other.rotation).normalize(),
        }
    }
}

/// Linear and angular velocity of a rigid body.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Mass and local-space diagonal inertia.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    /// Principal moments of inertia in the body's local frame. Zero on any
    /// axis means that axis never responds to torque.
    pub local_inertia: Vec3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            local_inertia: Vec3::ONE,
        }
    }
}

impl MassProperties {
    /// Infinite-mass properties used by static bodies.
    pub fn fixed() -> Self {
        Self {
            mass: 0.0,
            local_inertia: Vec3::ZERO,
        }
    }

    pub fn solid_box(half_extents: Vec3, mass: f32) -> Self {
        let lx = half_extents.x * 2.0;
        let ly = half_extents.y * 2.0;
        let lz = half_extents.z * 2.0;
        let factor = mass / 12.0;
        Self {
            mass,
            local_inertia: Vec3::new(
                factor * (ly * ly + lz * lz),
                factor * (lx * lx + lz * lz),
                factor * (lx * lx + ly * ly),
            ),
        }
    }

    pub fn solid_sphere(radius: f32, mass: f32) -> Self {
        Self {
            mass,
            local_inertia: Vec3::splat(0.4 * mass * radius * radius),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_point_round_trip() {
        let t = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(Vec3::Y, std::f32::consts::FRAC_PI_2),
        );
        let p = t.transform_point(Vec3::X);
        assert!((p - Vec3::new(1.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn combine_matches_sequential_application() {
        let a = Transform::new(Vec3::X, Quat::from_rotation_z(0.3));
        let b = Transform::new(Vec3::Y, Quat::from_rotation_x(-0.7));
        let combined = a.combine(&b);
        let p = Vec3::new(0.2, -0.4, 1.1);
        let expected = a.transform_point(b.transform_point(p));
        assert!((combined.transform_point(p) - expected).length() < 1e-5);
    }

    #[test]
    fn box_inertia_is_symmetric_for_cube() {
        let props = MassProperties::solid_box(Vec3::splat(0.5), 3.0);
        assert!((props.local_inertia.x - props.local_inertia.y).abs() < 1e-6);
        assert!((props.local_inertia.y - props.local_inertia.z).abs() < 1e-6);
    }
}
