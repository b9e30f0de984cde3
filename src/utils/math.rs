//! Math helpers layered on top of `glam`.

use glam::{Mat3, Vec3};

/// Two unit vectors spanning the plane perpendicular to `normal`.
pub fn plane_space(normal: Vec3) -> (Vec3, Vec3) {
    normal.any_orthonormal_pair()
}

/// Signed swing angle between the constraint-frame bases of two bodies.
///
/// The column pairing is fixed: axis 0 compares column 1 against columns 1/2,
/// axis 1 compares column 2 against columns 2/0, axis 2 compares column 0
/// against columns 0/1. Callers index axes 0..3.
pub fn basis_swing_angle(basis_a: &Mat3, basis_b: &Mat3, axis: usize) -> f32 {
    let (v1, v2, w2) = match axis {
        0 => (basis_a.col(1), basis_b.col(1), basis_b.col(2)),
        1 => (basis_a.col(2), basis_b.col(2), basis_b.col(0)),
        _ => (basis_a.col(0), basis_b.col(0), basis_b.col(1)),
    };
    f32::atan2(v1.dot(w2), v1.dot(v2))
}
