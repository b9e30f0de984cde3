use glam::Vec3;

/// Result of a suspension ray hitting the world.
#[derive(Debug, Clone, Copy)]
pub struct VehicleRaycastResult {
    pub hit_point_ws: Vec3,
    pub hit_normal_ws: Vec3,
    /// Fraction along the ray, 0 at `from` and 1 at `to`.
    pub distance_fraction: f32,
}

/// Collision query seam for the vehicle. The simulation core owns no broad
/// phase, so callers supply whatever world representation they have behind
/// this trait.
pub trait VehicleRaycaster {
    fn cast_ray(&mut self, from: Vec3, to: Vec3) -> Option<VehicleRaycastResult>;
}

/// Flat horizontal plane at a fixed height, enough for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct PlaneRaycaster {
    pub height: f32,
}

impl PlaneRaycaster {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl VehicleRaycaster for PlaneRaycaster {
    fn cast_ray(&mut self, from: Vec3, to: Vec3) -> Option<VehicleRaycastResult> {
        let dy = to.y - from.y;
        if dy.abs() < 1e-9 {
            return None;
        }
        let fraction = (self.height - from.y) / dy;
        if !(0.0..=1.0).contains(&fraction) {
            return None;
        }
        Some(VehicleRaycastResult {
            hit_point_ws: from + (to - from) * fraction,
            hit_normal_ws: Vec3::Y,
            distance_fraction: fraction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_hit_and_miss() {
        let mut ray = PlaneRaycaster::new(0.0);
        let hit = ray
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0))
            .unwrap();
        assert!((hit.distance_fraction - 0.5).abs() < 1e-6);
        assert!((hit.hit_point_ws.y).abs() < 1e-6);

        let miss = ray.cast_ray(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(miss.is_none());
    }
}
