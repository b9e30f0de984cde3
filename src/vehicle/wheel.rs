use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::types::Transform;
use crate::utils::allocator::EntityId;

/// Construction-time description of one wheel, in chassis space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelConstructionInfo {
    pub chassis_connection_cs: Vec3,
    /// Suspension direction, usually pointing down.
    pub wheel_direction_cs: Vec3,
    pub wheel_axle_cs: Vec3,
    pub suspension_rest_length: f32,
    pub wheel_radius: f32,
    pub suspension_stiffness: f32,
    pub damping_compression: f32,
    pub damping_relaxation: f32,
    pub friction_slip: f32,
    pub max_suspension_travel_cm: f32,
    pub roll_influence: f32,
    pub is_front_wheel: bool,
}

impl Default for WheelConstructionInfo {
    fn default() -> Self {
        Self {
            chassis_connection_cs: Vec3::ZERO,
            wheel_direction_cs: -Vec3::Y,
            wheel_axle_cs: Vec3::X,
            suspension_rest_length: 0.6,
            wheel_radius: 0.5,
            suspension_stiffness: 5.88,
            damping_compression: 0.83,
            damping_relaxation: 0.88,
            friction_slip: 10.5,
            max_suspension_travel_cm: 500.0,
            roll_influence: 0.1,
            is_front_wheel: false,
        }
    }
}

/// Per-step raycast state for a wheel.
#[derive(Debug, Clone, Copy)]
pub struct RaycastInfo {
    pub contact_normal_ws: Vec3,
    pub contact_point_ws: Vec3,
    pub suspension_length: f32,
    pub hard_point_ws: Vec3,
    pub wheel_direction_ws: Vec3,
    pub wheel_axle_ws: Vec3,
    pub is_in_contact: bool,
    /// Handle of the body the wheel is resting on; the configured static
    /// placeholder for every hit until per-object ground dynamics land.
    pub ground_object: Option<EntityId>,
}

impl Default for RaycastInfo {
    fn default() -> Self {
        Self {
            contact_normal_ws: Vec3::ZERO,
            contact_point_ws: Vec3::ZERO,
            suspension_length: 0.0,
            hard_point_ws: Vec3::ZERO,
            wheel_direction_ws: Vec3::ZERO,
            wheel_axle_ws: Vec3::ZERO,
            is_in_contact: false,
            ground_object: None,
        }
    }
}

/// One wheel: constant geometry, suspension tuning, and the dynamic state the
/// raycast/suspension/friction passes overwrite every step.
#[derive(Debug, Clone)]
pub struct WheelInfo {
    pub raycast_info: RaycastInfo,
    pub world_transform: Transform,

    pub chassis_connection_point_cs: Vec3,
    pub wheel_direction_cs: Vec3,
    pub wheel_axle_cs: Vec3,
    pub suspension_rest_length: f32,
    pub max_suspension_travel_cm: f32,
    pub wheel_radius: f32,
    pub suspension_stiffness: f32,
    pub wheels_damping_compression: f32,
    pub wheels_damping_relaxation: f32,
    pub friction_slip: f32,
    pub roll_influence: f32,
    pub is_front_wheel: bool,

    pub steering: f32,
    pub engine_force: f32,
    pub brake: f32,
    pub rotation: f32,
    pub delta_rotation: f32,
    /// Scale applied to the spring force when the contact is oblique to the
    /// suspension direction.
    pub clipped_inv_contact_dot_suspension: f32,
    pub suspension_relative_velocity: f32,
    pub wheels_suspension_force: f32,
    pub skid_info: f32,
}

impl WheelInfo {
    pub fn new(info: WheelConstructionInfo) -> Self {
        Self {
            raycast_info: RaycastInfo::default(),
            world_transform: Transform::default(),
            chassis_connection_point_cs: info.chassis_connection_cs,
            wheel_direction_cs: info.wheel_direction_cs,
            wheel_axle_cs: info.wheel_axle_cs,
            suspension_rest_length: info.suspension_rest_length,
            max_suspension_travel_cm: info.max_suspension_travel_cm,
            wheel_radius: info.wheel_radius,
            suspension_stiffness: info.suspension_stiffness,
            wheels_damping_compression: info.damping_compression,
            wheels_damping_relaxation: info.damping_relaxation,
            friction_slip: info.friction_slip,
            roll_influence: info.roll_influence,
            is_front_wheel: info.is_front_wheel,
            steering: 0.0,
            engine_force: 0.0,
            brake: 0.0,
            rotation: 0.0,
            delta_rotation: 0.0,
            clipped_inv_contact_dot_suspension: 1.0,
            suspension_relative_velocity: 0.0,
            wheels_suspension_force: 0.0,
            skid_info: 1.0,
        }
    }
}
