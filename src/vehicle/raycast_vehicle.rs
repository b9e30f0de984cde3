use glam::{Mat3, Quat, Vec3};
use log::warn;

use super::raycaster::VehicleRaycaster;
use super::wheel::{WheelConstructionInfo, WheelInfo};
use crate::config;
use crate::core::rigidbody::RigidBody;
use crate::dynamics::jacobian::JacobianEntry;
use crate::utils::allocator::{Arena, EntityId};
use crate::utils::logging::PhaseTimer;

/// Raycast vehicle: a dynamic chassis with wheels simulated as suspension
/// rays instead of separate bodies.
///
/// Each step runs a fixed pipeline: wheel transforms, suspension raycasts,
/// spring/damper forces, a suspension impulse on the chassis, tire friction,
/// and finally wheel rotation bookkeeping. Friction reacts against a
/// caller-provided static ground body so that contact impulses always have a
/// second body to push on.
#[derive(Debug)]
pub struct RaycastVehicle {
    pub chassis: EntityId,
    ground: EntityId,
    wheels: Vec<WheelInfo>,
    index_right_axis: usize,
    index_up_axis: usize,
    index_forward_axis: usize,
    current_speed_kmh: f32,
    pitch_control: f32,
}

impl RaycastVehicle {
    /// `ground` names a static body that stands in for whatever the
    /// suspension rays hit; it must stay alive as long as the vehicle does.
    pub fn new(chassis: EntityId, ground: EntityId) -> Self {
        Self {
            chassis,
            ground,
            wheels: Vec::new(),
            index_right_axis: 0,
            index_up_axis: 1,
            index_forward_axis: 2,
            current_speed_kmh: 0.0,
            pitch_control: 0.0,
        }
    }

    /// Remaps which chassis basis columns count as right, up, and forward.
    pub fn set_coordinate_system(&mut self, right: usize, up: usize, forward: usize) {
        debug_assert!(right < 3 && up < 3 && forward < 3);
        debug_assert!(right != up && up != forward && right != forward);
        self.index_right_axis = right;
        self.index_up_axis = up;
        self.index_forward_axis = forward;
    }

    pub fn right_axis(&self) -> usize {
        self.index_right_axis
    }

    pub fn up_axis(&self) -> usize {
        self.index_up_axis
    }

    pub fn forward_axis(&self) -> usize {
        self.index_forward_axis
    }

    pub fn add_wheel(&mut self, info: WheelConstructionInfo) -> usize {
        self.wheels.push(WheelInfo::new(info));
        self.wheels.len() - 1
    }

    pub fn num_wheels(&self) -> usize {
        self.wheels.len()
    }

    pub fn wheel(&self, index: usize) -> &WheelInfo {
        &self.wheels[index]
    }

    pub fn wheel_mut(&mut self, index: usize) -> &mut WheelInfo {
        &mut self.wheels[index]
    }

    /// Signed speed along the chassis forward axis, in km/h.
    pub fn current_speed_kmh(&self) -> f32 {
        self.current_speed_kmh
    }

    pub fn apply_engine_force(&mut self, force: f32, wheel: usize) {
        self.wheels[wheel].engine_force = force;
    }

    pub fn set_steering_value(&mut self, steering: f32, wheel: usize) {
        self.wheels[wheel].steering = steering;
    }

    pub fn set_brake(&mut self, brake: f32, wheel: usize) {
        self.wheels[wheel].brake = brake;
    }

    pub fn set_pitch_control(&mut self, pitch: f32) {
        self.pitch_control = pitch;
    }

    pub fn pitch_control(&self) -> f32 {
        self.pitch_control
    }

    pub fn set_suspension_stiffness(&mut self, stiffness: f32, wheel: usize) {
        self.wheels[wheel].suspension_stiffness = stiffness;
    }

    pub fn set_suspension_compression(&mut self, compression: f32, wheel: usize) {
        self.wheels[wheel].wheels_damping_compression = compression;
    }

    pub fn set_suspension_damping(&mut self, damping: f32, wheel: usize) {
        self.wheels[wheel].wheels_damping_relaxation = damping;
    }

    pub fn set_tyre_friction(&mut self, friction: f32, wheel: usize) {
        self.wheels[wheel].friction_slip = friction;
    }

    pub fn set_roll_influence(&mut self, roll: f32, wheel: usize) {
        self.wheels[wheel].roll_influence = roll;
    }

    /// Refreshes the hard point and suspension/axle directions in world space
    /// and clears the contact flag for the coming raycast.
    fn update_wheel_transforms_ws(wheel: &mut WheelInfo, chassis: &RigidBody) {
        wheel.raycast_info.is_in_contact = false;
        let transform = &chassis.transform;
        wheel.raycast_info.hard_point_ws =
            transform.transform_point(wheel.chassis_connection_point_cs);
        wheel.raycast_info.wheel_direction_ws = transform.rotation * wheel.wheel_direction_cs;
        wheel.raycast_info.wheel_axle_ws = transform.rotation * wheel.wheel_axle_cs;
    }

    /// Rebuilds the wheel's full world transform from steering, rolling
    /// rotation, and the current suspension length.
    pub fn update_wheel_transform(&mut self, wheel_index: usize, chassis: &RigidBody) {
        let wheel = &mut self.wheels[wheel_index];
        Self::update_wheel_transforms_ws(wheel, chassis);

        let up = -wheel.raycast_info.wheel_direction_ws;
        let right = wheel.raycast_info.wheel_axle_ws;
        let forward = up.cross(right).normalize();

        let steering_rot = Quat::from_axis_angle(up, wheel.steering);
        let rolling_rot = Quat::from_axis_angle(right, -wheel.rotation);
        let basis = Mat3::from_quat(steering_rot * rolling_rot) * Mat3::from_cols(right, forward, up);

        wheel.world_transform.rotation = Quat::from_mat3(&basis).normalize();
        wheel.world_transform.position = wheel.raycast_info.hard_point_ws
            + wheel.raycast_info.wheel_direction_ws * wheel.raycast_info.suspension_length;
    }

    /// Casts the suspension ray for one wheel and fills in its contact state.
    /// Returns the penetration depth when the wheel touches ground.
    fn ray_cast(
        &mut self,
        wheel_index: usize,
        chassis: &RigidBody,
        raycaster: &mut dyn VehicleRaycaster,
    ) -> f32 {
        let ground = self.ground;
        let wheel = &mut self.wheels[wheel_index];
        Self::update_wheel_transforms_ws(wheel, chassis);

        let ray_len = wheel.suspension_rest_length + wheel.wheel_radius;
        let source = wheel.raycast_info.hard_point_ws;
        let target = source + wheel.raycast_info.wheel_direction_ws * ray_len;
        wheel.raycast_info.contact_point_ws = target;

        let mut depth = -1.0;
        match raycaster.cast_ray(source, target) {
            Some(hit) => {
                wheel.raycast_info.is_in_contact = true;
                wheel.raycast_info.ground_object = Some(ground);
                wheel.raycast_info.contact_point_ws = hit.hit_point_ws;
                wheel.raycast_info.contact_normal_ws = hit.hit_normal_ws;

                let hit_distance = hit.distance_fraction * ray_len;
                wheel.raycast_info.suspension_length = hit_distance - wheel.wheel_radius;
                depth = ray_len - wheel.raycast_info.suspension_length;

                // Keep the suspension inside its travel band.
                let min_length = wheel.suspension_rest_length
                    - wheel.max_suspension_travel_cm * 0.01;
                let max_length = wheel.suspension_rest_length
                    + wheel.max_suspension_travel_cm * 0.01;
                wheel.raycast_info.suspension_length = wheel
                    .raycast_info
                    .suspension_length
                    .clamp(min_length, max_length);

                let denominator = wheel
                    .raycast_info
                    .contact_normal_ws
                    .dot(wheel.raycast_info.wheel_direction_ws);

                let rel_pos = wheel.raycast_info.contact_point_ws - chassis.transform.position;
                let contact_velocity = chassis.velocity_in_local_point(rel_pos);
                let proj_vel = wheel.raycast_info.contact_normal_ws.dot(contact_velocity);

                if denominator >= -0.1 {
                    // Contact nearly perpendicular to the suspension ray.
                    wheel.suspension_relative_velocity = 0.0;
                    wheel.clipped_inv_contact_dot_suspension = 10.0;
                } else {
                    let inv = -1.0 / denominator;
                    wheel.suspension_relative_velocity = proj_vel * inv;
                    wheel.clipped_inv_contact_dot_suspension = inv;
                }
            }
            None => {
                wheel.raycast_info.suspension_length = wheel.suspension_rest_length;
                wheel.suspension_relative_velocity = 0.0;
                wheel.raycast_info.contact_normal_ws = -wheel.raycast_info.wheel_direction_ws;
                wheel.clipped_inv_contact_dot_suspension = 1.0;
                wheel.raycast_info.ground_object = None;
            }
        }
        depth
    }

    /// Spring + damper force per wheel, expressed as acceleration scaled by
    /// chassis mass. Wheels out of contact carry no force.
    fn update_suspension(&mut self, chassis_mass: f32) {
        for wheel in &mut self.wheels {
            if !wheel.raycast_info.is_in_contact {
                wheel.wheels_suspension_force = 0.0;
                continue;
            }

            let length_diff = wheel.suspension_rest_length - wheel.raycast_info.suspension_length;
            let mut force = wheel.suspension_stiffness
                * length_diff
                * wheel.clipped_inv_contact_dot_suspension;

            let projected_rel_vel = wheel.suspension_relative_velocity;
            let damping = if projected_rel_vel < 0.0 {
                wheel.wheels_damping_compression
            } else {
                wheel.wheels_damping_relaxation
            };
            force -= damping * projected_rel_vel;

            wheel.wheels_suspension_force = (force * chassis_mass).max(0.0);
        }
    }

    /// Tire forces: a bilateral side constraint along the projected axle plus
    /// an engine-driven forward impulse, both clipped against the friction
    /// cone allowed by the suspension load.
    fn update_friction(&mut self, bodies: &mut Arena<RigidBody>, step: f32) {
        let num_wheels = self.wheels.len();
        if num_wheels == 0 {
            return;
        }

        let mut forward_ws = vec![Vec3::ZERO; num_wheels];
        let mut axle = vec![Vec3::ZERO; num_wheels];
        let mut forward_impulse = vec![0.0f32; num_wheels];
        let mut side_impulse = vec![0.0f32; num_wheels];

        for i in 0..num_wheels {
            let wheel = &self.wheels[i];
            let Some(ground_id) = wheel.raycast_info.ground_object else {
                continue;
            };
            let (Some(chassis), Some(ground)) = (bodies.get(self.chassis), bodies.get(ground_id))
            else {
                continue;
            };

            let surf_normal = wheel.raycast_info.contact_normal_ws;
            let mut wheel_axle = wheel.world_transform.basis().col(self.index_right_axis);
            wheel_axle -= surf_normal * wheel_axle.dot(surf_normal);
            axle[i] = wheel_axle.normalize_or_zero();
            forward_ws[i] = surf_normal.cross(axle[i]).normalize_or_zero();

            side_impulse[i] = resolve_single_bilateral(
                chassis,
                wheel.raycast_info.contact_point_ws,
                ground,
                wheel.raycast_info.contact_point_ws,
                axle[i],
            ) * config::SIDE_FRICTION_STIFFNESS;
        }

        let mut sliding = false;
        for i in 0..num_wheels {
            let wheel = &mut self.wheels[i];
            wheel.skid_info = 1.0;
            if wheel.raycast_info.ground_object.is_none() {
                continue;
            }

            forward_impulse[i] = wheel.engine_force * step;

            let max_impulse = wheel.wheels_suspension_force * step * wheel.friction_slip;
            let x = forward_impulse[i] * config::FORWARD_IMPULSE_FACTOR;
            let y = side_impulse[i] * config::SIDE_IMPULSE_FACTOR;
            let impulse_squared = x * x + y * y;
            if impulse_squared > max_impulse * max_impulse {
                sliding = true;
                if impulse_squared > f32::EPSILON {
                    wheel.skid_info *= max_impulse / impulse_squared.sqrt();
                }
            }
        }

        if sliding {
            for i in 0..num_wheels {
                if side_impulse[i] != 0.0 && self.wheels[i].skid_info < 1.0 {
                    forward_impulse[i] *= self.wheels[i].skid_info;
                    side_impulse[i] *= self.wheels[i].skid_info;
                }
            }
        }

        for i in 0..num_wheels {
            let wheel = &self.wheels[i];
            let Some(ground_id) = wheel.raycast_info.ground_object else {
                continue;
            };
            let Some((chassis, ground)) = bodies.get2_mut(self.chassis, ground_id) else {
                continue;
            };

            let rel_pos = wheel.raycast_info.contact_point_ws - chassis.transform.position;
            if forward_impulse[i] != 0.0 {
                chassis.apply_impulse(forward_ws[i] * forward_impulse[i], rel_pos);
            }
            if side_impulse[i] != 0.0 {
                let side = axle[i] * side_impulse[i];
                // Shrink the roll arm so hard cornering leans instead of flips.
                let mut rel_pos_roll = rel_pos;
                rel_pos_roll[self.index_up_axis] *= wheel.roll_influence;
                chassis.apply_impulse(side, rel_pos_roll);

                let rel_pos_ground =
                    wheel.raycast_info.contact_point_ws - ground.transform.position;
                ground.apply_impulse(-side, rel_pos_ground);
            }
        }
    }

    /// Runs one full vehicle step against the body arena.
    pub fn update_vehicle(
        &mut self,
        bodies: &mut Arena<RigidBody>,
        raycaster: &mut dyn VehicleRaycaster,
        step: f32,
    ) {
        let _timer = PhaseTimer::new("vehicle update");

        let chassis = match bodies.get(self.chassis) {
            Some(body) => body.clone(),
            None => {
                warn!("vehicle chassis {:?} is not in the arena", self.chassis);
                return;
            }
        };

        for wheel_index in 0..self.wheels.len() {
            self.update_wheel_transform(wheel_index, &chassis);
        }

        self.current_speed_kmh = 3.6 * chassis.velocity.linear.length();
        let forward_w = chassis.transform.basis().col(self.index_forward_axis);
        if forward_w.dot(chassis.velocity.linear) < 0.0 {
            self.current_speed_kmh = -self.current_speed_kmh;
        }

        for wheel_index in 0..self.wheels.len() {
            self.ray_cast(wheel_index, &chassis, raycaster);
        }

        self.update_suspension(chassis.mass());

        if let Some(chassis) = bodies.get_mut(self.chassis) {
            for wheel in &self.wheels {
                let mut force = wheel.wheels_suspension_force;
                if force <= 0.0 {
                    continue;
                }
                if force > config::MAX_SUSPENSION_FORCE {
                    force = config::MAX_SUSPENSION_FORCE;
                }
                let impulse = wheel.raycast_info.contact_normal_ws * force * step;
                let rel_pos = wheel.raycast_info.contact_point_ws - chassis.transform.position;
                chassis.apply_impulse(impulse, rel_pos);
            }
        }

        self.update_friction(bodies, step);

        if let Some(chassis) = bodies.get(self.chassis) {
            for wheel in &mut self.wheels {
                let rel_pos = wheel.raycast_info.hard_point_ws - chassis.transform.position;
                let velocity = chassis.velocity_in_local_point(rel_pos);

                if wheel.raycast_info.is_in_contact {
                    let mut forward = chassis.transform.basis().col(self.index_forward_axis);
                    forward -= wheel.raycast_info.contact_normal_ws
                        * forward.dot(wheel.raycast_info.contact_normal_ws);
                    let proj_vel = forward.dot(velocity);
                    wheel.delta_rotation = (proj_vel * step) / wheel.wheel_radius;
                    wheel.rotation += wheel.delta_rotation;
                } else {
                    wheel.rotation += wheel.delta_rotation;
                }
                // Airborne wheels slowly spin down.
                wheel.delta_rotation *= config::WHEEL_IDLE_ROTATION_DECAY;
            }
        }
    }
}

/// Impulse along `normal` that cancels the damped relative velocity between
/// two bodies at a shared contact point.
fn resolve_single_bilateral(
    body_a: &RigidBody,
    pos_a: Vec3,
    body_b: &RigidBody,
    pos_b: Vec3,
    normal: Vec3,
) -> f32 {
    let normal_len_sqr = normal.length_squared();
    if normal_len_sqr > 1.1 {
        return 0.0;
    }

    let rel_pos_a = pos_a - body_a.transform.position;
    let rel_pos_b = pos_b - body_b.transform.position;
    let world_to_a = body_a.transform.basis().transpose();
    let world_to_b = body_b.transform.basis().transpose();

    let jac = JacobianEntry::linear(
        &world_to_a,
        &world_to_b,
        rel_pos_a,
        rel_pos_b,
        normal,
        body_a.inv_inertia_local,
        body_a.inverse_mass,
        body_b.inv_inertia_local,
        body_b.inverse_mass,
    );
    let jac_diag_inv = 1.0 / jac.diagonal();

    let rel_vel = jac.relative_velocity(
        body_a.velocity.linear,
        world_to_a * body_a.velocity.angular,
        body_b.velocity.linear,
        world_to_b * body_b.velocity.angular,
    );

    -config::BILATERAL_CONTACT_DAMPING * rel_vel * jac_diag_inv
}
