//! Rigid Impulse – sequential-impulse constraint solving for Rust.
//!
//! This crate provides the core of a rigid-body constraint solver: body
//! state and integration, Jacobian construction, point-to-point, hinge,
//! and six-degree-of-freedom joints, plus a raycast vehicle built on the
//! same impulse machinery. Collision detection and broad-phase management
//! are left to the caller.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod utils;
pub mod vehicle;

pub use glam::{Mat3, Quat, Vec3};

pub use self::core::{
    rigidbody::RigidBody,
    types::{MassProperties, Transform, Velocity},
};
pub use dynamics::{
    constraint::{Constraint, ConstraintSetting, SolvableConstraint},
    hinge::HingeConstraint,
    jacobian::JacobianEntry,
    point2point::PointToPointConstraint,
    six_dof::SixDofConstraint,
    solver::SequentialImpulseSolver,
};
pub use utils::allocator::{Arena, EntityId, GenerationalId};
pub use vehicle::{
    raycast_vehicle::RaycastVehicle,
    raycaster::{PlaneRaycaster, VehicleRaycastResult, VehicleRaycaster},
    wheel::{WheelConstructionInfo, WheelInfo},
};
