//! Raycast vehicle: suspension rays, spring/damper forces, and tire friction
//! layered on top of a single chassis body.

pub mod raycast_vehicle;
pub mod raycaster;
pub mod wheel;

pub use raycast_vehicle::RaycastVehicle;
pub use raycaster::{PlaneRaycaster, VehicleRaycaster, VehicleRaycastResult};
pub use wheel::{RaycastInfo, WheelConstructionInfo, WheelInfo};
