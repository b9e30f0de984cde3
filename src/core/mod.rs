//! Core types describing solver entities and shared data.

pub mod rigidbody;
pub mod types;

pub use rigidbody::RigidBody;
pub use types::{MassProperties, Transform, Velocity};
