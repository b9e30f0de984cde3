//! Jacobian construction, typed constraints, and velocity/pose integration.

pub mod constraint;
pub mod hinge;
pub mod integrator;
pub mod jacobian;
pub mod point2point;
pub mod six_dof;
pub mod solver;

pub use constraint::{Constraint, ConstraintBase, ConstraintSetting, SolvableConstraint};
pub use hinge::HingeConstraint;
pub use jacobian::JacobianEntry;
pub use point2point::PointToPointConstraint;
pub use six_dof::SixDofConstraint;
pub use solver::SequentialImpulseSolver;
