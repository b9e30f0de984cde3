use serde::{Deserialize, Serialize};

use crate::core::rigidbody::RigidBody;
use crate::utils::allocator::EntityId;
use crate::{config, dynamics};

/// Baumgarte tunables shared by the joint solvers: `tau` pulls positional
/// error to zero over time, `damping` removes relative velocity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConstraintSetting {
    pub tau: f32,
    pub damping: f32,
}

impl Default for ConstraintSetting {
    fn default() -> Self {
        Self {
            tau: config::POINT2POINT_TAU,
            damping: config::CONSTRAINT_DAMPING,
        }
    }
}

/// Data every typed constraint carries: the two body handles, the running
/// total of applied impulse, and a user-assigned type/id pair for external
/// bookkeeping. Bodies are referenced by handle only; constraints never own
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintBase {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub applied_impulse: f32,
    pub user_constraint_type: i32,
    pub user_constraint_id: i32,
}

impl ConstraintBase {
    pub fn new(body_a: EntityId, body_b: EntityId) -> Self {
        Self {
            body_a,
            body_b,
            applied_impulse: 0.0,
            user_constraint_type: 0,
            user_constraint_id: 0,
        }
    }
}

/// The per-step contract every joint implements.
///
/// The driver calls `build_jacobian` once per step (it also re-applies the
/// previously accumulated impulses — warm starting happens during build, not
/// solve), then `solve` once per solver iteration.
pub trait SolvableConstraint {
    fn bodies(&self) -> (EntityId, EntityId);
    fn build_jacobian(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody);
    fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, step: f32);
    /// Total impulse applied since construction, for diagnostics/feedback.
    fn applied_impulse(&self) -> f32;
}

/// Tagged-variant dispatch over the concrete joint types.
#[derive(Debug, Clone)]
pub enum Constraint {
    PointToPoint(dynamics::point2point::PointToPointConstraint),
    Hinge(dynamics::hinge::HingeConstraint),
    SixDof(dynamics::six_dof::SixDofConstraint),
}

impl Constraint {
    fn inner(&self) -> &dyn SolvableConstraint {
        match self {
            Constraint::PointToPoint(c) => c,
            Constraint::Hinge(c) => c,
            Constraint::SixDof(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn SolvableConstraint {
        match self {
            Constraint::PointToPoint(c) => c,
            Constraint::Hinge(c) => c,
            Constraint::SixDof(c) => c,
        }
    }

    pub fn bodies(&self) -> (EntityId, EntityId) {
        self.inner().bodies()
    }

    pub fn build_jacobian(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) {
        self.inner_mut().build_jacobian(body_a, body_b);
    }

    pub fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody, step: f32) {
        self.inner_mut().solve(body_a, body_b, step);
    }

    pub fn applied_impulse(&self) -> f32 {
        self.inner().applied_impulse()
    }

    pub fn base(&self) -> &ConstraintBase {
        match self {
            Constraint::PointToPoint(c) => &c.base,
            Constraint::Hinge(c) => &c.base,
            Constraint::SixDof(c) => &c.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut ConstraintBase {
        match self {
            Constraint::PointToPoint(c) => &mut c.base,
            Constraint::Hinge(c) => &mut c.base,
            Constraint::SixDof(c) => &mut c.base,
        }
    }
}
