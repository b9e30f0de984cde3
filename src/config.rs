//! Global tuning constants for the Rigid Impulse solver core.

/// Default solve timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 60.0;

/// Maximum angular motion per step; `|omega| * dt` is clamped to this value
/// inside `integrate_velocities` to keep fast spinners stable.
pub const MAX_ANGULAR_MOTION: f32 = std::f32::consts::FRAC_PI_2;

/// Angle threshold above which the exponential-map pose extrapolation limits
/// the per-step rotation.
pub const ANGULAR_MOTION_THRESHOLD: f32 = std::f32::consts::FRAC_PI_4;

/// Global scale on linear damping (matches the original air-damping knob).
pub const LINEAR_AIR_DAMPING: f32 = 1.0;

/// Fixed velocity decrement used by the minimum-speed soft stop.
pub const EXTRA_DAMPING_DECREMENT: f32 = 0.005;

/// Default Baumgarte position-correction factor for point-to-point joints.
pub const POINT2POINT_TAU: f32 = 0.3;

/// Baumgarte position-correction factor for six-DOF axes.
pub const SIX_DOF_TAU: f32 = 0.1;

/// Default velocity-error damping shared by the joint solvers.
pub const CONSTRAINT_DAMPING: f32 = 1.0;

/// Relaxation applied to the hinge's orthogonal angular velocity correction.
pub const HINGE_VELOCITY_RELAXATION: f32 = 0.9;

/// Vectors shorter than this are treated as null before normalizing.
pub const NEAR_ZERO_VELOCITY: f32 = 1.0e-5;

/// Hard cap on the per-wheel suspension force fed into the impulse pass.
pub const MAX_SUSPENSION_FORCE: f32 = 6000.0;

/// Scale on the bilateral side impulse produced by the tire constraint.
pub const SIDE_FRICTION_STIFFNESS: f32 = 1.0;

/// Forward/side weights used when testing the friction-cone bound.
pub const FORWARD_IMPULSE_FACTOR: f32 = 0.5;
pub const SIDE_IMPULSE_FACTOR: f32 = 1.0;

/// Velocity damping inside the bilateral (no-separation) tire constraint.
pub const BILATERAL_CONTACT_DAMPING: f32 = 0.2;

/// Per-step decay on a wheel's rotation delta while airborne.
pub const WHEEL_IDLE_ROTATION_DECAY: f32 = 0.99;
