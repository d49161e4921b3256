//! Platform Motion - 2D platformer character controller core
//!
//! Core modules:
//! - `sim`: Deterministic per-tick simulation (probes, solvers, jump arbiter, move resolver)
//! - `tuning`: Data-driven motion constants
//! - `error`: Configuration and tick errors
//!
//! Physics queries (ray hits, box overlaps) are injected through
//! [`sim::Obstacles`]; the core never talks to an engine directly.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, TickError};
pub use tuning::MotionTuning;

/// Default tuning constants
pub mod consts {
    /// Fixed timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Probe defaults
    pub const DETECTOR_COUNT: usize = 3;
    pub const DETECTION_RAY_LENGTH: f32 = 0.1;
    /// Keeps side rays from touching the floor (and floor rays from touching walls)
    pub const RAY_BUFFER: f32 = 0.1;

    /// Walk defaults
    pub const MOVE_CLAMP: f32 = 13.0;
    pub const ACCELERATION: f32 = 90.0;
    pub const DECELERATION: f32 = 60.0;
    pub const APEX_BONUS: f32 = 2.0;

    /// Gravity defaults (fall clamp is a magnitude, applied downward)
    pub const FALL_CLAMP: f32 = 40.0;
    pub const MIN_FALL_SPEED: f32 = 80.0;
    pub const MAX_FALL_SPEED: f32 = 120.0;

    /// Jump defaults
    pub const JUMP_HEIGHT: f32 = 30.0;
    pub const JUMP_APEX_THRESHOLD: f32 = 10.0;
    pub const COYOTE_TIME: f32 = 0.1;
    pub const JUMP_BUFFER: f32 = 0.1;
    pub const JUMP_END_EARLY_GRAVITY_MODIFIER: f32 = 3.0;

    /// Move resolver sample count
    pub const FREE_COLLIDER_ITERATIONS: usize = 10;
}

/// Linear interpolation between `a` and `b`, `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Where `value` sits between `a` and `b`, clamped to [0, 1].
/// Returns 0 when the range is empty.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Step `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}
