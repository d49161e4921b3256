//! Error types
//!
//! Configuration problems are caught when tuning is validated, before an
//! actor ever ticks. Tick errors leave the actor untouched.

use thiserror::Error;

use crate::sim::QueryError;

/// Invalid motion tuning
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("detector count must be at least 2, got {0}")]
    DetectorCount(usize),

    #[error("detection ray length must be positive, got {0}")]
    RayLength(f32),

    #[error("ray buffer {buffer} leaves no probe span on a {extent}-wide edge")]
    RayBuffer { buffer: f32, extent: f32 },

    #[error("actor bounds must have a positive size, got {0:?}")]
    BoundsSize(glam::Vec2),

    #[error("actor bounds offset must be finite, got {0:?}")]
    BoundsCenter(glam::Vec2),

    #[error("free collider iterations must be at least 2, got {0}")]
    ColliderIterations(usize),

    #[error("`{name}` must be finite and non-negative, got {value}")]
    Parameter { name: &'static str, value: f32 },

    #[error("min fall speed {min} exceeds max fall speed {max}")]
    FallSpeedRange { min: f32, max: f32 },

    #[error("tuning json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tuning file: {0}")]
    Io(#[from] std::io::Error),
}

/// A rejected or aborted tick
#[derive(Debug, Error)]
pub enum TickError {
    #[error("dt must be positive, got {0}")]
    NonPositiveDt(f32),

    #[error("dt must be finite, got {0}")]
    NonFiniteDt(f32),

    #[error("horizontal axis must be finite, got {0}")]
    NonFiniteAxis(f32),

    #[error("tick time must be finite, got {0}")]
    NonFiniteClock(f64),

    #[error("clock went backwards: {now} < {previous}")]
    NonMonotonicClock { now: f64, previous: f64 },

    #[error("obstacle query failed: {0}")]
    Query(#[from] QueryError),
}
