//! Actor state
//!
//! Everything one actor carries from tick to tick. All of it is plain `Copy`
//! data so a tick can work on a scratch copy and commit only on success.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::ContactState;
use super::jump::JumpState;
use crate::tuning::MotionTuning;

/// Axis-aligned collision footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorBounds {
    /// Offset of the box center from the actor position
    pub center: Vec2,
    pub size: Vec2,
}

impl Default for ActorBounds {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            size: Vec2::new(1.0, 2.0),
        }
    }
}

impl ActorBounds {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// World-space box center for an actor at `position`
    #[inline]
    pub fn center_at(&self, position: Vec2) -> Vec2 {
        position + self.center
    }

    /// World-space (min, max) corners for an actor at `position`
    pub fn min_max_at(&self, position: Vec2) -> (Vec2, Vec2) {
        let center = self.center_at(position);
        let half = self.size * 0.5;
        (center - half, center + half)
    }
}

/// Speeds produced by the horizontal and vertical solvers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionState {
    pub horizontal_speed: f32,
    pub vertical_speed: f32,
    /// 1 at the top of a jump arc, 0 far from it (always 0 when grounded)
    pub apex_fraction: f32,
    /// Gravity picked from the apex fraction on the last airborne tick
    pub fall_speed: f32,
}

impl MotionState {
    pub fn speed(&self) -> Vec2 {
        Vec2::new(self.horizontal_speed, self.vertical_speed)
    }
}

/// Complete per-actor simulation state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub position: Vec2,
    /// Measured displacement over the last committed tick divided by its dt
    pub velocity: Vec2,
    pub motion: MotionState,
    pub contacts: ContactState,
    pub jump: JumpState,
    /// Host timestamp of the last committed tick
    pub last_tick_at: Option<f64>,
}

impl ActorState {
    /// Fresh actor at rest, not grounded
    pub fn spawn(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            motion: MotionState::default(),
            contacts: ContactState::default(),
            jump: JumpState::default(),
            last_tick_at: None,
        }
    }

    pub fn grounded(&self) -> bool {
        self.contacts.grounded()
    }

    /// Where the footprint would sit after `dt` at the current speed,
    /// ignoring collisions. Returns (center, size).
    pub fn predicted_footprint(&self, dt: f32, tuning: &MotionTuning) -> (Vec2, Vec2) {
        let center = tuning
            .bounds
            .center_at(self.position + self.motion.speed() * dt);
        (center, tuning.bounds.size)
    }
}
