//! Jump arbiter
//!
//! Decides when a jump is granted. Two grace windows apply:
//! - coyote time: a press shortly after walking off a ledge still jumps
//! - jump buffer: a press shortly before landing jumps on touchdown
//!
//! The coyote window is an explicit state so it cannot be open while grounded
//! or fire twice for the same ledge.

use serde::{Deserialize, Serialize};

use super::contact::GroundTransition;
use super::probe::Contacts;
use super::state::MotionState;
use super::tick::FrameInput;
use crate::tuning::MotionTuning;

/// Coyote-time state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Coyote {
    /// Grounded since the last jump; leaving the ground opens the window
    Armed,
    /// Airborne without having jumped, left the ground at `left_ground_at`
    Open { left_ground_at: f64 },
    /// Used by a jump, or never armed since spawn
    #[default]
    Spent,
}

/// How a granted jump was earned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    /// Pressed in the air inside the coyote window
    Coyote,
    /// Grounded with a press inside the buffer window (includes pressing on the ground)
    Buffered,
}

/// Jump bookkeeping carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    pub coyote: Coyote,
    /// Jump released mid-ascent; heavier gravity until the actor falls
    pub ended_early: bool,
    /// Timestamp of the latest unconsumed press edge
    pub last_jump_requested_at: Option<f64>,
}

impl JumpState {
    pub fn coyote_usable(&self) -> bool {
        !matches!(self.coyote, Coyote::Spent)
    }

    /// When the actor walked off the ground, if the coyote window is open
    pub fn last_grounded_at(&self) -> Option<f64> {
        match self.coyote {
            Coyote::Open { left_ground_at } => Some(left_ground_at),
            _ => None,
        }
    }

    /// Apply a ground transition from the contact update
    pub fn observe(mut self, transition: GroundTransition, now: f64) -> Self {
        match transition {
            GroundTransition::Landed | GroundTransition::Settled => {
                self.coyote = Coyote::Armed;
            }
            GroundTransition::LeftGround => {
                if self.coyote == Coyote::Armed {
                    self.coyote = Coyote::Open {
                        left_ground_at: now,
                    };
                }
            }
            GroundTransition::Unchanged => {}
        }
        self
    }

    fn can_use_coyote(&self, grounded: bool, now: f64, tuning: &MotionTuning) -> bool {
        match self.coyote {
            Coyote::Open { left_ground_at } => {
                !grounded && now <= left_ground_at + f64::from(tuning.coyote_time)
            }
            _ => false,
        }
    }

    fn has_buffered_jump(&self, grounded: bool, now: f64, tuning: &MotionTuning) -> bool {
        grounded
            && self
                .last_jump_requested_at
                .is_some_and(|at| now <= at + f64::from(tuning.jump_buffer))
    }
}

/// Result of one arbitration pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arbitration {
    pub jump: JumpState,
    pub motion: MotionState,
    pub granted: Option<JumpKind>,
}

/// Grant or deny a jump, handle early release and ceiling bumps
pub fn arbitrate(
    mut jump: JumpState,
    mut motion: MotionState,
    input: &FrameInput,
    contacts: &Contacts,
    now: f64,
    tuning: &MotionTuning,
) -> Arbitration {
    let grounded = contacts.down;
    debug_assert!(
        !(grounded && matches!(jump.coyote, Coyote::Open { .. })),
        "coyote window open while grounded"
    );

    if input.jump_pressed {
        jump.last_jump_requested_at = Some(now);
    }

    let granted = if input.jump_pressed && jump.can_use_coyote(grounded, now, tuning) {
        Some(JumpKind::Coyote)
    } else if jump.has_buffered_jump(grounded, now, tuning) {
        Some(JumpKind::Buffered)
    } else {
        None
    };

    if let Some(kind) = granted {
        motion.vertical_speed = tuning.jump_height;
        jump.ended_early = false;
        jump.coyote = Coyote::Spent;
        jump.last_jump_requested_at = None;
        log::debug!("jump granted ({kind:?}) at {now:.3}");
    }

    // Release mid-ascent cuts the jump short
    if !grounded && input.jump_released && !jump.ended_early && motion.vertical_speed > 0.0 {
        jump.ended_early = true;
        log::debug!("jump ended early at {now:.3}");
    }

    // Bonk
    if contacts.up && motion.vertical_speed > 0.0 {
        motion.vertical_speed = 0.0;
    }

    Arbitration {
        jump,
        motion,
        granted,
    }
}
