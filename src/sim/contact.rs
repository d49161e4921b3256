//! Ground/contact bookkeeping
//!
//! Compares this tick's probe result with the last one and names the ground
//! transition, if any.

use serde::{Deserialize, Serialize};

use super::probe::Contacts;

/// What happened to the ground contact this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundTransition {
    /// No change in `down` contact
    Unchanged,
    /// Down contact appeared
    Landed,
    /// Down contact disappeared
    LeftGround,
    /// First probe after spawn found ground. Not reported as a landing.
    Settled,
}

/// Contact flags carried between ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactState {
    pub current: Contacts,
    /// False until the first probe has been folded in
    primed: bool,
}

impl ContactState {
    pub fn grounded(&self) -> bool {
        self.current.down
    }

    /// Fold in a new probe result
    pub fn update(self, contacts: Contacts) -> (Self, GroundTransition) {
        let was_grounded = self.current.down;
        let transition = match (self.primed, was_grounded, contacts.down) {
            (false, _, true) => GroundTransition::Settled,
            (false, _, false) => GroundTransition::Unchanged,
            (true, false, true) => GroundTransition::Landed,
            (true, true, false) => GroundTransition::LeftGround,
            (true, _, _) => GroundTransition::Unchanged,
        };
        let next = Self {
            current: contacts,
            primed: true,
        };
        (next, transition)
    }
}
