//! Per-tick simulation
//!
//! One ordered pass: probe, contact update, horizontal solve, vertical
//! solve, jump arbitration, move resolution. The pass runs on a scratch copy
//! of the actor and is committed only if every step succeeds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::GroundTransition;
use super::jump::{JumpKind, arbitrate};
use super::motion::{solve_horizontal, solve_vertical};
use super::probe::probe;
use super::resolve::resolve_move;
use super::state::ActorState;
use super::world::Obstacles;
use crate::error::{ConfigError, TickError};
use crate::tuning::MotionTuning;

/// Input for a single tick
///
/// The edge flags are true only on the tick the button changed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Horizontal stick/keys in [-1, 1]
    pub horizontal_axis: f32,
    pub jump_pressed: bool,
    pub jump_released: bool,
}

/// Read-only results of a tick, stale once the next tick starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub position: Vec2,
    /// Actual displacement this tick divided by dt
    pub velocity: Vec2,
    /// Speed handed to the move resolver, before collision
    pub raw_movement: Vec2,
    pub jumping_this_frame: bool,
    pub landing_this_frame: bool,
    pub grounded: bool,
    /// Input as used by the tick (axis clamped to [-1, 1])
    pub input: FrameInput,
    pub jump: Option<JumpKind>,
}

/// Advance one actor by `dt` seconds at host time `now`
///
/// `tuning` is expected to have passed [`MotionTuning::validate`]; use
/// [`Actor`] to get that checked once up front. On error `state` is left
/// exactly as it was.
pub fn tick<W: Obstacles + ?Sized>(
    state: &mut ActorState,
    tuning: &MotionTuning,
    world: &W,
    input: &FrameInput,
    now: f64,
    dt: f32,
) -> Result<TickOutput, TickError> {
    let input = validate_tick(state, input, now, dt)?;

    let next = step(state, tuning, world, &input, now, dt).inspect_err(|err| {
        log::warn!("tick at {now:.3} aborted, actor left in place: {err}");
    })?;

    let output = TickOutput {
        position: next.0.position,
        velocity: next.0.velocity,
        raw_movement: next.1.raw_movement,
        jumping_this_frame: next.1.jump.is_some(),
        landing_this_frame: next.1.transition == GroundTransition::Landed,
        grounded: next.0.grounded(),
        input,
        jump: next.1.jump,
    };
    *state = next.0;
    Ok(output)
}

/// Scratch results that are not part of the persisted state
struct StepEvents {
    raw_movement: Vec2,
    transition: GroundTransition,
    jump: Option<JumpKind>,
}

fn validate_tick(
    state: &ActorState,
    input: &FrameInput,
    now: f64,
    dt: f32,
) -> Result<FrameInput, TickError> {
    if !dt.is_finite() {
        return Err(TickError::NonFiniteDt(dt));
    }
    if dt <= 0.0 {
        return Err(TickError::NonPositiveDt(dt));
    }
    if !input.horizontal_axis.is_finite() {
        return Err(TickError::NonFiniteAxis(input.horizontal_axis));
    }
    if !now.is_finite() {
        return Err(TickError::NonFiniteClock(now));
    }
    if let Some(previous) = state.last_tick_at.filter(|&previous| now < previous) {
        return Err(TickError::NonMonotonicClock { now, previous });
    }

    Ok(FrameInput {
        horizontal_axis: input.horizontal_axis.clamp(-1.0, 1.0),
        ..*input
    })
}

fn step<W: Obstacles + ?Sized>(
    state: &ActorState,
    tuning: &MotionTuning,
    world: &W,
    input: &FrameInput,
    now: f64,
    dt: f32,
) -> Result<(ActorState, StepEvents), TickError> {
    let mut next = *state;

    let contacts = probe(world, next.position, tuning)?;
    let (contact_state, transition) = next.contacts.update(contacts);
    next.contacts = contact_state;
    next.jump = next.jump.observe(transition, now);
    if transition == GroundTransition::Landed {
        log::debug!("landed at {} ({now:.3})", next.position);
    }

    let grounded = contacts.down;
    next.motion = solve_horizontal(next.motion, input.horizontal_axis, &contacts, dt, tuning);
    next.motion = solve_vertical(
        next.motion,
        grounded,
        state.velocity.y,
        next.jump.ended_early,
        dt,
        tuning,
    );

    let arbitration = arbitrate(next.jump, next.motion, input, &contacts, now, tuning);
    next.jump = arbitration.jump;
    next.motion = arbitration.motion;

    let raw_movement = next.motion.speed();
    let resolved = resolve_move(world, next.position, raw_movement, dt, tuning)?;
    next.motion.vertical_speed = resolved.vertical_speed;
    next.velocity = (resolved.position - state.position) / dt;
    next.position = resolved.position;
    next.last_tick_at = Some(now);

    Ok((
        next,
        StepEvents {
            raw_movement,
            transition,
            jump: arbitration.granted,
        },
    ))
}

/// An actor with tuning that has already been validated
#[derive(Debug, Clone)]
pub struct Actor {
    tuning: MotionTuning,
    state: ActorState,
    last_output: Option<TickOutput>,
}

impl Actor {
    /// Validate `tuning` and spawn at rest, not grounded
    pub fn new(tuning: MotionTuning, position: Vec2) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            state: ActorState::spawn(position),
            last_output: None,
        })
    }

    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }

    pub fn state(&self) -> &ActorState {
        &self.state
    }

    /// Output of the last successful tick
    pub fn last_output(&self) -> Option<&TickOutput> {
        self.last_output.as_ref()
    }

    pub fn position(&self) -> Vec2 {
        self.state.position
    }

    pub fn grounded(&self) -> bool {
        self.state.grounded()
    }

    /// Move the actor (teleport); speeds and timers are kept
    pub fn set_position(&mut self, position: Vec2) {
        self.state.position = position;
    }

    pub fn tick<W: Obstacles + ?Sized>(
        &mut self,
        world: &W,
        input: &FrameInput,
        now: f64,
        dt: f32,
    ) -> Result<TickOutput, TickError> {
        let output = tick(&mut self.state, &self.tuning, world, input, now, dt)?;
        self.last_output = Some(output);
        Ok(output)
    }
}
