//! Horizontal and vertical speed solvers
//!
//! Both are pure: they take the previous `MotionState` by value and return
//! the next one.

use super::probe::Contacts;
use super::state::MotionState;
use crate::tuning::MotionTuning;
use crate::{inverse_lerp, lerp, move_towards};

/// Walk acceleration, deceleration, apex bonus and wall stop
///
/// Uses the apex fraction left over from the previous tick's vertical solve.
pub fn solve_horizontal(
    mut motion: MotionState,
    axis: f32,
    contacts: &Contacts,
    dt: f32,
    tuning: &MotionTuning,
) -> MotionState {
    let clamp = tuning.move_clamp;

    if axis != 0.0 {
        motion.horizontal_speed += axis * tuning.acceleration * dt;
        motion.horizontal_speed = motion.horizontal_speed.clamp(-clamp, clamp);

        // More control near the top of a jump; the result stays inside the clamp
        let apex_bonus = axis.signum() * tuning.apex_bonus * motion.apex_fraction;
        motion.horizontal_speed += apex_bonus * dt;
        motion.horizontal_speed = motion.horizontal_speed.clamp(-clamp, clamp);
    } else {
        motion.horizontal_speed =
            move_towards(motion.horizontal_speed, 0.0, tuning.deceleration * dt);
    }

    // Do not run into walls
    if (motion.horizontal_speed > 0.0 && contacts.right)
        || (motion.horizontal_speed < 0.0 && contacts.left)
    {
        motion.horizontal_speed = 0.0;
    }

    motion
}

/// Apex shaping, gravity and terminal velocity
///
/// `velocity_estimate_y` is the vertical velocity measured over the last tick.
pub fn solve_vertical(
    mut motion: MotionState,
    grounded: bool,
    velocity_estimate_y: f32,
    ended_early: bool,
    dt: f32,
    tuning: &MotionTuning,
) -> MotionState {
    if grounded {
        motion.apex_fraction = 0.0;
        // No drifting into the floor
        motion.vertical_speed = motion.vertical_speed.max(0.0);
        return motion;
    }

    motion.apex_fraction = inverse_lerp(
        tuning.jump_apex_threshold,
        0.0,
        velocity_estimate_y.abs(),
    );
    motion.fall_speed = lerp(
        tuning.min_fall_speed,
        tuning.max_fall_speed,
        motion.apex_fraction,
    );

    let gravity = if ended_early && motion.vertical_speed > 0.0 {
        motion.fall_speed * tuning.jump_end_early_gravity_modifier
    } else {
        motion.fall_speed
    };
    motion.vertical_speed -= gravity * dt;
    motion.vertical_speed = motion.vertical_speed.max(-tuning.fall_clamp);

    motion
}
