//! Move resolution
//!
//! Moves the footprint by this tick's displacement. When the destination is
//! blocked, a fixed number of evenly spaced samples between here and there
//! are tried and the last clear one wins, so fast actors cannot tunnel and
//! the cost per tick is bounded.

use glam::Vec2;

use super::world::{Obstacles, QueryError};
use crate::tuning::MotionTuning;

/// Outcome of one move
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub position: Vec2,
    pub vertical_speed: f32,
    /// Destination was blocked
    pub blocked: bool,
    /// Blocked immediately; the corner nudge was applied
    pub corner_corrected: bool,
}

/// Advance `position` by `speed * dt`, stopping short of solid geometry
///
/// Performs at most `free_collider_iterations` overlap queries.
pub fn resolve_move<W: Obstacles + ?Sized>(
    world: &W,
    position: Vec2,
    speed: Vec2,
    dt: f32,
    tuning: &MotionTuning,
) -> Result<Resolved, QueryError> {
    let bounds = &tuning.bounds;
    let movement = speed * dt;
    let furthest = position + movement;

    let Some(obstacle) = world.box_overlap(bounds.center_at(furthest), bounds.size)? else {
        return Ok(Resolved {
            position: furthest,
            vertical_speed: speed.y,
            blocked: false,
            corner_corrected: false,
        });
    };

    let iterations = tuning.free_collider_iterations;
    let mut clear = position;
    for i in 1..iterations {
        let t = i as f32 / iterations as f32;
        let candidate = position.lerp(furthest, t);

        if world.box_overlap(bounds.center_at(candidate), bounds.size)?.is_some() {
            if i == 1 {
                // Stuck on a corner. Approximate: push straight away from the
                // obstacle we would have hit, by the attempted move length.
                let vertical_speed = speed.y.max(0.0);
                let away = (clear - obstacle.center).normalize_or_zero();
                let nudged = clear + away * movement.length();
                log::debug!(
                    "corner correction off obstacle {} at {}: {} -> {}",
                    obstacle.id,
                    obstacle.center,
                    clear,
                    nudged
                );
                return Ok(Resolved {
                    position: nudged,
                    vertical_speed,
                    blocked: true,
                    corner_corrected: true,
                });
            }
            return Ok(Resolved {
                position: clear,
                vertical_speed: speed.y,
                blocked: true,
                corner_corrected: false,
            });
        }

        clear = candidate;
    }

    Ok(Resolved {
        position: clear,
        vertical_speed: speed.y,
        blocked: true,
        corner_corrected: false,
    })
}
