//! Geometry probe
//!
//! Short rays fanned along each edge of the actor's box report contact in
//! the four axis directions. Each edge is shrunk by `ray_buffer` at both ends
//! so side rays do not graze the floor and floor rays do not graze walls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::ActorBounds;
use super::world::{Obstacles, QueryError};
use crate::tuning::MotionTuning;

/// Probe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Up, Side::Down, Side::Left, Side::Right];

    /// Unit direction the rays point in
    pub fn direction(self) -> Vec2 {
        match self {
            Side::Up => Vec2::Y,
            Side::Down => Vec2::NEG_Y,
            Side::Left => Vec2::NEG_X,
            Side::Right => Vec2::X,
        }
    }
}

/// A line of ray origins along one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayRange {
    pub start: Vec2,
    pub end: Vec2,
    pub direction: Vec2,
}

impl RayRange {
    /// Edge of the box at `position` facing `side`, inset by `buffer` at both ends
    pub fn for_side(side: Side, position: Vec2, bounds: &ActorBounds, buffer: f32) -> Self {
        let (min, max) = bounds.min_max_at(position);
        let (start, end) = match side {
            Side::Down => (
                Vec2::new(min.x + buffer, min.y),
                Vec2::new(max.x - buffer, min.y),
            ),
            Side::Up => (
                Vec2::new(min.x + buffer, max.y),
                Vec2::new(max.x - buffer, max.y),
            ),
            Side::Left => (
                Vec2::new(min.x, min.y + buffer),
                Vec2::new(min.x, max.y - buffer),
            ),
            Side::Right => (
                Vec2::new(max.x, min.y + buffer),
                Vec2::new(max.x, max.y - buffer),
            ),
        };
        Self {
            start,
            end,
            direction: side.direction(),
        }
    }

    /// `count` evenly spaced origins from `start` to `end` inclusive
    pub fn sample_points(&self, count: usize) -> impl Iterator<Item = Vec2> + '_ {
        let last = count.saturating_sub(1).max(1) as f32;
        (0..count).map(move |i| self.start.lerp(self.end, i as f32 / last))
    }
}

/// Contact flags for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contacts {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Contacts {
    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Up => self.up,
            Side::Down => self.down,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn set(&mut self, side: Side, hit: bool) {
        match side {
            Side::Up => self.up = hit,
            Side::Down => self.down = hit,
            Side::Left => self.left = hit,
            Side::Right => self.right = hit,
        }
    }
}

/// The four ray ranges for an actor at `position`
pub fn ray_ranges(position: Vec2, tuning: &MotionTuning) -> [(Side, RayRange); 4] {
    Side::ALL.map(|side| {
        (
            side,
            RayRange::for_side(side, position, &tuning.bounds, tuning.ray_buffer),
        )
    })
}

/// Cast every ray and report which sides touch solid geometry
pub fn probe<W: Obstacles + ?Sized>(
    world: &W,
    position: Vec2,
    tuning: &MotionTuning,
) -> Result<Contacts, QueryError> {
    let mut contacts = Contacts::default();
    for (side, range) in ray_ranges(position, tuning) {
        let mut hit = false;
        for point in range.sample_points(tuning.detector_count) {
            if world.ray_hit(point, range.direction, tuning.detection_ray_length)? {
                hit = true;
                break;
            }
        }
        contacts.set(side, hit);
    }
    log::trace!("probe at {position}: {contacts:?}");
    Ok(contacts)
}
