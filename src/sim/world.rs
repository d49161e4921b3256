//! Obstacle queries
//!
//! The simulation never owns geometry. Hosts hand it something that can
//! answer two questions: does a short ray hit anything solid, and does a box
//! overlap anything solid. `GridWorld` is a tile-map answer to both, used by
//! the demo and the tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A solid obstacle reported by an overlap query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleRef {
    pub id: u32,
    /// World-space center, used to push the actor off corners
    pub center: Vec2,
}

/// A query the host could not answer this tick
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("obstacle backend unavailable")]
    Unavailable,
    #[error("obstacle backend error: {0}")]
    Backend(String),
}

/// Read-only solid-geometry queries
///
/// Implementations must tolerate concurrent calls from several actors when
/// those actors are ticked in parallel.
pub trait Obstacles {
    /// Does a ray of `length` from `origin` along unit `direction` touch solid geometry?
    fn ray_hit(&self, origin: Vec2, direction: Vec2, length: f32) -> Result<bool, QueryError>;

    /// First solid obstacle overlapping the axis-aligned box, if any
    fn box_overlap(&self, center: Vec2, size: Vec2) -> Result<Option<ObstacleRef>, QueryError>;
}

impl<T: Obstacles + ?Sized> Obstacles for &T {
    fn ray_hit(&self, origin: Vec2, direction: Vec2, length: f32) -> Result<bool, QueryError> {
        (**self).ray_hit(origin, direction, length)
    }

    fn box_overlap(&self, center: Vec2, size: Vec2) -> Result<Option<ObstacleRef>, QueryError> {
        (**self).box_overlap(center, size)
    }
}

/// Uniform tile map of solid/empty cells
///
/// Row 0 is the bottom row; +y is up. Cells outside the grid are empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    width: usize,
    height: usize,
    cell_size: f32,
    /// World position of the bottom-left corner of cell (0, 0)
    origin: Vec2,
    solid: Vec<bool>,
    /// Center of the cell marked `P` in the source map
    spawn: Option<Vec2>,
}

impl GridWorld {
    /// Empty grid
    pub fn new(width: usize, height: usize, cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            width,
            height,
            cell_size,
            origin: Vec2::ZERO,
            solid: vec![false; width * height],
            spawn: None,
        }
    }

    /// Build from text rows, top row first. `#` is solid, `P` marks the spawn
    /// cell, anything else is empty.
    pub fn from_ascii(map: &str, cell_size: f32) -> Self {
        let rows: Vec<&str> = map
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        let mut world = Self::new(width, height, cell_size);
        for (line_idx, row) in rows.iter().enumerate() {
            let y = height - 1 - line_idx;
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '#' => world.set_solid(x, y, true),
                    'P' => world.spawn = Some(world.cell_center(x, y)),
                    _ => {}
                }
            }
        }
        world
    }

    /// Shift the whole grid so cell (0, 0) starts at `origin`
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        if let Some(spawn) = self.spawn.as_mut() {
            *spawn += origin - self.origin;
        }
        self.origin = origin;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn spawn(&self) -> Option<Vec2> {
        self.spawn
    }

    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.solid[y * self.width + x]
    }

    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.width && y < self.height {
            self.solid[y * self.width + x] = solid;
        }
    }

    /// World-space center of a cell
    pub fn cell_center(&self, x: usize, y: usize) -> Vec2 {
        self.origin + (Vec2::new(x as f32, y as f32) + 0.5) * self.cell_size
    }

    fn cell_min(&self, x: usize, y: usize) -> Vec2 {
        self.origin + Vec2::new(x as f32, y as f32) * self.cell_size
    }

    /// Solid cells whose closed bounds intersect the closed box [min, max],
    /// in row-major order
    fn solid_cells_near(&self, min: Vec2, max: Vec2) -> impl Iterator<Item = (usize, usize)> + '_ {
        let lo = ((min - self.origin) / self.cell_size).floor();
        let hi = ((max - self.origin) / self.cell_size).floor();
        let clamp = |v: f32, len: usize| -> usize { v.max(0.0).min(len as f32) as usize };

        // Entirely outside the grid yields an empty range
        let (x0, x1) = if hi.x < 0.0 || lo.x >= self.width as f32 {
            (0, 0)
        } else {
            (clamp(lo.x, self.width), clamp(hi.x + 1.0, self.width))
        };
        let (y0, y1) = if hi.y < 0.0 || lo.y >= self.height as f32 {
            (0, 0)
        } else {
            (clamp(lo.y, self.height), clamp(hi.y + 1.0, self.height))
        };

        (y0..y1)
            .flat_map(move |y| (x0..x1).map(move |x| (x, y)))
            .filter(move |&(x, y)| self.is_solid(x, y))
    }
}

impl Obstacles for GridWorld {
    fn ray_hit(&self, origin: Vec2, direction: Vec2, length: f32) -> Result<bool, QueryError> {
        let end = origin + direction * length;
        let hit = self
            .solid_cells_near(origin.min(end), origin.max(end))
            .any(|(x, y)| {
                let min = self.cell_min(x, y);
                segment_hits_aabb(origin, direction, length, min, min + self.cell_size)
            });
        Ok(hit)
    }

    fn box_overlap(&self, center: Vec2, size: Vec2) -> Result<Option<ObstacleRef>, QueryError> {
        let half = size * 0.5;
        let (min, max) = (center - half, center + half);
        // Touching faces do not count as overlap, so an actor resting on a
        // floor is free to move along it
        let hit = self.solid_cells_near(min, max).find(|&(x, y)| {
            let cmin = self.cell_min(x, y);
            let cmax = cmin + self.cell_size;
            min.x < cmax.x && max.x > cmin.x && min.y < cmax.y && max.y > cmin.y
        });
        Ok(hit.map(|(x, y)| ObstacleRef {
            id: (y * self.width + x) as u32,
            center: self.cell_center(x, y),
        }))
    }
}

/// Slab test for the segment `origin + direction * t`, `t` in [0, length].
/// Boundaries are inclusive so a ray starting on a face counts as a hit.
fn segment_hits_aabb(origin: Vec2, direction: Vec2, length: f32, min: Vec2, max: Vec2) -> bool {
    let mut t_enter = 0.0_f32;
    let mut t_exit = length;

    for axis in 0..2 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return false;
        }
    }
    true
}
