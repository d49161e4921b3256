//! Motion tuning
//!
//! Every frame-rate-coupled constant lives here so it can be tweaked from a
//! JSON file without recompiling. Missing keys fall back to defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::ActorBounds;

/// Tunable constants for one actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    // === Collision ===
    /// Collision footprint (center is an offset from the actor position)
    pub bounds: ActorBounds,
    /// Rays cast per edge
    pub detector_count: usize,
    pub detection_ray_length: f32,
    /// Inward margin at both ends of each probed edge
    pub ray_buffer: f32,

    // === Walk ===
    pub move_clamp: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    /// Extra horizontal push near the jump apex
    pub apex_bonus: f32,

    // === Gravity ===
    /// Terminal fall speed (magnitude)
    pub fall_clamp: f32,
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,

    // === Jump ===
    /// Upward speed applied when a jump is granted
    pub jump_height: f32,
    /// Vertical speed below which the actor counts as near the apex
    pub jump_apex_threshold: f32,
    /// Seconds after leaving ground that a jump is still honored
    pub coyote_time: f32,
    /// Seconds before landing that a jump press is remembered
    pub jump_buffer: f32,
    /// Gravity multiplier once a jump is released mid-ascent
    pub jump_end_early_gravity_modifier: f32,

    // === Move ===
    /// Intermediate samples tried when the destination is blocked
    pub free_collider_iterations: usize,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            bounds: ActorBounds::default(),
            detector_count: DETECTOR_COUNT,
            detection_ray_length: DETECTION_RAY_LENGTH,
            ray_buffer: RAY_BUFFER,

            move_clamp: MOVE_CLAMP,
            acceleration: ACCELERATION,
            deceleration: DECELERATION,
            apex_bonus: APEX_BONUS,

            fall_clamp: FALL_CLAMP,
            min_fall_speed: MIN_FALL_SPEED,
            max_fall_speed: MAX_FALL_SPEED,

            jump_height: JUMP_HEIGHT,
            jump_apex_threshold: JUMP_APEX_THRESHOLD,
            coyote_time: COYOTE_TIME,
            jump_buffer: JUMP_BUFFER,
            jump_end_early_gravity_modifier: JUMP_END_EARLY_GRAVITY_MODIFIER,

            free_collider_iterations: FREE_COLLIDER_ITERATIONS,
        }
    }
}

impl MotionTuning {
    /// Check every constant, failing on the first bad one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detector_count < 2 {
            return Err(ConfigError::DetectorCount(self.detector_count));
        }
        if !(self.detection_ray_length.is_finite() && self.detection_ray_length > 0.0) {
            return Err(ConfigError::RayLength(self.detection_ray_length));
        }

        let size = self.bounds.size;
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(ConfigError::BoundsSize(size));
        }
        if !self.bounds.center.is_finite() {
            return Err(ConfigError::BoundsCenter(self.bounds.center));
        }

        let shortest_edge = size.x.min(size.y);
        if !(self.ray_buffer.is_finite() && self.ray_buffer >= 0.0)
            || self.ray_buffer * 2.0 >= shortest_edge
        {
            return Err(ConfigError::RayBuffer {
                buffer: self.ray_buffer,
                extent: shortest_edge,
            });
        }

        if self.free_collider_iterations < 2 {
            return Err(ConfigError::ColliderIterations(self.free_collider_iterations));
        }

        for (name, value) in self.rates() {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Parameter { name, value });
            }
        }

        if self.min_fall_speed > self.max_fall_speed {
            return Err(ConfigError::FallSpeedRange {
                min: self.min_fall_speed,
                max: self.max_fall_speed,
            });
        }

        Ok(())
    }

    fn rates(&self) -> [(&'static str, f32); 12] {
        [
            ("move_clamp", self.move_clamp),
            ("acceleration", self.acceleration),
            ("deceleration", self.deceleration),
            ("apex_bonus", self.apex_bonus),
            ("fall_clamp", self.fall_clamp),
            ("min_fall_speed", self.min_fall_speed),
            ("max_fall_speed", self.max_fall_speed),
            ("jump_height", self.jump_height),
            ("jump_apex_threshold", self.jump_apex_threshold),
            ("coyote_time", self.coyote_time),
            ("jump_buffer", self.jump_buffer),
            (
                "jump_end_early_gravity_modifier",
                self.jump_end_early_gravity_modifier,
            ),
        ]
    }

    /// Parse and validate tuning from JSON (missing keys use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded motion tuning from {}", path.display());
        Ok(tuning)
    }

    /// Save tuning as pretty JSON
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Motion tuning saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_defaults_are_valid() {
        assert!(MotionTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = MotionTuning::from_json(r#"{ "move_clamp": 8.0, "detector_count": 5 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.move_clamp, 8.0);
        assert_eq!(tuning.detector_count, 5);
        assert_eq!(tuning.acceleration, ACCELERATION);
        assert_eq!(tuning.bounds, ActorBounds::default());
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = MotionTuning {
            jump_height: 22.5,
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(MotionTuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_probe_config() {
        let tuning = MotionTuning {
            detector_count: 1,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::DetectorCount(1))));

        let tuning = MotionTuning {
            detection_ray_length: 0.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::RayLength(_))));

        let tuning = MotionTuning {
            ray_buffer: 0.5,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::RayBuffer { .. })));
    }

    #[test]
    fn test_rejects_bad_bounds_and_rates() {
        let tuning = MotionTuning {
            bounds: ActorBounds::new(Vec2::ZERO, Vec2::new(1.0, 0.0)),
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::BoundsSize(_))));

        let tuning = MotionTuning {
            acceleration: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::Parameter { name: "acceleration", .. })
        ));

        let tuning = MotionTuning {
            min_fall_speed: 200.0,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::FallSpeedRange { .. })));

        let tuning = MotionTuning {
            free_collider_iterations: 1,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::ColliderIterations(1))));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        assert!(matches!(
            MotionTuning::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
