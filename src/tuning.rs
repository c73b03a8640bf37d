//! Data-driven game balance
//!
//! Every number the run engine depends on lives here so a balance pass can be
//! done from a JSON file without touching the simulation. Missing fields fall
//! back to the shipped defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How the player's forward hop is braked when a scripted pause begins
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PauseBrake {
    /// Horizontal velocity drops to zero on entry
    #[default]
    Instant,
    /// Horizontal velocity decelerates linearly (px/s²) until the landing is
    /// sampled. The hop drifts on along the ground too, so this applies to
    /// grounded entries as well as airborne ones.
    Decay { per_second: f32 },
}

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Difficulty ===
    /// Scroll speed at run start (px/s, negative = leftward)
    pub baseline_speed: f32,
    /// How much faster the scroll gets per second of running (px/s per s)
    pub speed_increase_per_second: f32,

    // === Spawning ===
    /// Spawn cadence (ms)
    pub spawn_interval_ms: f32,
    /// A roll above this value spawns a hazard, otherwise a collectible
    pub hazard_threshold: f32,
    /// Collectibles travel this much faster than the scroll
    pub collectible_speed_factor: f32,
    /// Vertical band (min, max) for collectible centers
    pub collectible_band: [f32; 2],
    /// X where new obstacles appear
    pub spawn_x: f32,
    /// Obstacles left of this X are culled
    pub cull_x: f32,

    // === Scripted pause ===
    /// Scores that trigger a scripted pause, once each per run
    pub milestones: Vec<u32>,
    /// Grounded sampling interval while waiting to land (ms)
    pub ground_poll_ms: f32,
    /// How long the pose is held (ms)
    pub pose_hold_ms: f32,
    /// Vertical shift applied while the pose is held (px, positive = down)
    pub pose_offset: f32,
    /// Horizontal brake applied on pause entry
    pub pause_brake: PauseBrake,

    // === Player physics ===
    /// Upward launch speed of a jump (px/s)
    pub jump_velocity: f32,
    /// Forward hop given with each jump (px/s)
    pub jump_nudge: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Fraction of vertical speed kept when bouncing off the ground
    pub bounce: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            baseline_speed: -600.0,
            speed_increase_per_second: 10.0,

            spawn_interval_ms: 1200.0,
            hazard_threshold: 0.45,
            collectible_speed_factor: 1.2,
            collectible_band: [FIELD_HEIGHT - 450.0, FIELD_HEIGHT - 300.0],
            spawn_x: FIELD_WIDTH + 200.0,
            cull_x: -100.0,

            milestones: vec![3, 10, 20],
            ground_poll_ms: 50.0,
            pose_hold_ms: 2000.0,
            pose_offset: 30.0,
            pause_brake: PauseBrake::Instant,

            jump_velocity: 1200.0,
            jump_nudge: 50.0,
            gravity: 2500.0,
            bounce: 0.1,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the defaults as a starting point)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value keeps the run engine well-defined
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if !(self.baseline_speed < 0.0) {
            return Err(invalid("baseline_speed", "must be negative (leftward scroll)"));
        }
        if !(self.speed_increase_per_second >= 0.0) {
            return Err(invalid("speed_increase_per_second", "must not be negative"));
        }
        if !(self.spawn_interval_ms > 0.0) {
            return Err(invalid("spawn_interval_ms", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.hazard_threshold) {
            return Err(invalid("hazard_threshold", "must be within 0..=1"));
        }
        if !(self.collectible_speed_factor > 0.0) {
            return Err(invalid("collectible_speed_factor", "must be positive"));
        }
        let [lo, hi] = self.collectible_band;
        if !(lo <= hi) {
            return Err(invalid(
                "collectible_band",
                format!("min {lo} is above max {hi}"),
            ));
        }
        if !(self.cull_x < self.spawn_x) {
            return Err(invalid("cull_x", "must be left of spawn_x"));
        }
        if self.milestones.contains(&0) {
            return Err(invalid("milestones", "a milestone of 0 can never be reached"));
        }
        if !(self.ground_poll_ms > 0.0) {
            return Err(invalid("ground_poll_ms", "must be positive"));
        }
        if !(self.pose_hold_ms >= 0.0) {
            return Err(invalid("pose_hold_ms", "must not be negative"));
        }
        if let PauseBrake::Decay { per_second } = self.pause_brake {
            if !(per_second > 0.0) {
                return Err(invalid("pause_brake", "decay rate must be positive"));
            }
        }
        if !(self.jump_velocity > 0.0) {
            return Err(invalid("jump_velocity", "must be positive"));
        }
        if !(self.gravity > 0.0) {
            return Err(invalid("gravity", "must be positive"));
        }
        if !(0.0..1.0).contains(&self.bounce) {
            return Err(invalid("bounce", "must be within 0..1"));
        }
        Ok(())
    }

    /// Whether a score value is one of the configured milestones
    pub fn is_milestone(&self, score: u32) -> bool {
        self.milestones.contains(&score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.milestones, vec![3, 10, 20]);
        assert!(tuning.is_milestone(10));
        assert!(!tuning.is_milestone(4));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "spawn_interval_ms": 900.0 }"#).unwrap();
        assert_eq!(tuning.spawn_interval_ms, 900.0);
        assert_eq!(tuning.baseline_speed, -600.0);
        assert_eq!(tuning.pause_brake, PauseBrake::Instant);
    }

    #[test]
    fn test_pause_brake_decay_from_json() {
        let tuning =
            Tuning::from_json(r#"{ "pause_brake": { "mode": "decay", "per_second": 200.0 } }"#)
                .unwrap();
        assert_eq!(tuning.pause_brake, PauseBrake::Decay { per_second: 200.0 });
    }

    #[test]
    fn test_rejects_positive_baseline() {
        let err = Tuning::from_json(r#"{ "baseline_speed": 100.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "baseline_speed",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let tuning = Tuning {
            collectible_band: [700.0, 500.0],
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Invalid {
                field: "collectible_band",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_policy() {
        let tuning = Tuning {
            pause_brake: PauseBrake::Decay { per_second: 150.0 },
            ..Default::default()
        };
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
