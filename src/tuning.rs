//! Data-driven game balance
//!
//! Every number that shapes a run lives here so it can be tweaked from JSON
//! without touching the simulation. `Tuning::default()` is the shipped balance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems found while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Width/height pair in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseSize {
    pub w: f32,
    pub h: f32,
}

/// Game balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Road ===
    pub lane_count: usize,
    /// Fraction of the viewport width covered by the road
    pub road_width_frac: f32,
    /// Fraction of the viewport height above the road's top boundary
    pub top_margin_frac: f32,
    /// Fraction of the viewport height below the road's bottom boundary
    pub bottom_margin_frac: f32,

    // === Run progression ===
    pub initial_speed: f32,
    pub acceleration: f32,
    pub spawn_interval_start: f32,
    pub spawn_interval_end: f32,
    /// Seconds until the spawn interval reaches its floor
    pub spawn_ramp_secs: f32,
    /// Score gained per unit of distance travelled
    pub score_rate: f32,

    // === Player ===
    pub player_base: BaseSize,
    pub player_scale_min: f32,
    pub player_scale_max: f32,
    /// Gap between the player's bottom edge and the road's bottom boundary
    pub player_bottom_gap: f32,
    pub player_hit_inset: f32,
    /// Exponential smoothing rate toward the target lane (1/s)
    pub lane_smoothing: f32,

    // === Obstacles ===
    pub vehicle_base: BaseSize,
    pub barrier_base: BaseSize,
    pub obstacle_scale_min: f32,
    pub obstacle_scale_max: f32,
    pub obstacle_hit_inset: f32,
    pub vehicle_probability: f32,
    /// Minimum free distance below the top boundary before a lane accepts a spawn
    pub spawn_spacing: f32,
    /// Gap between a fresh obstacle's bottom edge and the top boundary
    pub spawn_gap: f32,
    pub despawn_margin: f32,

    // === Second spawn ===
    pub extra_spawn_after_secs: f32,
    pub extra_spawn_speed_floor: f32,
    pub extra_spawn_speed_span: f32,
    pub extra_spawn_max_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: 3,
            road_width_frac: 0.78,
            top_margin_frac: 0.12,
            bottom_margin_frac: 0.10,

            initial_speed: 320.0,
            acceleration: 16.0,
            spawn_interval_start: 0.95,
            spawn_interval_end: 0.42,
            spawn_ramp_secs: 70.0,
            score_rate: 0.06,

            player_base: BaseSize { w: 46.0, h: 76.0 },
            player_scale_min: 0.85,
            player_scale_max: 1.15,
            player_bottom_gap: 8.0,
            player_hit_inset: 6.0,
            lane_smoothing: 14.0,

            vehicle_base: BaseSize { w: 46.0, h: 76.0 },
            barrier_base: BaseSize { w: 58.0, h: 56.0 },
            obstacle_scale_min: 0.85,
            obstacle_scale_max: 1.2,
            obstacle_hit_inset: 6.0,
            vehicle_probability: 0.72,
            spawn_spacing: 110.0,
            spawn_gap: 20.0,
            despawn_margin: 120.0,

            extra_spawn_after_secs: 18.0,
            extra_spawn_speed_floor: 420.0,
            extra_spawn_speed_span: 900.0,
            extra_spawn_max_chance: 0.35,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning file; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.lane_count == 0 {
            return invalid("lane_count", "must be at least 1");
        }
        if !(self.road_width_frac > 0.0 && self.road_width_frac <= 1.0) {
            return invalid("road_width_frac", "must be in (0, 1]");
        }
        if self.top_margin_frac < 0.0
            || self.bottom_margin_frac < 0.0
            || self.top_margin_frac + self.bottom_margin_frac >= 1.0
        {
            return invalid("top_margin_frac", "margins must leave room for the road");
        }
        if self.spawn_interval_end <= 0.0 {
            return invalid("spawn_interval_end", "must be positive");
        }
        if self.spawn_interval_end > self.spawn_interval_start {
            return invalid("spawn_interval_end", "must not exceed spawn_interval_start");
        }
        if self.spawn_ramp_secs <= 0.0 {
            return invalid("spawn_ramp_secs", "must be positive");
        }
        if !(self.initial_speed >= 0.0) {
            return invalid("initial_speed", "must not be negative");
        }
        if !(self.acceleration >= 0.0) {
            return invalid("acceleration", "speed must never decrease");
        }
        if !(self.score_rate >= 0.0) {
            return invalid("score_rate", "score must never decrease");
        }
        for (field, inset) in [
            ("player_hit_inset", self.player_hit_inset),
            ("obstacle_hit_inset", self.obstacle_hit_inset),
        ] {
            if !(inset >= 0.0) {
                return invalid(field, "must not be negative");
            }
        }
        if self.lane_smoothing <= 0.0 {
            return invalid("lane_smoothing", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.vehicle_probability) {
            return invalid("vehicle_probability", "must be a probability");
        }
        for (field, size) in [
            ("player_base", self.player_base),
            ("vehicle_base", self.vehicle_base),
            ("barrier_base", self.barrier_base),
        ] {
            if size.w <= 0.0 || size.h <= 0.0 {
                return invalid(field, "sizes must be positive");
            }
        }
        Ok(())
    }

    /// Uniform scale applied to entity sizes for a viewport
    pub fn size_scale(&self, viewport_w: f32, viewport_h: f32, min: f32, max: f32) -> f32 {
        crate::clamp(
            viewport_w.min(viewport_h) / crate::consts::SCALE_REFERENCE,
            min,
            max,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "initial_speed": 400.0 }"#).unwrap();
        assert_eq!(tuning.initial_speed, 400.0);
        assert_eq!(tuning.lane_count, 3);
        assert_eq!(tuning.spawn_spacing, 110.0);
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = Tuning::from_json(r#"{ "lane_count": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "lane_count",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_ramp() {
        let err = Tuning::from_json(r#"{ "spawn_interval_end": 2.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_negative_rates() {
        for (json, field) in [
            (r#"{ "score_rate": -0.1 }"#, "score_rate"),
            (r#"{ "initial_speed": -50.0 }"#, "initial_speed"),
            (r#"{ "acceleration": -1.0 }"#, "acceleration"),
            (r#"{ "player_hit_inset": -6.0 }"#, "player_hit_inset"),
            (r#"{ "obstacle_hit_inset": -2.0 }"#, "obstacle_hit_inset"),
        ] {
            match Tuning::from_json(json) {
                Err(TuningError::Invalid { field: f, .. }) => assert_eq!(f, field),
                other => panic!("{} accepted: {:?}", json, other),
            }
        }
        assert!(Tuning::from_json(r#"{ "score_rate": 0.0, "initial_speed": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ nope").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
        assert!(err.to_string().starts_with("malformed tuning json"));
    }

    #[test]
    fn test_size_scale_clamps() {
        let t = Tuning::default();
        assert_eq!(t.size_scale(2000.0, 2000.0, 0.85, 1.2), 1.2);
        assert_eq!(t.size_scale(100.0, 900.0, 0.85, 1.2), 0.85);
        assert!((t.size_scale(520.0, 800.0, 0.85, 1.2) - 1.0).abs() < 1e-6);
    }
}
