//! Lane Rush - A three-lane road dodging arcade game
//!
//! Core modules:
//! - `sim`: Simulation engine (lanes, spawning, collisions, run lifecycle)
//! - `renderer`: Scene sink consumed by the drawing layer
//! - `platform`: Input abstraction (keys, hold-repeat, swipes)
//! - `persistence`: Integer key/value storage for the best score
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{FinalScore, ScoreKeeper};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Largest simulated step per frame (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 20.0;

    /// Reference viewport edge for size scaling
    pub const SCALE_REFERENCE: f32 = 520.0;

    /// Dash pattern period of the lane markers (dash 28 + gap 20)
    pub const ROAD_DASH_PERIOD: f32 = 48.0;

    /// Storage key for the persisted best score
    pub const BEST_SCORE_KEY: &str = "lane_rush_best";
}

/// Clamp that maps NaN to the lower bound and never panics
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() {
        return lo;
    }
    v.max(lo).min(hi)
}

/// Linear interpolation `a + (b - a) * t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(clamp(f32::NAN, 0.0, 1.0), 0.0);
        assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.95, 0.42, 0.0), 0.95);
        assert!((lerp(0.95, 0.42, 1.0) - 0.42).abs() < 1e-6);
    }
}
