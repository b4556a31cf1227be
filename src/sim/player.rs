//! Player lane control
//!
//! Lane changes are logical and immediate; only the drawn x-position eases
//! toward the new lane center.

use glam::Vec2;

use super::geometry::WorldGeometry;
use super::state::Player;
use crate::tuning::Tuning;
use crate::{clamp, lerp};

/// Owns the player entity and its lane-change rules
#[derive(Debug, Clone)]
pub struct PlayerController {
    player: Player,
    smoothing: f32,
}

impl PlayerController {
    pub fn new(tuning: &Tuning, geometry: &WorldGeometry) -> Self {
        let mut controller = Self {
            player: Player::new(Self::start_lane(geometry), tuning.player_hit_inset),
            smoothing: tuning.lane_smoothing,
        };
        controller.fit_to(tuning, geometry);
        controller.snap_to_target(geometry);
        controller
    }

    /// Middle lane (left of middle for an even count)
    fn start_lane(geometry: &WorldGeometry) -> usize {
        geometry.lane_count / 2
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Put the player back on the starting lane, centered
    pub fn reset(&mut self, geometry: &WorldGeometry) {
        let lane = Self::start_lane(geometry);
        self.player.lane = lane;
        self.player.target_lane = lane;
        self.snap_to_target(geometry);
    }

    /// Resize and re-seat the player for a new layout
    pub fn fit_to(&mut self, tuning: &Tuning, geometry: &WorldGeometry) {
        let scale = tuning.size_scale(
            geometry.viewport_w,
            geometry.viewport_h,
            tuning.player_scale_min,
            tuning.player_scale_max,
        );
        let size = Vec2::new(tuning.player_base.w, tuning.player_base.h) * scale;
        self.player.size = size;
        self.player.pos.y = geometry.bottom_boundary_y - size.y - tuning.player_bottom_gap;
    }

    /// Jump straight to the target lane center
    pub fn snap_to_target(&mut self, geometry: &WorldGeometry) {
        self.player.pos.x = geometry.lane_center(self.player.target_lane);
    }

    /// Move the target lane by `delta`, clamped to the road.
    /// Returns true if the target actually changed.
    pub fn shift_lane(&mut self, delta: i32, geometry: &WorldGeometry) -> bool {
        let prev = self.player.target_lane;
        let wanted = prev as i64 + delta as i64;
        let next = wanted.clamp(0, geometry.last_lane() as i64) as usize;
        self.player.target_lane = next;
        self.player.lane = next;
        next != prev
    }

    /// Ease x toward the target lane center
    pub fn advance(&mut self, dt: f32, geometry: &WorldGeometry) {
        let target = geometry.lane_center(self.player.target_lane);
        let t = clamp(dt * self.smoothing, 0.0, 1.0);
        self.player.pos.x = lerp(self.player.pos.x, target, t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (Tuning, WorldGeometry, PlayerController) {
        let tuning = Tuning::default();
        let geometry = WorldGeometry::new(&tuning, 400.0, 800.0);
        let controller = PlayerController::new(&tuning, &geometry);
        (tuning, geometry, controller)
    }

    #[test]
    fn test_starts_centered_on_middle_lane() {
        let (_, geometry, c) = setup();
        assert_eq!(c.player().lane, 1);
        assert_eq!(c.player().target_lane, 1);
        assert_eq!(c.player().pos.x, geometry.lane_centers[1]);
    }

    #[test]
    fn test_player_sits_above_bottom_boundary() {
        let (_, geometry, c) = setup();
        // min(400, 800) / 520 -> 0.769, clamped up to 0.85
        let p = c.player();
        assert!((p.size.x - 46.0 * 0.85).abs() < 1e-3);
        assert!((p.size.y - 76.0 * 0.85).abs() < 1e-3);
        assert!((p.pos.y + p.size.y + 8.0 - geometry.bottom_boundary_y).abs() < 1e-3);
    }

    #[test]
    fn test_shift_clamps_at_edges() {
        let (_, geometry, mut c) = setup();
        assert!(c.shift_lane(-1, &geometry));
        assert!(!c.shift_lane(-1, &geometry));
        assert_eq!(c.player().target_lane, 0);
        assert!(c.shift_lane(1, &geometry));
        assert!(c.shift_lane(1, &geometry));
        assert!(!c.shift_lane(1, &geometry));
        assert_eq!(c.player().target_lane, 2);
        assert_eq!(c.player().lane, 2);
    }

    #[test]
    fn test_advance_converges_without_overshoot() {
        let (_, geometry, mut c) = setup();
        c.shift_lane(1, &geometry);
        let target = geometry.lane_centers[2];
        let mut dist = (target - c.player().pos.x).abs();
        for _ in 0..60 {
            c.advance(1.0 / 60.0, &geometry);
            let x = c.player().pos.x;
            assert!(x <= target);
            let d = (target - x).abs();
            assert!(d <= dist);
            dist = d;
        }
        assert!(dist < 0.01);
        // ~95% of the way there after 0.21s
        let (_, geometry, mut c) = setup();
        c.shift_lane(1, &geometry);
        let start = c.player().pos.x;
        for _ in 0..21 {
            c.advance(0.01, &geometry);
        }
        let covered = (c.player().pos.x - start) / (target - start);
        assert!(covered > 0.94, "covered {}", covered);
    }

    #[test]
    fn test_advance_large_dt_snaps() {
        let (_, geometry, mut c) = setup();
        c.shift_lane(-1, &geometry);
        c.advance(1.0, &geometry);
        assert_eq!(c.player().pos.x, geometry.lane_centers[0]);
    }

    #[test]
    fn test_advance_zero_dt_is_noop() {
        let (_, geometry, mut c) = setup();
        c.shift_lane(1, &geometry);
        let before = c.player().pos.x;
        c.advance(0.0, &geometry);
        assert_eq!(c.player().pos.x, before);
    }

    proptest! {
        #[test]
        fn prop_target_lane_in_bounds(shifts in proptest::collection::vec(-3i32..=3, 0..64)) {
            let (_, geometry, mut c) = setup();
            for delta in shifts {
                c.shift_lane(delta, &geometry);
                prop_assert!(c.player().target_lane <= geometry.last_lane());
                prop_assert_eq!(c.player().lane, c.player().target_lane);
            }
        }

        #[test]
        fn prop_distance_shrinks(dt in 0.001f32..(1.0 / 14.0), steps in 1usize..40) {
            let (_, geometry, mut c) = setup();
            c.shift_lane(1, &geometry);
            let target = geometry.lane_centers[2];
            let mut dist = target - c.player().pos.x;
            for _ in 0..steps {
                c.advance(dt, &geometry);
                let d = target - c.player().pos.x;
                prop_assert!(d >= 0.0);
                prop_assert!(d <= dist);
                dist = d;
            }
        }
    }
}
