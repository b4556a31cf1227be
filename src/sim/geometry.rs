//! Road layout derived from the viewport
//!
//! The road is a horizontally centered band split into equal lanes. Everything
//! that has an x-coordinate in the simulation takes it from `lane_centers`.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Lane layout for the current viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldGeometry {
    pub viewport_w: f32,
    pub viewport_h: f32,
    pub lane_count: usize,
    pub lane_width: f32,
    /// Lane center x-coordinates, strictly increasing and evenly spaced
    pub lane_centers: Vec<f32>,
    pub road_left: f32,
    pub road_right: f32,
    pub top_boundary_y: f32,
    pub bottom_boundary_y: f32,
}

impl WorldGeometry {
    pub fn new(tuning: &Tuning, viewport_w: f32, viewport_h: f32) -> Self {
        let mut geometry = Self {
            viewport_w: 0.0,
            viewport_h: 0.0,
            lane_count: tuning.lane_count.max(1),
            lane_width: 0.0,
            lane_centers: Vec::new(),
            road_left: 0.0,
            road_right: 0.0,
            top_boundary_y: 0.0,
            bottom_boundary_y: 0.0,
        };
        geometry.recompute(tuning, viewport_w, viewport_h);
        geometry
    }

    /// Rebuild the layout for a new viewport size. Idempotent.
    pub fn recompute(&mut self, tuning: &Tuning, viewport_w: f32, viewport_h: f32) {
        // Degenerate sizes (minimized window) still yield ordered lanes
        let w = viewport_w.max(1.0);
        let h = viewport_h.max(1.0);

        let road_w = w * tuning.road_width_frac;
        self.viewport_w = w;
        self.viewport_h = h;
        self.road_left = (w - road_w) * 0.5;
        self.road_right = self.road_left + road_w;
        self.lane_width = road_w / self.lane_count as f32;

        self.lane_centers.clear();
        self.lane_centers.extend(
            (0..self.lane_count).map(|i| self.road_left + self.lane_width * (i as f32 + 0.5)),
        );

        self.top_boundary_y = h * tuning.top_margin_frac;
        self.bottom_boundary_y = h * (1.0 - tuning.bottom_margin_frac);
    }

    /// Center x of a lane; out-of-range indices clamp to the outer lanes
    #[inline]
    pub fn lane_center(&self, lane: usize) -> f32 {
        self.lane_centers[lane.min(self.lane_count - 1)]
    }

    #[inline]
    pub fn last_lane(&self) -> usize {
        self.lane_count - 1
    }

    /// y beyond which obstacles are discarded
    #[inline]
    pub fn despawn_y(&self, margin: f32) -> f32 {
        self.viewport_h + margin
    }

    /// Lane whose corridor contains `x`, if any
    pub fn lane_at(&self, x: f32) -> Option<usize> {
        if x < self.road_left || x >= self.road_right {
            return None;
        }
        let lane = ((x - self.road_left) / self.lane_width) as usize;
        Some(lane.min(self.last_lane()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers_evenly_spaced() {
        let g = WorldGeometry::new(&Tuning::default(), 400.0, 800.0);
        assert_eq!(g.lane_centers.len(), 3);
        assert!((g.road_right - g.road_left - 312.0).abs() < 1e-3);
        assert!((g.road_left - 44.0).abs() < 1e-3);
        assert!((g.lane_centers[0] - 96.0).abs() < 1e-3);
        assert!((g.lane_centers[1] - 200.0).abs() < 1e-3);
        assert!((g.lane_centers[2] - 304.0).abs() < 1e-3);
        for pair in g.lane_centers.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - g.lane_width).abs() < 1e-3);
        }
    }

    #[test]
    fn test_boundaries() {
        let g = WorldGeometry::new(&Tuning::default(), 400.0, 1000.0);
        assert!((g.top_boundary_y - 120.0).abs() < 1e-3);
        assert!((g.bottom_boundary_y - 900.0).abs() < 1e-3);
        assert!((g.despawn_y(120.0) - 1120.0).abs() < 1e-3);
    }

    #[test]
    fn test_recompute_idempotent() {
        let tuning = Tuning::default();
        let mut g = WorldGeometry::new(&tuning, 640.0, 480.0);
        let snapshot = g.clone();
        g.recompute(&tuning, 640.0, 480.0);
        assert_eq!(g, snapshot);
        g.recompute(&tuning, 1280.0, 720.0);
        assert_ne!(g, snapshot);
        g.recompute(&tuning, 640.0, 480.0);
        assert_eq!(g, snapshot);
    }

    #[test]
    fn test_lane_at() {
        let g = WorldGeometry::new(&Tuning::default(), 400.0, 800.0);
        assert_eq!(g.lane_at(10.0), None);
        assert_eq!(g.lane_at(96.0), Some(0));
        assert_eq!(g.lane_at(200.0), Some(1));
        assert_eq!(g.lane_at(355.0), Some(2));
        assert_eq!(g.lane_at(357.0), None);
    }

    #[test]
    fn test_zero_viewport_stays_ordered() {
        let g = WorldGeometry::new(&Tuning::default(), 0.0, 0.0);
        assert!(g.lane_centers.windows(2).all(|p| p[1] > p[0]));
    }
}
