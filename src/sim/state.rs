//! Simulation entities and per-run state
//!
//! Positions use screen space: x grows right, y grows down. An entity's `pos.x`
//! is its horizontal center and `pos.y` its top edge, matching how the road
//! scrolls toward the bottom of the viewport.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::phase::GamePhase;
use crate::tuning::Tuning;

/// The player's vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Logical lane; changes instantly on a shift
    pub lane: usize,
    /// Lane the visual position is converging toward
    pub target_lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
    /// Shrinks the collision box on every side
    pub hit_inset: f32,
}

impl Player {
    pub fn new(lane: usize, hit_inset: f32) -> Self {
        Self {
            lane,
            target_lane: lane,
            pos: Vec2::ZERO,
            size: Vec2::ZERO,
            hit_inset,
        }
    }

    /// Collision box, inset from the drawn body
    pub fn hit_box(&self) -> Aabb {
        Aabb::from_top_center(self.pos, self.size).inset(self.hit_inset)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Slower traffic, tall and narrow
    Vehicle,
    /// Road block, wide and squat
    Barrier,
}

/// A hazard travelling down a lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub lane: usize,
    pub pos: Vec2,
    pub size: Vec2,
    pub hit_inset: f32,
}

impl Obstacle {
    pub fn hit_box(&self) -> Aabb {
        Aabb::from_top_center(self.pos, self.size).inset(self.hit_inset)
    }
}

/// Mutable values for the run in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSession {
    /// Simulated seconds since the run started
    pub elapsed: f32,
    /// World scroll speed (units/s), never decreases during a run
    pub speed: f32,
    pub acceleration: f32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    /// Fractional score, never decreases while alive
    pub score: f64,
    pub alive: bool,
}

impl RunSession {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            elapsed: 0.0,
            speed: tuning.initial_speed,
            acceleration: tuning.acceleration,
            spawn_timer: 0.0,
            spawn_interval: tuning.spawn_interval_start,
            score: 0.0,
            alive: true,
        }
    }

    /// Score as shown on the HUD
    #[inline]
    pub fn display_score(&self) -> u64 {
        self.score as u64
    }
}

/// Notifications for the host, drained once per frame
///
/// Audio cues are derived from these; none of them feed back into the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player's target lane actually moved
    LaneChanged { lane: usize },
    /// A menu/overlay control was accepted
    UiClick,
    /// The run ended in a collision
    Crashed { score: u64, new_best: bool },
    /// Lifecycle transition, for overlay visibility
    PhaseChanged { from: GamePhase, to: GamePhase },
}
