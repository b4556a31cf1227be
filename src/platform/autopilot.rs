//! Demo driver that plays the game through the normal command surface

use super::input::Command;
use crate::sim::{Obstacle, Player, WorldGeometry};

/// Steers toward the lane whose nearest oncoming obstacle is farthest away
#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    cooldown: f32,
}

impl Autopilot {
    /// Minimum seconds between decisions, so lane changes can settle
    const DECISION_INTERVAL: f32 = 0.12;

    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a command for this frame, if any
    pub fn decide(
        &mut self,
        dt: f32,
        geometry: &WorldGeometry,
        player: &Player,
        obstacles: &[Obstacle],
    ) -> Option<Command> {
        self.cooldown = (self.cooldown - dt).max(0.0);
        if self.cooldown > 0.0 {
            return None;
        }

        let current = player.target_lane;
        let mut best = current;
        let mut best_clearance = Self::clearance(current, player, obstacles);
        for lane in 0..geometry.lane_count {
            let c = Self::clearance(lane, player, obstacles);
            // Ties go to the lane nearest the current one
            let closer = lane.abs_diff(current) < best.abs_diff(current);
            if c > best_clearance || (c == best_clearance && closer) {
                best = lane;
                best_clearance = c;
            }
        }

        if best == current {
            return None;
        }
        self.cooldown = Self::DECISION_INTERVAL;
        Some(if best < current {
            Command::ShiftLeft
        } else {
            Command::ShiftRight
        })
    }

    /// Distance from the player's nose to the closest obstacle still ahead in `lane`
    fn clearance(lane: usize, player: &Player, obstacles: &[Obstacle]) -> f32 {
        obstacles
            .iter()
            .filter(|o| o.lane == lane && o.pos.y < player.pos.y + player.size.y)
            .map(|o| player.pos.y - (o.pos.y + o.size.y))
            .fold(f32::INFINITY, f32::min)
    }
}
