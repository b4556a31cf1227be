//! Collision detection between the player and obstacles
//!
//! Both sides are reduced to inset axis-aligned boxes. Touching edges do not
//! count as a hit, so a car sitting exactly one lane-width away is safe.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, Player};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box for an entity positioned by its horizontal center and top edge
    pub fn from_top_center(pos: Vec2, size: Vec2) -> Self {
        let min = Vec2::new(pos.x - size.x * 0.5, pos.y);
        Self::new(min, min + size)
    }

    /// Shrink by `amount` on every side. Never inverts; collapses to the center instead.
    pub fn inset(self, amount: f32) -> Self {
        let center = (self.min + self.max) * 0.5;
        let min = (self.min + Vec2::splat(amount)).min(center);
        let max = (self.max - Vec2::splat(amount)).max(center);
        Self::new(min, max)
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Index of the first obstacle (in collection order) whose hit box overlaps the player's
///
/// At most one hit is reported per frame even when several overlap.
pub fn first_collision(player: &Player, obstacles: &[Obstacle]) -> Option<usize> {
    let player_box = player.hit_box();
    obstacles
        .iter()
        .position(|o| player_box.overlaps(&o.hit_box()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleKind;

    fn player_at(x: f32, y: f32) -> Player {
        let mut p = Player::new(1, 6.0);
        p.pos = Vec2::new(x, y);
        p.size = Vec2::new(46.0, 76.0);
        p
    }

    fn obstacle_at(x: f32, y: f32) -> Obstacle {
        Obstacle {
            kind: ObstacleKind::Vehicle,
            lane: 1,
            pos: Vec2::new(x, y),
            size: Vec2::new(46.0, 76.0),
            hit_inset: 6.0,
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::splat(5.0), Vec2::splat(15.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let right = Aabb::new(Vec2::new(10.0, 0.0), Vec2::new(20.0, 10.0));
        let below = Aabb::new(Vec2::new(0.0, 10.0), Vec2::new(10.0, 20.0));
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_separated_on_one_axis() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(5.0, 30.0), Vec2::new(15.0, 40.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_inset_never_inverts() {
        let b = Aabb::new(Vec2::ZERO, Vec2::splat(4.0)).inset(10.0);
        assert_eq!(b.min, Vec2::splat(2.0));
        assert_eq!(b.max, Vec2::splat(2.0));
    }

    #[test]
    fn test_inset_boxes_forgive_grazes() {
        // Bodies overlap by 10 units vertically, but the 6+6 insets absorb it
        let player = player_at(200.0, 500.0);
        let obstacles = vec![obstacle_at(200.0, 500.0 - 76.0 + 10.0)];
        assert_eq!(first_collision(&player, &obstacles), None);

        let obstacles = vec![obstacle_at(200.0, 500.0 - 76.0 + 13.0)];
        assert_eq!(first_collision(&player, &obstacles), Some(0));
    }

    #[test]
    fn test_adjacent_lane_is_safe() {
        let player = player_at(200.0, 500.0);
        let obstacles = vec![obstacle_at(304.0, 500.0)];
        assert_eq!(first_collision(&player, &obstacles), None);
    }

    #[test]
    fn test_first_overlap_wins() {
        let player = player_at(200.0, 500.0);
        let obstacles = vec![
            obstacle_at(304.0, 500.0),
            obstacle_at(200.0, 480.0),
            obstacle_at(200.0, 520.0),
        ];
        assert_eq!(first_collision(&player, &obstacles), Some(1));
    }
}
