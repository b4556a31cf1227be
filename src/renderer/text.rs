//! Character-grid renderer for terminals and logs

use super::{Renderer, SceneView};
use crate::sim::{GamePhase, ObstacleKind};

/// Renders the road as rows of lane cells: `A` player, `V` vehicle, `#` barrier
#[derive(Debug, Clone)]
pub struct TextRenderer {
    rows: usize,
    frame: String,
}

impl TextRenderer {
    pub fn new(rows: usize) -> Self {
        Self {
            rows: rows.max(2),
            frame: String::new(),
        }
    }

    /// Last drawn frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Grid row covering screen y, if it is on the road
    fn row_of(&self, scene: &SceneView<'_>, y: f32) -> Option<usize> {
        let g = scene.geometry;
        let span = g.bottom_boundary_y - g.top_boundary_y;
        if span <= 0.0 || y < g.top_boundary_y || y >= g.bottom_boundary_y {
            return None;
        }
        let row = ((y - g.top_boundary_y) / span * self.rows as f32) as usize;
        Some(row.min(self.rows - 1))
    }
}

impl Renderer for TextRenderer {
    fn draw(&mut self, scene: &SceneView<'_>) {
        let lanes = scene.geometry.lane_count;
        let mut grid = vec![vec!['.'; lanes]; self.rows];

        for o in scene.obstacles {
            let glyph = match o.kind {
                ObstacleKind::Vehicle => 'V',
                ObstacleKind::Barrier => '#',
            };
            // Mark every row the body spans
            for y in [o.pos.y, o.pos.y + o.size.y * 0.5, o.pos.y + o.size.y - 1.0] {
                if let Some(row) = self.row_of(scene, y) {
                    grid[row][o.lane.min(lanes - 1)] = glyph;
                }
            }
        }

        let p = scene.player;
        let lane = scene.geometry.lane_at(p.pos.x).unwrap_or(p.lane);
        for y in [p.pos.y, p.pos.y + p.size.y - 1.0] {
            if let Some(row) = self.row_of(scene, y) {
                let cell = &mut grid[row][lane];
                *cell = if *cell == '.' { 'A' } else { 'X' };
            }
        }

        self.frame.clear();
        let status = match scene.phase {
            GamePhase::Menu => "MENU",
            GamePhase::HowToPlay => "HOW TO PLAY",
            GamePhase::Running => "RUNNING",
            GamePhase::Paused => "PAUSED",
            GamePhase::GameOver => "GAME OVER",
        };
        self.frame.push_str(&format!(
            "{} score {} best {}\n",
            status, scene.score, scene.best
        ));
        for row in grid {
            self.frame.push('|');
            for cell in row {
                self.frame.push(cell);
            }
            self.frame.push_str("|\n");
        }
        if let Some(fin) = scene.final_score {
            self.frame.push_str(&format!(
                "final {}{}\n",
                fin.score,
                if fin.new_best { " (new best!)" } else { "" }
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, Player, WorldGeometry};
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_draws_player_and_obstacles() {
        let geometry = WorldGeometry::new(&Tuning::default(), 400.0, 1000.0);
        let mut player = Player::new(1, 6.0);
        player.pos = Vec2::new(geometry.lane_centers[1], 800.0);
        player.size = Vec2::new(46.0, 76.0);
        let obstacles = vec![Obstacle {
            kind: ObstacleKind::Barrier,
            lane: 0,
            pos: Vec2::new(geometry.lane_centers[0], 130.0),
            size: Vec2::new(58.0, 56.0),
            hit_inset: 6.0,
        }];
        let scene = SceneView {
            geometry: &geometry,
            player: &player,
            obstacles: &obstacles,
            phase: GamePhase::Running,
            score: 12,
            best: 40,
            final_score: None,
            road_scroll: 0.0,
        };
        let mut r = TextRenderer::new(10);
        r.draw(&scene);
        let lines: Vec<&str> = r.frame().lines().collect();
        assert_eq!(lines[0], "RUNNING score 12 best 40");
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], "|#..|");
        assert!(lines[9].contains('A') || lines[10].contains('A'));
    }
}
