//! Canvas 2D renderer for the browser build

use web_sys::CanvasRenderingContext2d;

use super::{Renderer, SceneView, palette};
use crate::consts::ROAD_DASH_PERIOD;
use crate::sim::{GamePhase, ObstacleKind};

const DASH_LEN: f64 = 28.0;
const DASH_WIDTH: f64 = 6.0;
const SHOULDER_WIDTH: f64 = 16.0;

/// Flat-shaded road, cars and barriers
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn rect(&self, color: &str, x: f32, y: f32, w: f32, h: f32) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn draw_road(&self, scene: &SceneView<'_>) {
        let g = scene.geometry;
        let top = g.top_boundary_y;
        let height = g.bottom_boundary_y - top;

        self.rect(palette::BACKGROUND, 0.0, 0.0, g.viewport_w, g.viewport_h);
        let road_w = g.road_right - g.road_left;
        self.rect(palette::ASPHALT, g.road_left, top, road_w, height);
        let shoulder = SHOULDER_WIDTH as f32;
        let left_shoulder = g.road_left - shoulder;
        self.rect(palette::SHOULDER, left_shoulder, top, shoulder, height);
        self.rect(palette::SHOULDER, g.road_right, top, shoulder, height);

        for i in 1..g.lane_count {
            let x = g.road_left + g.lane_width * i as f32;
            self.rect(palette::LANE_LINE, x - 1.0, top, 2.0, height);
        }

        // Scrolling center dashes
        self.ctx.set_fill_style_str(palette::DASH);
        let period = ROAD_DASH_PERIOD as f64;
        for &cx in &g.lane_centers {
            let mut y = top as f64 - period + scene.road_scroll as f64;
            while y < g.bottom_boundary_y as f64 + period {
                self.ctx.fill_rect(cx as f64 - DASH_WIDTH / 2.0, y, DASH_WIDTH, DASH_LEN);
                y += period;
            }
        }
    }

    fn draw_overlay_text(&self, scene: &SceneView<'_>) {
        let g = scene.geometry;
        self.ctx.set_fill_style_str(palette::TEXT);
        self.ctx.set_font("bold 20px system-ui, sans-serif");
        self.ctx.set_text_align("left");
        let hud = format!("{}  best {}", scene.score, scene.best);
        let _ = self.ctx.fill_text(&hud, 12.0, 28.0);

        let banner = match scene.phase {
            GamePhase::Paused => Some("PAUSED".to_string()),
            GamePhase::GameOver => scene.final_score.map(|f| {
                let tag = if f.new_best { " NEW BEST" } else { "" };
                format!("CRASHED - {}{}", f.score, tag)
            }),
            _ => None,
        };
        if let Some(text) = banner {
            self.ctx.set_text_align("center");
            let (cx, cy) = (g.viewport_w as f64 / 2.0, g.viewport_h as f64 / 2.0);
            let _ = self.ctx.fill_text(&text, cx, cy);
        }
    }
}

impl Renderer for CanvasRenderer {
    fn draw(&mut self, scene: &SceneView<'_>) {
        self.draw_road(scene);

        for o in scene.obstacles {
            let x = o.pos.x - o.size.x / 2.0;
            match o.kind {
                ObstacleKind::Vehicle => {
                    self.rect(palette::VEHICLE, x, o.pos.y, o.size.x, o.size.y);
                }
                ObstacleKind::Barrier => {
                    self.rect(palette::BARRIER, x, o.pos.y, o.size.x, o.size.y);
                    let (sx, sw) = (x + 8.0, o.size.x - 16.0);
                    let (top, bottom) = (o.pos.y + 10.0, o.pos.y + o.size.y - 18.0);
                    self.rect(palette::BARRIER_STRIPE, sx, top, sw, 8.0);
                    self.rect(palette::BARRIER_STRIPE, sx, bottom, sw, 8.0);
                }
            }
        }

        let p = scene.player;
        let px = p.pos.x - p.size.x / 2.0;
        self.rect(palette::PLAYER, px, p.pos.y, p.size.x, p.size.y);

        self.draw_overlay_text(scene);
    }
}
