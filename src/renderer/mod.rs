//! Rendering sink
//!
//! The simulation exposes plain values through `SceneView`; a `Renderer`
//! turns them into pixels (or text). Nothing drawn here feeds back into play.

pub mod text;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use text::TextRenderer;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::highscores::FinalScore;
use crate::sim::{GamePhase, Obstacle, Player, WorldGeometry};

/// Everything needed to draw one frame, borrowed from the engine
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub geometry: &'a WorldGeometry,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub phase: GamePhase,
    /// Current run score, truncated
    pub score: u64,
    pub best: u64,
    /// Set once the last run has crashed
    pub final_score: Option<FinalScore>,
    /// Lane marker scroll offset within one dash period
    pub road_scroll: f32,
}

/// Consumes scene snapshots
pub trait Renderer {
    fn draw(&mut self, scene: &SceneView<'_>);
}

/// Scene colors (CSS syntax)
pub mod palette {
    pub const BACKGROUND: &str = "#070a0e";
    pub const ASPHALT: &str = "#0f1620";
    pub const SHOULDER: &str = "#111a25";
    pub const LANE_LINE: &str = "rgba(255,255,255,0.12)";
    pub const DASH: &str = "rgba(255,255,255,0.55)";
    pub const PLAYER: &str = "#4cc2ff";
    pub const VEHICLE: &str = "#d2404f";
    pub const BARRIER: &str = "#2a3340";
    pub const BARRIER_STRIPE: &str = "rgba(255,207,76,0.85)";
    pub const TEXT: &str = "#eaf2ff";
}
