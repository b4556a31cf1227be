//! Run lifecycle state machine
//!
//! Pure transition table; side effects (session reset, frame clock reset,
//! cues) are applied by the engine based on the returned `Transition`.

use serde::{Deserialize, Serialize};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    #[default]
    Menu,
    /// Instructions overlay
    HowToPlay,
    /// Active run
    Running,
    /// Run suspended; no simulated time passes
    Paused,
    /// Run ended in a crash
    GameOver,
}

/// Events that may move the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    OpenHow,
    Close,
    Pause,
    /// Host reports the page/window became hidden
    Hidden,
    Resume,
    TogglePause,
    Crash,
    Restart,
    BackToMenu,
}

/// An accepted state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GamePhase,
    pub to: GamePhase,
    pub trigger: Trigger,
}

impl Transition {
    /// Whether a fresh run session must be set up
    pub fn resets_session(&self) -> bool {
        matches!(self.trigger, Trigger::Start | Trigger::Restart)
    }

    /// Whether the frame clock must forget its last timestamp
    pub fn resumes(&self) -> bool {
        self.from == GamePhase::Paused && self.to == GamePhase::Running
    }

    /// Whether this came from a player-operated control
    pub fn is_ui(&self) -> bool {
        !matches!(self.trigger, Trigger::Crash | Trigger::Hidden)
    }
}

/// Lifecycle governor; starts in `Menu` and has no terminal state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStateMachine {
    phase: GamePhase,
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Target phase for a trigger, or `None` if the trigger is ignored here
    pub fn target(phase: GamePhase, trigger: Trigger) -> Option<GamePhase> {
        use GamePhase::*;
        use Trigger::*;

        match (phase, trigger) {
            (Menu, Start) => Some(Running),
            (Menu, OpenHow) => Some(HowToPlay),
            (HowToPlay, Close) => Some(Menu),
            (Running, Pause | Hidden | TogglePause) => Some(Paused),
            (Paused, Resume | TogglePause) => Some(Running),
            (Running, Crash) => Some(GameOver),
            (Running | Paused | GameOver, Restart) => Some(Running),
            (Paused | GameOver, BackToMenu) => Some(Menu),
            _ => None,
        }
    }

    /// Apply a trigger; unlisted combinations are silently ignored
    pub fn apply(&mut self, trigger: Trigger) -> Option<Transition> {
        let to = Self::target(self.phase, trigger)?;
        let from = self.phase;
        self.phase = to;
        log::info!("Phase {:?} -> {:?} ({:?})", from, to, trigger);
        Some(Transition { from, to, trigger })
    }
}
