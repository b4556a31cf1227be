//! Device-agnostic input
//!
//! Keyboard, on-screen buttons and swipes all become `Command`s. Held
//! direction buttons repeat through an explicit timer polled once per frame.

use crate::audio::{AudioSink, play_events};
use crate::persistence::PersistentStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, SimulationEngine};

/// Everything the player can ask the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ShiftLeft,
    ShiftRight,
    Start,
    OpenHow,
    Close,
    Pause,
    Resume,
    TogglePause,
    Restart,
    BackToMenu,
}

impl Command {
    /// Lane delta for shift commands
    pub fn lane_delta(self) -> Option<i32> {
        match self {
            Command::ShiftLeft => Some(-1),
            Command::ShiftRight => Some(1),
            _ => None,
        }
    }
}

/// Keyboard mapping (`KeyboardEvent.key` values)
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Command::ShiftLeft),
        "ArrowRight" | "d" | "D" => Some(Command::ShiftRight),
        "p" | "P" | "Escape" => Some(Command::TogglePause),
        "r" | "R" => Some(Command::Restart),
        _ => None,
    }
}

/// Route a command to the engine. Returns true if it changed anything.
pub fn dispatch<S: PersistentStore>(engine: &mut SimulationEngine<S>, command: Command) -> bool {
    if let Some(delta) = command.lane_delta() {
        return engine.shift_lane(delta);
    }
    let transition = match command {
        Command::Start => engine.start(),
        Command::OpenHow => engine.open_how(),
        Command::Close => engine.close(),
        Command::Pause => engine.pause(),
        Command::Resume => engine.resume(),
        Command::TogglePause => engine.toggle_pause(),
        Command::Restart => engine.restart(),
        Command::BackToMenu => engine.back_to_menu(),
        Command::ShiftLeft | Command::ShiftRight => None,
    };
    transition.is_some()
}

/// Dispatch from inside an input handler and play the resulting cues right
/// away, while the gesture still counts as user activation. Returns the
/// drained events so the host can update its overlays.
pub fn dispatch_with_cues<S: PersistentStore>(
    engine: &mut SimulationEngine<S>,
    sink: &mut dyn AudioSink,
    command: Command,
) -> Vec<GameEvent> {
    sink.unlock();
    dispatch(engine, command);
    let events = engine.drain_events();
    play_events(sink, &events);
    events
}

/// Pointer-up is a button's primary activation and swallows the click the
/// same tap produces afterwards. A lone click still activates.
#[derive(Debug, Clone, Default)]
pub struct TapGuard {
    pending_click: bool,
}

impl TapGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the button should act
    pub fn pointer_up(&mut self) -> bool {
        self.pending_click = true;
        true
    }

    /// Returns whether the button should act
    pub fn click(&mut self) -> bool {
        !std::mem::take(&mut self.pending_click)
    }
}

/// Repeat timer for one held control
#[derive(Debug, Clone)]
pub struct HoldRepeat {
    command: Command,
    interval: f32,
    held: bool,
    elapsed: f32,
}

impl HoldRepeat {
    pub fn new(command: Command, interval: f32) -> Self {
        Self {
            command,
            interval: interval.max(f32::EPSILON),
            held: false,
            elapsed: 0.0,
        }
    }

    pub fn from_settings(command: Command, settings: &Settings) -> Self {
        Self::new(command, settings.hold_repeat_secs)
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Control went down: fire once immediately
    pub fn press(&mut self) -> Command {
        self.held = true;
        self.elapsed = 0.0;
        self.command
    }

    pub fn release(&mut self) {
        self.held = false;
    }

    /// Accrue frame time; yields the command when a repeat is due
    pub fn poll(&mut self, dt: f32) -> Option<Command> {
        if !self.held {
            return None;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed > self.interval {
            self.elapsed = 0.0;
            return Some(self.command);
        }
        None
    }
}

/// Single-touch horizontal swipe recognizer
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    min_distance: f32,
    axis_ratio: f32,
    origin: Option<(f32, f32)>,
}

impl SwipeTracker {
    pub fn new(min_distance: f32, axis_ratio: f32) -> Self {
        Self {
            min_distance,
            axis_ratio,
            origin: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.swipe_min_distance, settings.swipe_axis_ratio)
    }

    /// Touch began; only tracked during a run and for a single finger
    pub fn begin(&mut self, phase: GamePhase, touches: usize, x: f32, y: f32) {
        if phase == GamePhase::Running && touches == 1 {
            self.origin = Some((x, y));
        }
    }

    /// Touch ended; returns a shift command for a clear horizontal swipe
    pub fn end(&mut self, phase: GamePhase, x: f32, y: f32) -> Option<Command> {
        let (x0, y0) = self.origin.take()?;
        if phase != GamePhase::Running {
            return None;
        }
        let dx = x - x0;
        let dy = y - y0;
        if dx.abs() > self.min_distance && dx.abs() > dy.abs() * self.axis_ratio {
            Some(if dx < 0.0 {
                Command::ShiftLeft
            } else {
                Command::ShiftRight
            })
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, CueLog};
    use crate::persistence::MemoryStore;
    use crate::sim::ScriptedRandom;
    use crate::tuning::Tuning;

    #[test]
    fn test_key_bindings() {
        assert_eq!(command_for_key("ArrowLeft"), Some(Command::ShiftLeft));
        assert_eq!(command_for_key("D"), Some(Command::ShiftRight));
        assert_eq!(command_for_key("p"), Some(Command::TogglePause));
        assert_eq!(command_for_key("R"), Some(Command::Restart));
        assert_eq!(command_for_key("x"), None);
    }

    #[test]
    fn test_hold_repeat_timing() {
        let mut hold = HoldRepeat::new(Command::ShiftRight, 0.18);
        assert_eq!(hold.poll(1.0), None);
        assert_eq!(hold.press(), Command::ShiftRight);
        assert_eq!(hold.poll(0.1), None);
        assert_eq!(hold.poll(0.05), None);
        assert_eq!(hold.poll(0.05), Some(Command::ShiftRight));
        // Timer restarts from zero after each repeat
        assert_eq!(hold.poll(0.1), None);
        hold.release();
        assert_eq!(hold.poll(1.0), None);
        assert!(!hold.is_held());
    }

    #[test]
    fn test_swipe_recognition() {
        let mut swipe = SwipeTracker::from_settings(&Settings::default());
        swipe.begin(GamePhase::Running, 1, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 40.0, 110.0), Some(Command::ShiftLeft));

        swipe.begin(GamePhase::Running, 1, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 150.0, 100.0), Some(Command::ShiftRight));

        // Too short
        swipe.begin(GamePhase::Running, 1, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 140.0, 100.0), None);

        // Too diagonal
        swipe.begin(GamePhase::Running, 1, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 160.0, 160.0), None);

        // Multi-touch and non-running phases are ignored
        swipe.begin(GamePhase::Running, 2, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 200.0, 100.0), None);
        swipe.begin(GamePhase::Paused, 1, 100.0, 100.0);
        assert_eq!(swipe.end(GamePhase::Running, 200.0, 100.0), None);
    }

    #[test]
    fn test_dispatch() {
        let mut engine = engine();
        assert!(!dispatch(&mut engine, Command::ShiftLeft));
        assert!(!dispatch(&mut engine, Command::Pause));
        assert!(dispatch(&mut engine, Command::Start));
        assert!(dispatch(&mut engine, Command::ShiftLeft));
        assert!(dispatch(&mut engine, Command::TogglePause));
        assert_eq!(engine.phase(), GamePhase::Paused);
        assert!(dispatch(&mut engine, Command::BackToMenu));
        assert!(dispatch(&mut engine, Command::OpenHow));
        assert!(dispatch(&mut engine, Command::Close));
        assert_eq!(engine.phase(), GamePhase::Menu);
    }

    fn engine() -> SimulationEngine<MemoryStore> {
        SimulationEngine::new(
            Tuning::default(),
            400.0,
            800.0,
            MemoryStore::new(),
            ScriptedRandom::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cues_play_inside_the_handler() {
        let mut engine = engine();
        let mut log = CueLog::new();

        let events = dispatch_with_cues(&mut engine, &mut log, Command::Start);
        assert!(log.unlocked);
        assert_eq!(log.played, vec![AudioCue::UiClick]);
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Menu,
            to: GamePhase::Running,
        }));
        // Nothing left over for the next frame to replay
        assert!(engine.drain_events().is_empty());

        dispatch_with_cues(&mut engine, &mut log, Command::ShiftRight);
        assert_eq!(log.played, vec![AudioCue::UiClick, AudioCue::LaneChanged]);

        // Rejected commands stay silent
        let events = dispatch_with_cues(&mut engine, &mut log, Command::Close);
        assert!(events.is_empty());
        assert_eq!(log.played.len(), 2);
    }

    #[test]
    fn test_tap_guard_acts_once_per_tap() {
        let mut guard = TapGuard::new();
        assert!(guard.pointer_up());
        assert!(!guard.click());

        // Click without a pointer-up (dropped pointer events, keyboard)
        assert!(guard.click());
        assert!(guard.click());

        // Next tap behaves the same
        assert!(guard.pointer_up());
        assert!(!guard.click());
    }

    #[test]
    fn test_restart_tap_resets_once() {
        let mut engine = engine();
        let mut log = CueLog::new();
        let mut guard = TapGuard::new();
        dispatch(&mut engine, Command::Start);
        engine.drain_events();

        let mut restarts = 0;
        if guard.pointer_up() {
            restarts += dispatch_with_cues(&mut engine, &mut log, Command::Restart).len();
        }
        if guard.click() {
            restarts += dispatch_with_cues(&mut engine, &mut log, Command::Restart).len();
        }
        // One UiClick plus one PhaseChanged
        assert_eq!(restarts, 2);
        assert_eq!(log.played, vec![AudioCue::UiClick]);
    }

    #[test]
    fn test_swipe_cancel_forgets_origin() {
        let mut swipe = SwipeTracker::from_settings(&Settings::default());
        swipe.begin(GamePhase::Running, 1, 100.0, 100.0);
        swipe.cancel();
        assert_eq!(swipe.end(GamePhase::Running, 200.0, 100.0), None);
    }
}
