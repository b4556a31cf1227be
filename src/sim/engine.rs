//! Per-frame simulation driver
//!
//! The host calls `tick(timestamp_ms)` once per display refresh. The engine
//! turns timestamps into a bounded delta, advances the run while it is
//! `Running`, and queues `GameEvent`s for the host to drain.

use super::collision::first_collision;
use super::geometry::WorldGeometry;
use super::phase::{GamePhase, RunStateMachine, Transition, Trigger};
use super::player::PlayerController;
use super::spawner::{ObstacleSpawner, RandomSource};
use super::state::{GameEvent, Obstacle, Player, RunSession};
use crate::consts::{MAX_FRAME_DT, ROAD_DASH_PERIOD};
use crate::highscores::{FinalScore, ScoreKeeper};
use crate::persistence::PersistentStore;
use crate::renderer::SceneView;
use crate::tuning::{Tuning, TuningError};

/// Converts host timestamps into clamped frame deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Seconds since the previous timestamp, clamped to `[0, max_dt]`.
    /// The first timestamp after a reset yields 0.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(timestamp_ms);
        crate::clamp(dt, 0.0, self.max_dt)
    }

    /// Forget the reference timestamp
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Owns all simulation state and exposes the command surface
pub struct SimulationEngine<S: PersistentStore> {
    tuning: Tuning,
    geometry: WorldGeometry,
    controller: PlayerController,
    spawner: ObstacleSpawner,
    obstacles: Vec<Obstacle>,
    session: RunSession,
    machine: RunStateMachine,
    scores: ScoreKeeper<S>,
    rng: Box<dyn RandomSource>,
    clock: FrameClock,
    events: Vec<GameEvent>,
    final_score: Option<FinalScore>,
    road_scroll: f32,
}

impl<S: PersistentStore> SimulationEngine<S> {
    pub fn new(
        tuning: Tuning,
        viewport_w: f32,
        viewport_h: f32,
        store: S,
        rng: impl RandomSource + 'static,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;
        let geometry = WorldGeometry::new(&tuning, viewport_w, viewport_h);
        let controller = PlayerController::new(&tuning, &geometry);
        log::info!(
            "Engine ready: {} lanes, viewport {}x{}",
            geometry.lane_count,
            geometry.viewport_w,
            geometry.viewport_h
        );
        Ok(Self {
            spawner: ObstacleSpawner::new(&tuning),
            session: RunSession::new(&tuning),
            clock: FrameClock::new(MAX_FRAME_DT),
            scores: ScoreKeeper::new(store),
            machine: RunStateMachine::new(),
            obstacles: Vec::new(),
            rng: Box::new(rng),
            events: Vec::new(),
            final_score: None,
            road_scroll: 0.0,
            tuning,
            geometry,
            controller,
        })
    }

    // === Accessors ===

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn geometry(&self) -> &WorldGeometry {
        &self.geometry
    }

    pub fn player(&self) -> &Player {
        self.controller.player()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn session(&self) -> &RunSession {
        &self.session
    }

    pub fn best_score(&self) -> u64 {
        self.scores.best()
    }

    /// Outcome of the most recent crash, cleared when a new run starts
    pub fn final_score(&self) -> Option<FinalScore> {
        self.final_score
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Borrowed snapshot for the renderer
    pub fn scene(&self) -> SceneView<'_> {
        SceneView {
            geometry: &self.geometry,
            player: self.controller.player(),
            obstacles: &self.obstacles,
            phase: self.machine.phase(),
            score: self.session.display_score(),
            best: self.scores.best(),
            final_score: self.final_score,
            road_scroll: self.road_scroll,
        }
    }

    // === Frame driver ===

    /// Advance by the time since the previous call. Returns the simulated dt.
    pub fn tick(&mut self, timestamp_ms: f64) -> f32 {
        let dt = self.clock.delta(timestamp_ms);
        if !self.machine.is_running() {
            return 0.0;
        }
        self.step(dt);
        dt
    }

    /// One simulation step of `dt` seconds (already clamped by `tick`)
    pub fn step(&mut self, dt: f32) {
        if !self.machine.is_running() || !self.session.alive {
            return;
        }
        let dt = crate::clamp(dt, 0.0, MAX_FRAME_DT);

        self.spawner.ramp(&mut self.session, dt);
        self.controller.advance(dt, &self.geometry);

        ObstacleSpawner::advance(&mut self.obstacles, self.session.speed, dt);
        self.spawner.cull(&self.geometry, &mut self.obstacles);
        self.spawner.tick(
            &mut self.session,
            dt,
            &self.geometry,
            &mut self.obstacles,
            self.rng.as_mut(),
        );

        self.road_scroll = (self.road_scroll + self.session.speed * dt) % ROAD_DASH_PERIOD;

        if let Some(hit) = first_collision(self.controller.player(), &self.obstacles) {
            log::debug!(
                "Collision with {:?} in lane {}",
                self.obstacles[hit].kind,
                self.obstacles[hit].lane
            );
            self.crash();
        }
    }

    /// Rebuild the layout for a new viewport and re-seat everything on it
    pub fn resize(&mut self, viewport_w: f32, viewport_h: f32) {
        self.geometry.recompute(&self.tuning, viewport_w, viewport_h);
        self.controller.fit_to(&self.tuning, &self.geometry);
        self.controller.snap_to_target(&self.geometry);
        for o in &mut self.obstacles {
            o.pos.x = self.geometry.lane_center(o.lane);
        }
        log::debug!(
            "Resized to {}x{}",
            self.geometry.viewport_w,
            self.geometry.viewport_h
        );
    }

    // === Commands ===

    /// Move the target lane by one step left (-1) or right (+1).
    /// Ignored unless running; returns whether the lane changed.
    pub fn shift_lane(&mut self, delta: i32) -> bool {
        if !self.machine.is_running() {
            return false;
        }
        let changed = self.controller.shift_lane(delta.signum(), &self.geometry);
        if changed {
            self.events.push(GameEvent::LaneChanged {
                lane: self.controller.player().target_lane,
            });
        }
        changed
    }

    pub fn start(&mut self) -> Option<Transition> {
        self.fire(Trigger::Start)
    }

    pub fn open_how(&mut self) -> Option<Transition> {
        self.fire(Trigger::OpenHow)
    }

    pub fn close(&mut self) -> Option<Transition> {
        self.fire(Trigger::Close)
    }

    pub fn pause(&mut self) -> Option<Transition> {
        self.fire(Trigger::Pause)
    }

    pub fn resume(&mut self) -> Option<Transition> {
        self.fire(Trigger::Resume)
    }

    pub fn toggle_pause(&mut self) -> Option<Transition> {
        self.fire(Trigger::TogglePause)
    }

    pub fn restart(&mut self) -> Option<Transition> {
        self.fire(Trigger::Restart)
    }

    pub fn back_to_menu(&mut self) -> Option<Transition> {
        self.fire(Trigger::BackToMenu)
    }

    /// The page or window stopped being visible
    pub fn visibility_hidden(&mut self) -> Option<Transition> {
        self.fire(Trigger::Hidden)
    }

    fn fire(&mut self, trigger: Trigger) -> Option<Transition> {
        let transition = self.machine.apply(trigger)?;
        if transition.resets_session() {
            self.reset_run();
        }
        if transition.resumes() {
            self.clock.reset();
        }
        if transition.is_ui() {
            self.events.push(GameEvent::UiClick);
        }
        self.events.push(GameEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
        });
        Some(transition)
    }

    fn reset_run(&mut self) {
        self.obstacles.clear();
        self.session = RunSession::new(&self.tuning);
        self.controller.reset(&self.geometry);
        self.final_score = None;
        self.road_scroll = 0.0;
        log::info!("Run started (best {})", self.scores.best());
    }

    fn crash(&mut self) {
        self.session.alive = false;
        let fin = self.scores.on_crash(self.session.score);
        self.final_score = Some(fin);
        self.events.push(GameEvent::Crashed {
            score: fin.score,
            new_best: fin.new_best,
        });
        log::info!(
            "Crashed after {:.1}s at speed {:.0}: score {}",
            self.session.elapsed,
            self.session.speed,
            fin.score
        );
        self.fire(Trigger::Crash);
    }
}
