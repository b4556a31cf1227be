//! Lane Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent,
    };

    use lane_rush::audio::{AudioSink, WebAudio, play_events, set_sfx_enabled};
    use lane_rush::persistence::LocalStorageStore;
    use lane_rush::platform::{
        Command, HoldRepeat, SwipeTracker, TapGuard, command_for_key, dispatch, dispatch_with_cues,
    };
    use lane_rush::renderer::{CanvasRenderer, Renderer};
    use lane_rush::sim::{GameEvent, GamePhase, SeededRandom, SimulationEngine};
    use lane_rush::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        engine: SimulationEngine<LocalStorageStore>,
        renderer: CanvasRenderer,
        audio: WebAudio,
        settings: Settings,
        left: HoldRepeat,
        right: HoldRepeat,
        swipe: SwipeTracker,
    }

    impl Game {
        /// Run one display frame
        fn frame(&mut self, timestamp: f64) {
            let dt = self.engine.tick(timestamp);

            if self.engine.phase() == GamePhase::Running {
                let repeats: Vec<Command> = [self.left.poll(dt), self.right.poll(dt)]
                    .into_iter()
                    .flatten()
                    .collect();
                for cmd in repeats {
                    dispatch(&mut self.engine, cmd);
                }
            }

            // Crashes and held-button repeats; user commands flush in their handler
            let events = self.engine.drain_events();
            play_events(&mut self.audio, &events);
            sync_overlays(&events);

            self.renderer.draw(&self.engine.scene());
        }

        /// Apply a command from an input handler, sounding its cue immediately
        fn command(&mut self, cmd: Command) {
            let events = dispatch_with_cues(&mut self.engine, &mut self.audio, cmd);
            sync_overlays(&events);
        }

        fn set_sfx(&mut self, on: bool) {
            self.settings.sfx_enabled = on;
            set_sfx_enabled(&mut self.audio, on);
            self.settings.save();
            sync_sfx_toggle(on);
            log::info!("Sound {}", if on { "on" } else { "off" });
        }

        fn toggle_sfx(&mut self) {
            let on = self.settings.toggle_sfx();
            self.set_sfx(on);
        }
    }

    fn window() -> web_sys::Window {
        web_sys::window().expect("no global window")
    }

    fn document() -> web_sys::Document {
        window().document().expect("no document")
    }

    fn sync_overlays(events: &[GameEvent]) {
        for event in events {
            if let GameEvent::PhaseChanged { to, .. } = event {
                show_overlays(*to);
            }
        }
    }

    /// Toggle the `hidden` class on each overlay for the current phase
    fn show_overlays(phase: GamePhase) {
        let doc = document();
        for (id, visible) in [
            ("menuOverlay", phase == GamePhase::Menu),
            ("howOverlay", phase == GamePhase::HowToPlay),
            ("pauseOverlay", phase == GamePhase::Paused),
            ("gameOverOverlay", phase == GamePhase::GameOver),
            ("controls", phase == GamePhase::Running),
        ] {
            if let Some(el) = doc.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    fn sfx_toggle() -> Option<HtmlInputElement> {
        document()
            .get_element_by_id("sfxToggle")?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn sync_sfx_toggle(on: bool) {
        if let Some(input) = sfx_toggle() {
            input.set_checked(on);
        }
    }

    fn viewport() -> (f32, f32) {
        let w = window();
        let width = w.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(390.0);
        let height = w.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(844.0);
        (width as f32, height as f32)
    }

    fn resize_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let (w, h) = viewport();
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
        (w, h)
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: &Rc<RefCell<Game>>) {
        let doc = document();
        for (id, cmd) in [
            ("startBtn", Command::Start),
            ("howBtn", Command::OpenHow),
            ("closeHowBtn", Command::Close),
            ("pauseBtn", Command::Pause),
            ("resumeBtn", Command::Resume),
            ("restartBtn", Command::Restart),
            ("playAgainBtn", Command::Restart),
            ("backToMenuBtn", Command::BackToMenu),
            ("goMenuBtn", Command::BackToMenu),
        ] {
            let Some(btn) = doc.get_element_by_id(id) else {
                continue;
            };
            // iOS Safari can drop `click`, so pointer-up leads and click is a fallback
            let guard = Rc::new(RefCell::new(TapGuard::new()));
            {
                let game = game.clone();
                let guard = guard.clone();
                listen(&btn, "pointerup", move |e: web_sys::PointerEvent| {
                    e.prevent_default();
                    if guard.borrow_mut().pointer_up() {
                        game.borrow_mut().command(cmd);
                    }
                });
            }
            {
                let game = game.clone();
                listen(&btn, "click", move |_: web_sys::Event| {
                    if guard.borrow_mut().click() {
                        game.borrow_mut().command(cmd);
                    }
                });
            }
        }

        // Hold-to-repeat direction buttons
        for (id, right) in [("leftBtn", false), ("rightBtn", true)] {
            let Some(btn) = doc.get_element_by_id(id) else {
                continue;
            };
            {
                let game = game.clone();
                listen(&btn, "pointerdown", move |e: web_sys::PointerEvent| {
                    e.prevent_default();
                    let mut g = game.borrow_mut();
                    let cmd = if right { g.right.press() } else { g.left.press() };
                    g.command(cmd);
                });
            }
            for event in ["pointerup", "pointercancel", "pointerleave"] {
                let game = game.clone();
                listen(&btn, event, move |_: web_sys::PointerEvent| {
                    let mut g = game.borrow_mut();
                    if right {
                        g.right.release();
                    } else {
                        g.left.release();
                    }
                });
            }
        }

        if let Some(input) = sfx_toggle() {
            input.set_checked(game.borrow().settings.sfx_enabled);
            let game = game.clone();
            let target = input.clone();
            listen(&input, "change", move |_: web_sys::Event| {
                game.borrow_mut().set_sfx(target.checked());
            });
        }
    }

    fn setup_input(game: &Rc<RefCell<Game>>, canvas: &HtmlCanvasElement) {
        let doc = document();

        {
            let game = game.clone();
            listen(&window(), "keydown", move |e: KeyboardEvent| {
                let key = e.key();
                let mut g = game.borrow_mut();
                if key == "m" || key == "M" {
                    g.toggle_sfx();
                } else if let Some(cmd) = command_for_key(&key) {
                    g.command(cmd);
                }
            });
        }

        {
            let game = game.clone();
            listen(canvas, "touchstart", move |e: TouchEvent| {
                let mut g = game.borrow_mut();
                g.audio.unlock();
                let touches = e.touches();
                if let Some(t) = touches.get(0) {
                    let phase = g.engine.phase();
                    g.swipe.begin(
                        phase,
                        touches.length() as usize,
                        t.client_x() as f32,
                        t.client_y() as f32,
                    );
                }
            });
        }

        {
            let game = game.clone();
            listen(canvas, "touchend", move |e: TouchEvent| {
                let Some(t) = e.changed_touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let phase = g.engine.phase();
                if let Some(cmd) = g.swipe.end(phase, t.client_x() as f32, t.client_y() as f32) {
                    g.command(cmd);
                }
            });
        }

        {
            let game = game.clone();
            listen(canvas, "touchcancel", move |_: TouchEvent| {
                game.borrow_mut().swipe.cancel();
            });
        }

        // Auto-pause when the tab is hidden
        {
            let game = game.clone();
            let doc_clone = doc.clone();
            listen(&doc, "visibilitychange", move |_: web_sys::Event| {
                if doc_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.engine.visibility_hidden().is_some() {
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
        }

        {
            let game = game.clone();
            let canvas = canvas.clone();
            listen(&window(), "resize", move |_: web_sys::Event| {
                let (w, h) = resize_canvas(&canvas);
                game.borrow_mut().engine.resize(w, h);
            });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        let canvas: HtmlCanvasElement = document()
            .get_element_by_id("game")
            .ok_or_else(|| JsValue::from_str("missing #game canvas"))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let (w, h) = resize_canvas(&canvas);
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let engine = SimulationEngine::new(
            Tuning::default(),
            w,
            h,
            LocalStorageStore::new(),
            SeededRandom::new(seed),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            engine,
            renderer: CanvasRenderer::new(ctx),
            audio: WebAudio::new(settings.master_volume, settings.sfx_enabled),
            left: HoldRepeat::from_settings(Command::ShiftLeft, &settings),
            right: HoldRepeat::from_settings(Command::ShiftRight, &settings),
            swipe: SwipeTracker::from_settings(&settings),
            settings,
        }));

        setup_buttons(&game);
        setup_input(&game, &canvas);
        show_overlays(GamePhase::Menu);

        // requestAnimationFrame loop
        let frame_cb: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let frame_cb_inner = frame_cb.clone();
        *frame_cb.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
            game.borrow_mut().frame(timestamp);
            if let Some(cb) = frame_cb_inner.borrow().as_ref() {
                let _ = window().request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));
        if let Some(cb) = frame_cb.borrow().as_ref() {
            window().request_animation_frame(cb.as_ref().unchecked_ref())?;
        }

        log::info!("Lane Rush started (seed {})", seed);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lane Rush (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    demo::run(seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use lane_rush::audio::{CueLog, play_events};
    use lane_rush::persistence::{JsonFileStore, MemoryStore, PersistentStore};
    use lane_rush::platform::{Autopilot, dispatch};
    use lane_rush::renderer::{Renderer, TextRenderer};
    use lane_rush::sim::{GamePhase, SeededRandom, SimulationEngine};
    use lane_rush::{Settings, Tuning};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 600;

    /// `LANE_RUSH_TUNING` names an optional JSON balance file
    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("LANE_RUSH_TUNING") else {
            return Tuning::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}: {})", path, e);
                Tuning::default()
            }
        }
    }

    /// `LANE_RUSH_STORE` names an optional JSON file for the best score
    fn open_store() -> Box<dyn PersistentStore> {
        match std::env::var("LANE_RUSH_STORE") {
            Ok(path) => Box::new(JsonFileStore::open_or_empty(path)),
            Err(_) => Box::new(MemoryStore::new()),
        }
    }

    pub fn run(seed: u64) {
        let settings = Settings::load();
        let mut engine = match SimulationEngine::new(
            load_tuning(),
            390.0,
            844.0,
            open_store(),
            SeededRandom::new(seed),
        ) {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                return;
            }
        };
        let mut pilot = Autopilot::new();
        let mut cues = CueLog::new();
        cues.enabled = settings.sfx_enabled;

        engine.start();
        let mut ts = 0.0;
        let mut dt = 0.0;
        for _ in 0..MAX_FRAMES {
            if let Some(cmd) =
                pilot.decide(dt, engine.geometry(), engine.player(), engine.obstacles())
            {
                dispatch(&mut engine, cmd);
            }
            dt = engine.tick(ts);
            play_events(&mut cues, &engine.drain_events());
            if engine.phase() == GamePhase::GameOver {
                break;
            }
            ts += FRAME_MS;
        }

        let mut renderer = TextRenderer::new(24);
        renderer.draw(&engine.scene());
        println!("{}", renderer.frame());

        let session = engine.session();
        log::info!(
            "Demo finished after {:.1}s: score {}, best {}, {} cues",
            session.elapsed,
            session.display_score(),
            engine.best_score(),
            cues.played.len()
        );
    }
}
