//! Alley Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use alley_runner::{QualityPreset, Settings};
    use alley_runner::audio::AudioManager;
    use alley_runner::consts::*;
    use alley_runner::render::Renderer;
    use alley_runner::sim::{RunState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: RunState,
        renderer: Renderer,
        audio: AudioManager,
        settings: Settings,
        /// Unsimulated time in milliseconds
        accumulator: f32,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, renderer: Renderer, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: RunState::new(seed),
                renderer,
                audio,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks (dt in milliseconds)
        fn update(&mut self, dt_ms: f32) {
            let dt_ms = dt_ms.min(100.0);
            self.accumulator += dt_ms;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.primary_action = false;
            }
            if substeps == MAX_SUBSTEPS {
                // Fell too far behind; drop the backlog rather than spiral
                self.accumulator = self.accumulator.min(SIM_DT_MS);
            }

            for event in self.state.drain_events() {
                self.audio.handle(&event);
                self.renderer.handle(&event, &self.state, &self.settings);
            }
            self.renderer.update(dt_ms / 1000.0);
        }

        /// Render the current frame
        fn render(&self) {
            if let Err(e) = self.renderer.draw(&self.state, &self.settings) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Step to the next quality preset and remember it
        fn cycle_quality(&mut self) {
            let preset = self.settings.quality.next();
            self.settings.apply_preset(preset);
            self.settings.save();
            log::info!("Quality: {}", preset.as_str());
        }

        fn set_muted(&mut self, muted: bool) {
            if self.settings.mute_on_blur {
                self.audio.set_muted(muted);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Alley Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let renderer = Renderer::new(canvas.clone())?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        renderer.resize(width.max(1), height.max(1));

        let mut settings = Settings::load();
        if let Some(preset) = quality_from_query(&window) {
            log::info!("Quality from URL: {}", preset.as_str());
            settings.apply_preset(preset);
        }
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, renderer, settings)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone())?;
        setup_auto_mute(game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Alley Runner running!");
        Ok(())
    }

    /// `?quality=low|medium|high` overrides the stored preset for this visit
    fn quality_from_query(window: &web_sys::Window) -> Option<QualityPreset> {
        let search = window.location().search().ok()?;
        search
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "quality")
            .and_then(|(_, value)| QualityPreset::parse(value))
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Pointer press (mouse and touch) - start, jump, restart
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.primary_action = true;
            });
            canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "ArrowUp" => {
                        event.prevent_default();
                        g.audio.resume();
                        g.input.primary_action = true;
                    }
                    "q" | "Q" => g.cycle_quality(),
                    "a" | "A" => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
        }

        request_animation_frame(game);
    }

    /// Silence the game while the tab is hidden or the window unfocused
    fn setup_auto_mute(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                game.borrow_mut().set_muted(hidden);
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().set_muted(true);
                log::info!("Muted (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().set_muted(false);
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Alley Runner (native) starting...");
    log::info!("Native mode plays a headless demo run - use the web build to play");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => alley_runner::Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    headless::demo_run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> alley_runner::Tuning {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| alley_runner::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            alley_runner::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use alley_runner::Tuning;
    use alley_runner::consts::SIM_DT_MS;
    use alley_runner::sim::{GameEvent, RunPhase, RunState, TickInput, tick};

    /// Simulated seconds of autopilot play
    const DEMO_SECONDS: u32 = 120;

    /// Let the autopilot play one run and report what happened
    pub fn demo_run(seed: u64, tuning: Tuning) {
        let mut state = RunState::with_tuning(seed, tuning);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        let steps = (DEMO_SECONDS as f32 * 1000.0 / SIM_DT_MS) as u32;
        let mut spawned = 0;
        let mut jumps = 0;
        let mut pauses = 0;
        for _ in 0..steps {
            tick(&mut state, &input, SIM_DT_MS);
            for event in state.drain_events() {
                match event {
                    GameEvent::Spawned { .. } => spawned += 1,
                    GameEvent::Jumped => jumps += 1,
                    GameEvent::ScriptedPauseStarted { milestone } => {
                        pauses += 1;
                        log::info!("Milestone {} reached", milestone);
                    }
                    _ => {}
                }
            }
            if state.phase == RunPhase::GameOver {
                break;
            }
        }

        log::info!(
            "Demo over: phase {:?}, {} fish, {:.1}s survived, speed {:.0} px/s",
            state.phase,
            state.score,
            state.elapsed_run_time_ms() / 1000.0,
            state.scroll_speed()
        );
        log::info!(
            "{} obstacles spawned, {} jumps, {} scripted pauses",
            spawned,
            jumps,
            pauses
        );
    }
}
