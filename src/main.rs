//! Lunar Lander entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use lunar_lander::audio::WebAudioBackend;
    use lunar_lander::consts::*;
    use lunar_lander::platform::{FpsCounter, HeldKeys, TextItem, apply_action, key_action};
    use lunar_lander::renderer::{LineBatch, RenderState};
    use lunar_lander::sim::{GameEvent, GameState, TickInput, TickOutcome, tick};
    use lunar_lander::{Settings, SoundManager, ui};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        batch: LineBatch,
        sounds: SoundManager<WebAudioBackend>,
        settings: Settings,
        canvas: HtmlCanvasElement,
        accumulator: f64,
        last_time: f64,
        /// Held keys and pending one-shot actions
        held: HeldKeys,
        input: TickInput,
        fps: FpsCounter,
        /// Last overlay markup, to skip redundant DOM writes
        last_overlay: String,
        running: bool,
    }

    impl Game {
        fn new(
            seed: u64,
            settings: Settings,
            sounds: SoundManager<WebAudioBackend>,
            canvas: HtmlCanvasElement,
        ) -> Self {
            let mut state = GameState::new(seed);
            state.showing_fps = settings.show_fps;
            Self {
                state,
                render_state: None,
                batch: LineBatch::new(STAGE_WIDTH, STAGE_HEIGHT),
                sounds,
                settings,
                canvas,
                accumulator: 0.0,
                last_time: 0.0,
                held: HeldKeys::new(),
                input: TickInput::default(),
                fps: FpsCounter::new(),
                last_overlay: String::new(),
                running: true,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f64) {
            let dt = dt.min(0.25);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                self.held.apply_to(&mut self.input);
                let outcome = tick(&mut self.state, &self.input);
                self.accumulator -= FRAME_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_actions();
                self.dispatch_events();

                if outcome == TickOutcome::Quit {
                    self.sounds.shutdown();
                    self.settings.show_fps = self.state.showing_fps;
                    self.settings.save();
                    self.running = false;
                    log::info!("Game stopped");
                    break;
                }
            }
        }

        /// Hand queued simulation side effects to audio and the browser
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::ToggleFullscreen => self.apply_fullscreen(),
                    GameEvent::PhaseChanged { .. } => {}
                    _ => self.sounds.handle_event(&event),
                }
            }
        }

        fn apply_fullscreen(&self) {
            let result = if self.state.fullscreen {
                self.canvas.request_fullscreen()
            } else {
                match web_sys::window().and_then(|w| w.document()) {
                    Some(document) => {
                        document.exit_fullscreen();
                        Ok(())
                    }
                    None => Ok(()),
                }
            };
            if let Err(e) = result {
                log::warn!("Fullscreen request failed: {:?}", e);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            ui::draw_frame(&mut self.state, &mut self.batch, self.fps.fps());

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.batch.presented()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            self.update_overlay();
        }

        /// Mirror the frame's text items into the DOM overlay
        fn update_overlay(&mut self) {
            let client_w = self.canvas.client_width() as f64;
            let client_h = self.canvas.client_height() as f64;
            let markup = overlay_markup(&self.batch.presented().text, client_w, client_h);
            if markup == self.last_overlay {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(hud) = document.get_element_by_id("hud") {
                hud.set_inner_html(&markup);
            }
            self.last_overlay = markup;
        }

        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
        }
    }

    /// Absolutely positioned text in CSS pixels, letterboxed like the stage
    fn overlay_markup(items: &[TextItem], client_w: f64, client_h: f64) -> String {
        let (sw, sh) = (STAGE_WIDTH as f64, STAGE_HEIGHT as f64);
        let scale = (client_w / sw).min(client_h / sh);
        let offset_x = (client_w - sw * scale) / 2.0;
        let offset_y = (client_h - sh * scale) / 2.0;

        items
            .iter()
            .map(|item| {
                format!(
                    "<div style=\"position:absolute;left:{:.1}px;top:{:.1}px;\
                     transform:translate(-50%,-50%);font-size:{:.1}px;color:{};\
                     white-space:nowrap\">{}</div>",
                    offset_x + item.center.x * scale,
                    offset_y + item.center.y * scale,
                    item.font_size as f64 * scale,
                    item.color.to_css(),
                    item.text
                )
            })
            .collect()
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lunar Lander starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        document.set_title(STAGE_TITLE);

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();

        // Sounds are required; nothing starts without them
        let mut sounds = match SoundManager::with_default_sounds(WebAudioBackend::new()) {
            Ok(sounds) => sounds,
            Err(e) => {
                log::error!("Unable to initialise sound: {}", e);
                return;
            }
        };
        sounds.apply_settings(&settings);

        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            settings,
            sounds,
            canvas.clone(),
        )));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, (STAGE_WIDTH, STAGE_HEIGHT)).await
        {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        }

        setup_input_handlers(game.clone());
        setup_focus_handlers(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Lunar Lander running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: discrete actions plus held controls
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if event.repeat() {
                    return;
                }
                if let Some(action) = key_action(&key) {
                    apply_action(&mut g.input, action);
                }
                g.held.press(&key);
                if key.starts_with("Arrow") {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().held.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur: keyup events are lost while unfocused
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            g.held.clear();
            if g.settings.mute_on_blur {
                g.sounds.stop_all();
            }
            log::debug!("Window lost focus");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let frame_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                FRAME_DT * 1000.0
            };
            g.last_time = time;
            g.fps.record(frame_ms);

            g.update(frame_ms / 1000.0);
            if !g.running {
                return;
            }
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lunar_lander::audio::SilentBackend;
    use lunar_lander::consts::*;
    use lunar_lander::platform::time::FrameClock;
    use lunar_lander::platform::{FpsCounter, HeldKeys, apply_action, key_action};
    use lunar_lander::renderer::LineBatch;
    use lunar_lander::sim::{GameEvent, GameState, TickInput, TickOutcome, tick};
    use lunar_lander::{Settings, SoundError, SoundManager, ui};

    /// Key presses replayed by the demo: (frame, key, pressed)
    const SCRIPT: &[(u64, &str, bool)] = &[
        (10, "j", true),
        (10, "j", false),
        (30, "Enter", true),
        (30, "Enter", false),
        (60, "ArrowUp", true),
        (90, "z", true),
        (110, "z", false),
        (140, "ArrowRight", true),
        (150, "ArrowRight", false),
        (170, "ArrowUp", false),
        (200, "p", true),
        (200, "p", false),
        (230, "p", true),
        (230, "p", false),
        (260, "k", true),
        (260, "k", false),
        (460, "ArrowUp", true),
        (490, "ArrowUp", false),
        (520, "q", true),
        (520, "q", false),
        (560, "Escape", true),
    ];

    /// Upper bound in case the script never quits
    const MAX_FRAMES: u64 = 1200;

    /// Play a scripted session without a window
    pub fn run(settings: Settings) -> Result<(), SoundError> {
        let mut sounds = SoundManager::with_default_sounds(SilentBackend)?;
        sounds.apply_settings(&settings);

        let seed = settings.seed_or(0x4c4e_4452);
        let mut state = GameState::new(seed);
        state.showing_fps = settings.show_fps;
        log::info!("Game initialized with seed: {}", seed);

        let mut batch = LineBatch::new(STAGE_WIDTH, STAGE_HEIGHT);
        let mut held = HeldKeys::new();
        let mut input = TickInput::default();
        let mut fps = FpsCounter::new();
        let mut clock = FrameClock::new(TARGET_FPS);

        for frame in 0..MAX_FRAMES {
            for &(_, key, pressed) in SCRIPT.iter().filter(|(f, _, _)| *f == frame) {
                if pressed {
                    if let Some(action) = key_action(key) {
                        apply_action(&mut input, action);
                    }
                    held.press(key);
                } else {
                    held.release(key);
                }
            }

            fps.record(clock.tick());
            held.apply_to(&mut input);
            let outcome = tick(&mut state, &input);
            input.clear_actions();

            for event in state.drain_events() {
                match event {
                    GameEvent::ToggleFullscreen => {
                        log::info!("Fullscreen: {} (no window)", state.fullscreen)
                    }
                    GameEvent::PhaseChanged { .. } => {}
                    _ => sounds.handle_event(&event),
                }
            }

            if outcome == TickOutcome::Quit {
                log::info!("Quit after {} frames", frame + 1);
                break;
            }

            ui::draw_frame(&mut state, &mut batch, fps.fps());

            if frame % TARGET_FPS as u64 == 0 {
                let pose = state.ship.as_ref().map(|ship| ship.pose);
                log::info!(
                    "frame {} phase={} fps={} segments={} ship={:?}",
                    frame,
                    state.phase.as_str(),
                    fps.fps(),
                    batch.presented().vertices.len() / 2,
                    pose.map(|p| (p.position, p.angle))
                );
            }
        }

        sounds.shutdown();
        Settings {
            show_fps: state.showing_fps,
            ..settings
        }
        .save();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Lunar Lander (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let settings = lunar_lander::Settings::load();
    if let Err(e) = headless::run(settings) {
        log::error!("Unable to initialise sound: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
