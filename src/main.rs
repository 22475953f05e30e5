//! Campus Run entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use campus_run::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use campus_run::assets::{ASSET_ROOT, AssetBundle};
    use campus_run::consts::*;
    use campus_run::renderer::{RenderState, TextAnchor, TextItem, compose};
    use campus_run::sim::{GameState, TickInput, tick};
    use campus_run::{Assets, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        assets: Assets,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Text currently in the DOM layer
        shown_texts: Vec<TextItem>,
    }

    impl Game {
        fn new(settings: Settings, assets: Assets) -> Self {
            Self {
                state: GameState::new().with_victory_animation(settings.victory_animation),
                settings,
                assets,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_texts: Vec::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.now_ms = time;
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in &self.state.events {
                    super::log_event(event);
                }

                // Clear one-shot inputs after processing
                self.input.jump = false;
                self.input.fight = false;
                self.input.flee = false;
                self.input.start = false;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame and sync the text layer
        fn render(&mut self, time: f64) {
            let frame = compose(
                &self.state,
                Some(&self.assets),
                &self.settings,
                time,
                self.fps,
            );

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame) {
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

            if frame.texts != self.shown_texts {
                update_text_layer(&frame.texts);
                self.shown_texts = frame.texts;
            }
        }

        fn release_keys(&mut self) {
            self.input.left = false;
            self.input.right = false;
            self.input.down = false;
        }
    }

    /// Rebuild the HUD text overlay
    fn update_text_layer(texts: &[TextItem]) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(layer) = document.get_element_by_id("text-layer") else {
            return;
        };
        layer.set_inner_html("");

        for item in texts {
            let Ok(el) = document.create_element("div") else {
                continue;
            };
            let translate = match item.anchor {
                TextAnchor::TopLeft => "0, 0",
                TextAnchor::TopCenter => "-50%, 0",
                TextAnchor::TopRight => "-100%, 0",
                TextAnchor::Center => "-50%, -50%",
            };
            let style = format!(
                "left: {:.3}%; top: {:.3}%; transform: translate({});",
                item.pos.x / VIEW_WIDTH * 100.0,
                item.pos.y / VIEW_HEIGHT * 100.0,
                translate
            );
            let _ = el.set_attribute("class", "hud-text");
            let _ = el.set_attribute("style", &style);
            el.set_text_content(Some(&item.text));
            let _ = layer.append_child(&el);
        }
    }

    fn show_fatal(message: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"))
        {
            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "error");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Campus Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Sprites first: without player sheets there is nothing to play
        let bundle = AssetBundle::fetch(ASSET_ROOT).await;
        let assets = match Assets::load(&bundle) {
            Ok(assets) => assets,
            Err(e) => {
                log::error!("Cannot start: {}", e);
                show_fatal(&format!("Cannot start: {}", e));
                return;
            }
        };

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
        let game = Rc::new(RefCell::new(Game::new(settings, assets)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                show_fatal("WebGPU/WebGL is not available in this browser");
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                show_fatal("No graphics adapter available");
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = {
            let g = game.borrow();
            RenderState::new(surface, &adapter, width, height, &g.assets).await
        };
        match render_state {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                show_fatal("Failed to initialize graphics device");
                return;
            }
        }

        setup_input_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Campus Run running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down: held movement keys plus one-shot edges
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let fresh = !event.repeat();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = true,
                    "ArrowRight" => g.input.right = true,
                    "ArrowDown" => g.input.down = true,
                    " " if fresh => {
                        g.input.jump = true;
                        g.input.start = true;
                    }
                    "f" | "F" if fresh => g.input.fight = true,
                    "r" | "R" if fresh => g.input.flee = true,
                    "i" | "I" if fresh => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "F2" if fresh => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => g.input.left = false,
                    "ArrowRight" => g.input.right = false,
                    "ArrowDown" => g.input.down = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup events are lost while unfocused
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().release_keys();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
        }

        request_animation_frame(game);
    }
}

/// Log what happened during a tick
fn log_event(event: &GameEvent) {
    match event {
        GameEvent::Jumped | GameEvent::SpringBounce => log::debug!("{:?}", event),
        GameEvent::SpikeHit => log::info!("Spike! Back to the start"),
        GameEvent::BattleStarted => log::info!("Battle started"),
        GameEvent::EnemyDefeated => log::info!("Enemy defeated"),
        GameEvent::Fled => log::info!("Fled from battle"),
        GameEvent::LevelStarted { level } => log::info!("Level {} started", level),
        GameEvent::RunComplete => log::info!("All levels cleared!"),
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Simulated ticks before the headless run gives up (ten minutes)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_TICK_LIMIT: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use campus_run::assets::{ASSET_ROOT, AssetBundle};
    use campus_run::consts::TICK_RATE;
    use campus_run::sim::{GamePhase, GameState, TickInput, tick};
    use campus_run::{Assets, Settings};

    env_logger::init();
    log::info!("Campus Run (native) starting...");
    log::info!("Native mode runs headless under the autopilot - run with `trunk serve` for the web version");

    let bundle = AssetBundle::read_dir(std::path::Path::new(ASSET_ROOT));
    match Assets::load(&bundle) {
        Ok(assets) => log::info!("Sprites ready: {} textures", assets.textures().len()),
        // The headless run draws nothing, so missing sheets only matter on the web
        Err(e) => log::warn!("{}; continuing headless without sprites", e),
    }

    let settings = Settings::load();
    let mut state = GameState::new().with_victory_animation(settings.victory_animation);
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut ticks = 0u64;
    while state.phase != GamePhase::Complete && ticks < HEADLESS_TICK_LIMIT {
        input.now_ms = ticks as f64 * 1000.0 / TICK_RATE as f64;
        tick(&mut state, &input);
        for event in &state.events {
            log_event(event);
        }
        ticks += 1;
    }

    let seconds = ticks as f64 / TICK_RATE as f64;
    if state.phase == GamePhase::Complete {
        log::info!("Run complete after {} ticks ({:.1}s simulated)", ticks, seconds);
    } else {
        log::warn!(
            "Autopilot stopped after {} ticks ({:.1}s simulated) on level {}",
            ticks,
            seconds,
            state.level_number()
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
