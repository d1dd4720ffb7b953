//! Blaze Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use blaze_arena::consts::*;
    use blaze_arena::renderer::{Overlay, RenderState, build_frame};
    use blaze_arena::sim::{GameEvent, SimConfig, TickInput, World, tick};
    use blaze_arena::{Error, QualityPreset, Settings};

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Game instance holding all state
    struct Game {
        world: World,
        config: SimConfig,
        settings: Settings,
        render_state: Option<RenderState>,
        last_time: f64,
        input: TickInput,
        overlays: Vec<Overlay>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(config: SimConfig, settings: Settings) -> Self {
            Self {
                world: World::new(&config),
                config,
                settings,
                render_state: None,
                last_time: 0.0,
                input: TickInput::default(),
                overlays: Vec::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one simulation step
        fn update(&mut self, dt_ms: f32, time: f64) {
            tick(&mut self.world, &self.input, dt_ms.min(MAX_FRAME_MS));

            for event in self.world.drain_events() {
                match event {
                    GameEvent::GameOver { score } => log::info!("Game over with {} points", score),
                    GameEvent::BossIncoming => log::info!("Boss incoming"),
                    other => log::debug!("{:?}", other),
                }
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

        /// Render the current frame
        fn render(&mut self) {
            let frame = build_frame(&self.world, &self.settings);
            self.overlays = frame.overlays;

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&frame.vertices) {
                    Ok(_) => {}
                    Err(e) if e.needs_reconfigure() => render_state.reconfigure(),
                    Err(Error::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let mut score = None;
            let mut banner = false;
            let mut final_score = None;
            for overlay in &self.overlays {
                match *overlay {
                    Overlay::Score(s) => score = Some(s),
                    Overlay::BossIncoming => banner = true,
                    Overlay::GameOver { score } => final_score = Some(score),
                }
            }

            if let Some(el) = document.get_element_by_id("hud") {
                let class = if score.is_some() { "" } else { "hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let (Some(score), Ok(Some(el))) =
                (score, document.query_selector("#hud-score .hud-value"))
            {
                el.set_text_content(Some(&score.to_string()));
            }

            // Update FPS
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Ok(Some(val)) = document.query_selector("#hud-fps .hud-value") {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("boss-banner") {
                let _ = el.set_attribute("class", if banner { "" } else { "hidden" });
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                match final_score {
                    Some(s) => {
                        let _ = el.set_attribute("class", "");
                        if let Some(score_el) = document.get_element_by_id("final-score") {
                            score_el.set_text_content(Some(&s.to_string()));
                        }
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        /// Fresh run with a new seed, keeping the current viewport
        fn restart(&mut self, seed: u64) {
            let viewport = self.world.viewport;
            self.config.seed = seed;
            self.world = World::new(&self.config);
            self.world.resize(viewport.x, viewport.y);
            self.input = TickInput::default();
            log::info!("Game restarted with seed: {}", seed);
        }

        fn key(&mut self, key: &str, down: bool) -> bool {
            let movement = &mut self.input.movement;
            match key {
                "w" | "W" | "ArrowUp" => movement.up = down,
                "s" | "S" | "ArrowDown" => movement.down = down,
                "a" | "A" | "ArrowLeft" => movement.left = down,
                "d" | "D" | "ArrowRight" => movement.right = down,
                " " => self.input.shoot = down,
                _ => return false,
            }
            true
        }

        fn cycle_quality(&mut self) {
            self.settings.quality = match self.settings.quality {
                QualityPreset::Low => QualityPreset::Medium,
                QualityPreset::Medium => QualityPreset::High,
                QualityPreset::High => QualityPreset::Low,
            };
            log::info!("Quality: {}", self.settings.quality.as_str());
            self.settings.save();
        }
    }

    /// Size the canvas backing store for the current layout and DPR
    fn fit_canvas(canvas: &HtmlCanvasElement, dpr: f64) -> (u32, u32, Vec2) {
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, Vec2::new(client_w as f32, client_h as f32))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Blaze Arena starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        let (width, height, viewport) = fit_canvas(&canvas, window.device_pixel_ratio());

        // Initialize game
        let config = SimConfig {
            seed: js_sys::Date::now() as u64,
            viewport_width: viewport.x,
            viewport_height: viewport.y,
            ..Default::default()
        };
        log::info!("Game initialized with seed: {}", config.seed);
        let game = Rc::new(RefCell::new(Game::new(config, Settings::load())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| js_err(Error::from(e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| js_err(Error::from(e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(&canvas, game.clone());
        setup_restart_button(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Blaze Arena running!");
        Ok(())
    }

    fn add_listener<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let callback = closure.as_ref().unchecked_ref();
        if let Err(e) = target.add_event_listener_with_callback(name, callback) {
            log::warn!("Failed to add {} listener: {:?}", name, e);
        }
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer position in viewport pixels
        {
            let game = game.clone();
            add_listener(canvas, "mousemove", move |event: MouseEvent| {
                game.borrow_mut().input.pointer =
                    Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
            });
        }

        // Flamethrower while the primary button is held
        {
            let game = game.clone();
            add_listener(canvas, "mousedown", move |event: MouseEvent| {
                if event.button() == 0 {
                    let mut g = game.borrow_mut();
                    g.input.pointer = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                    g.input.fire = true;
                }
            });
        }
        for name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            add_listener(canvas, name, move |_event: MouseEvent| {
                game.borrow_mut().input.fire = false;
            });
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            add_listener(&window, "keydown", move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.key(&key, true) {
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match key.as_str() {
                    "q" | "Q" => g.cycle_quality(),
                    "g" | "G" => {
                        g.settings.show_grid = !g.settings.show_grid;
                        g.settings.save();
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "r" | "R" if g.world.game_over => g.restart(js_sys::Date::now() as u64),
                    _ => {}
                }
            });
        }
        {
            let game = game.clone();
            add_listener(&window, "keyup", move |event: KeyboardEvent| {
                game.borrow_mut().key(&event.key(), false);
            });
        }

        // Drop held inputs when focus is lost so nothing sticks
        add_listener(&window, "blur", move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.input = TickInput {
                pointer: g.input.pointer,
                ..Default::default()
            };
        });
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        add_listener(&window.clone(), "resize", move |_event: web_sys::Event| {
            let (width, height, viewport) = fit_canvas(&canvas, window.device_pixel_ratio());
            let mut g = game.borrow_mut();
            g.world.resize(viewport.x, viewport.y);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, viewport);
            }
            log::debug!("Resized to {}x{} ({}x{} px)", viewport.x, viewport.y, width, height);
        });
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            add_listener(&btn, "click", move |_event: MouseEvent| {
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            });
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
            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                SIM_DT_MS
            };
            g.last_time = time;

            g.update(dt_ms, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: scripted input for a fixed number of frames, then a JSON
/// summary on stdout. Takes an optional `SimConfig` JSON path.
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), blaze_arena::Error> {
    use blaze_arena::Settings;
    use blaze_arena::consts::SIM_DT_MS;
    use blaze_arena::renderer::build_frame;
    use blaze_arena::sim::{GameEvent, Movement, SimConfig, TickInput, World, tick};
    use glam::Vec2;

    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load(&path)?,
        None => SimConfig::default(),
    };
    let settings = Settings::load();
    log::info!("Blaze Arena (headless) starting with seed {:#x}", config.seed);

    let frames: u64 = std::env::var("BLAZE_FRAMES")
        .ok()
        .and_then(|f| f.parse().ok())
        .unwrap_or(3600);

    let mut world = World::new(&config);
    let mut bosses = 0u32;
    let mut peak_vertices = 0usize;

    for frame in 0..frames {
        // Strafe in a slow square while sweeping the aim around
        let leg = (frame / 120) % 4;
        let sweep = frame as f32 * 0.03;
        let input = TickInput {
            movement: Movement {
                up: leg == 0,
                right: leg == 1,
                down: leg == 2,
                left: leg == 3,
            },
            pointer: world.screen_center() + Vec2::from_angle(sweep) * 200.0,
            fire: frame % 90 < 60,
            shoot: true,
        };

        tick(&mut world, &input, SIM_DT_MS);

        for event in world.drain_events() {
            match event {
                GameEvent::BossIncoming => bosses += 1,
                GameEvent::GameOver { score } => {
                    log::info!("Game over at frame {} with {} points", frame, score)
                }
                other => log::trace!("{:?}", other),
            }
        }

        let scene = build_frame(&world, &settings);
        peak_vertices = peak_vertices.max(scene.vertices.len());

        if world.game_over {
            break;
        }
    }

    let summary = serde_json::json!({
        "seed": world.seed,
        "frames": world.frame,
        "score": world.score,
        "kills": world.total_kills,
        "bosses": bosses,
        "health": world.player.health,
        "game_over": world.game_over,
        "enemies_alive": world.enemies.len(),
        "peak_vertices": peak_vertices,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
