//! Circle Eater entry point
//!
//! The web build runs the interactive game on a canvas. The native build has
//! no window: it plays one session on autopilot against the file store and
//! logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

    use circle_eater::audio::{AudioSink, WebAudio};
    use circle_eater::consts::*;
    use circle_eater::persistence::{MemoryStorage, Storage, WebStorage};
    use circle_eater::platform::dom::{self, Overlay};
    use circle_eater::platform::{
        Viewport, key_from_browser, mouse_button_from_browser, wheel_notches,
    };
    use circle_eater::renderer::SdfRenderState;
    use circle_eater::ui::{InputEvent, Key, View};
    use circle_eater::{App, AppEvent};

    /// Everything the browser callbacks share
    struct Game {
        app: App,
        render_state: SdfRenderState,
        overlay: Overlay,
        audio: WebAudio,
        canvas: HtmlCanvasElement,
        document: Document,
        last_time: f64,
        running: bool,
    }

    impl Game {
        /// Arena position of a mouse event
        fn arena_pos(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let viewport = Viewport::fit(Vec2::new(rect.width() as f32, rect.height() as f32));
            viewport.to_arena(Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            ))
        }

        /// Feed one input event and carry out whatever it triggered
        fn input(&mut self, event: InputEvent) {
            if !self.running {
                return;
            }
            self.app.handle_event(event);
            self.dispatch();
        }

        /// Execute queued app events (sounds, music, fullscreen, quit)
        fn dispatch(&mut self) {
            for event in self.app.drain_events() {
                if event.apply_audio(&mut self.audio, self.app.settings()) {
                    if event == AppEvent::SettingsChanged {
                        self.apply_fullscreen();
                    }
                    continue;
                }
                if event == AppEvent::Quit {
                    self.stop();
                }
            }
        }

        fn apply_fullscreen(&self) {
            if let Some(root) = self.document.document_element() {
                dom::set_fullscreen(&self.document, &root, self.app.settings().fullscreen);
            }
        }

        /// Match the drawing buffer to the displayed canvas size
        fn resize(&mut self) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            if (width, height) != self.render_state.size {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
            }
            self.overlay
                .fit(&Viewport::fit(Vec2::new(client_w as f32, client_h as f32)));
        }

        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            self.last_time = time;

            self.app.update(dt);
            self.dispatch();
            if !self.running {
                return;
            }
            self.audio.continue_music();

            let view = self.app.view();
            self.render(&view);
            self.overlay.draw(&view);
        }

        fn render(&mut self, view: &View) {
            match self.render_state.render(view.scene.as_ref(), view.background) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Stop the loop and leave a farewell on screen
        fn stop(&mut self) {
            self.running = false;
            self.audio.stop_music();
            let mut view = View::new();
            view.text(
                "Thanks for playing! Reload the page to play again.",
                Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0),
                circle_eater::ui::TextSize::Normal,
                circle_eater::ui::Align::Center,
            );
            self.render(&view);
            self.overlay.draw(&view);
            log::info!("Circle Eater stopped");
        }
    }

    fn open_storage() -> Box<dyn Storage> {
        match WebStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; settings and runs will not persist", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    fn element(document: &Document, id: &str) -> Result<Element, JsValue> {
        document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Circle Eater starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = element(&document, "canvas")?.dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width().max(1) as f64) * dpr) as u32;
        let height = ((canvas.client_height().max(1) as f64) * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {}", e)))?;

        let overlay = Overlay::attach(&document, "ui")?;

        let seed = js_sys::Date::now() as u64;
        let app = App::new(open_storage(), seed);
        log::info!("App initialized with seed: {}", seed);

        let mut audio = WebAudio::new();
        audio.apply_settings(app.settings());

        let game = Rc::new(RefCell::new(Game {
            app,
            render_state,
            overlay,
            audio,
            canvas: canvas.clone(),
            document,
            last_time: 0.0,
            running: true,
        }));
        {
            let mut g = game.borrow_mut();
            g.resize();
            g.apply_fullscreen();
        }

        setup_input_handlers(&window, &canvas, game.clone())?;
        request_animation_frame(game);

        log::info!("Circle Eater running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = key_from_browser(&event.key()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                if matches!(
                    key,
                    Key::Up | Key::Down | Key::Left | Key::Right | Key::Space | Key::Backspace
                ) {
                    event.prevent_default();
                }
                game.borrow_mut().input(InputEvent::KeyDown(key));
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_browser(&event.key()) {
                    game.borrow_mut().input(InputEvent::KeyUp(key));
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(button) = mouse_button_from_browser(event.button()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let pos = g.arena_pos(&event);
                g.input(InputEvent::MouseDown { pos, button });
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let Some(button) = mouse_button_from_browser(event.button()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                let pos = g.arena_pos(&event);
                g.input(InputEvent::MouseUp { pos, button });
            });
            // Window-level so a slider drag ends even off the canvas
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.arena_pos(&event);
                g.input(InputEvent::MouseMove { pos });
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                let notches = wheel_notches(event.delta_y());
                if notches != 0 {
                    event.prevent_default();
                    game.borrow_mut().input(InputEvent::Wheel { notches });
                }
            });
            canvas.add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
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
        let running = {
            let mut g = game.borrow_mut();
            g.resize();
            g.frame(time);
            g.running
        };

        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Circle Eater failed to start: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use circle_eater::App;
    use circle_eater::app::Screen;
    use circle_eater::audio::LogAudio;
    use circle_eater::consts::SIM_DT;
    use circle_eater::leaderboard::{Leaderboard, SortMode};
    use circle_eater::persistence::FileStorage;
    use circle_eater::ui::{InputEvent, Key};

    /// Ten minutes of game time
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Circle Eater (native) starting...");

    let data_dir =
        std::env::var("CIRCLE_EATER_DATA_DIR").unwrap_or_else(|_| "save_files".to_string());
    let storage = match FileStorage::open(&data_dir) {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Cannot use data directory '{}': {}", data_dir, e);
            std::process::exit(1);
        }
    };
    log::info!("Data directory: {}", storage.root().display());

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut app = App::new(Box::new(storage), seed);
    let mut audio = LogAudio::new();
    let route = |app: &mut App, audio: &mut LogAudio| {
        for event in app.drain_events() {
            event.apply_audio(audio, app.settings());
        }
    };

    // No window: let the autopilot play one session
    app.set_autopilot(true);
    app.handle_event(InputEvent::KeyDown(Key::Enter));
    route(&mut app, &mut audio);

    let mut won = None;
    for _ in 0..MAX_FRAMES {
        app.update(SIM_DT);
        route(&mut app, &mut audio);
        if let Screen::Playing(game) = app.screen() {
            if let Some(win) = game.win() {
                won = Some((win.time_secs, win.is_new_record));
                break;
            }
        } else {
            break;
        }
    }

    match won {
        Some((time, true)) => log::info!("Won in {:.2} s - new record!", time),
        Some((time, false)) => log::info!("Won in {:.2} s", time),
        None => log::warn!("Session ended without a win"),
    }

    let board = Leaderboard::load(app.storage());
    log::info!(
        "{} run(s) recorded, best {}",
        board.len(),
        board
            .fastest_time()
            .map(|t| format!("{:.2} s", t))
            .unwrap_or_else(|| "--".to_string())
    );
    for (rank, run) in board.sorted(SortMode::Best).iter().take(5).enumerate() {
        let time = run
            .time
            .map(|t| format!("{:.2} s", t))
            .unwrap_or_else(|| "--".to_string());
        log::info!("#{} {} {} ({})", rank + 1, run.name, time, run.date);
    }

    // Back to the menu, then close
    app.handle_event(InputEvent::Quit);
    app.handle_event(InputEvent::Quit);
    route(&mut app, &mut audio);
    log::info!("Played {} sound cue(s)", audio.played().len());
}
