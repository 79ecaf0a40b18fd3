//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use road_rush::audio::WebAudio;
    use road_rush::consts::*;
    use road_rush::game::{Game, Services};
    use road_rush::persistence::local_storage::LocalStorageStore;
    use road_rush::renderer::{RenderState, ShapeBatch, draw_scene};
    use road_rush::ui::{DomPresenter, LogPresenter, Presenter};
    use road_rush::{Settings, Tuning};

    /// Driver plus everything needed to put a frame on screen
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        batch: ShapeBatch,
    }

    impl App {
        fn render(&mut self) {
            self.batch.clear();
            draw_scene(self.game.world(), &mut self.batch);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
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
        }
    }

    /// Canvas size the page allows: the window minus a margin, capped at 800×600
    fn viewport_for(window: &web_sys::Window) -> Vec2 {
        let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let w = (inner(window.inner_width()) as f32 - 40.0).clamp(1.0, VIEWPORT_WIDTH);
        let h = (inner(window.inner_height()) as f32 - 40.0).clamp(1.0, VIEWPORT_HEIGHT);
        Vec2::new(w.floor(), h.floor())
    }

    /// Size the backbuffer for the device pixel ratio; returns it in pixels
    fn size_canvas(canvas: &HtmlCanvasElement, viewport: Vec2, dpr: f64) -> (u32, u32) {
        let width = (viewport.x as f64 * dpr) as u32;
        let height = (viewport.y as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width: {}px; height: {}px;", viewport.x, viewport.y),
        );
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Road Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = viewport_for(&window);
        let (width, height) = size_canvas(&canvas, viewport, window.device_pixel_ratio());
        log::info!("Canvas size: {}x{}", viewport.x, viewport.y);

        let settings = Settings::load();
        let presenter: Box<dyn Presenter> = match DomPresenter::new() {
            Some(dom) => Box::new(dom),
            None => {
                log::warn!("HUD elements unavailable; logging instead");
                Box::new(LogPresenter::default())
            }
        };
        let services = Services {
            audio: Box::new(WebAudio::new(settings.volume())),
            presenter,
            store: Box::new(LocalStorageStore::default()),
        };
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, viewport, Tuning::default(), settings, services);
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

        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .expect("Failed to create device");

        let app = Rc::new(RefCell::new(App {
            game,
            render_state: Some(render_state),
            batch: ShapeBatch::new(viewport),
        }));

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_page_events(app.clone(), canvas);

        request_animation_frame(app);
        log::info!("Game ready! Click Start to begin.");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().game.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().game.key_up(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, app: Rc<RefCell<App>>, action: fn(&mut Game)) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{id}");
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut app = app.borrow_mut();
            app.game.user_gesture();
            action(&mut app.game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        on_click("startButton", app.clone(), Game::start_game);
        on_click("restartButton", app.clone(), Game::start_game);
        on_click("nextLevelButton", app, Game::next_level);
    }

    fn setup_page_events(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Tab hidden or shown
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() != web_sys::VisibilityState::Hidden;
                app.borrow_mut().game.set_visible(visible);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur releases held keys
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.focus_lost();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = viewport_for(&window);
                let (width, height) = size_canvas(&canvas, viewport, window.device_pixel_ratio());
                let mut app = app.borrow_mut();
                app.game.resize(viewport);
                app.batch.set_viewport(viewport);
                if let Some(ref mut render_state) = app.render_state {
                    render_state.viewport = viewport;
                    render_state.resize(width, height);
                }
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            app.game.frame(time);
            app.render();
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: an autopilot plays one game against the real simulation
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use road_rush::audio::NullAudio;
    use road_rush::consts::*;
    use road_rush::game::{Game, Services};
    use road_rush::persistence::file::FileStore;
    use road_rush::sim::GamePhase;
    use road_rush::ui::LogPresenter;
    use road_rush::{Settings, Tuning};

    env_logger::init();
    log::info!("Road Rush (headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    let tuning = match std::env::var("ROAD_RUSH_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path).map(|json| Tuning::from_json(&json)) {
            Ok(Ok(tuning)) => tuning,
            Ok(Err(e)) => {
                log::warn!("Ignoring malformed tuning {path}: {e}");
                Tuning::default()
            }
            Err(e) => {
                log::warn!("Cannot read tuning {path}: {e}");
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };
    let store = FileStore::new(std::env::temp_dir().join("road_rush_highscore.json"));
    log::info!("High score file: {}", store.path().display());

    let services = Services {
        audio: Box::new(NullAudio::default()),
        presenter: Box::new(LogPresenter::default()),
        store: Box::new(store),
    };
    let viewport = Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    let mut game = Game::new(seed, viewport, tuning, Settings::default(), services);
    game.start_game();

    // Ten simulated minutes is far beyond any finished run
    let max_frames = (600.0 / MAX_FRAME_DT) as usize;
    for _ in 0..max_frames {
        match game.phase() {
            GamePhase::Playing => {}
            GamePhase::LevelComplete => game.next_level(),
            GamePhase::Start | GamePhase::GameOver | GamePhase::GameWon => break,
        }
        steer(&mut game);
        game.step(MAX_FRAME_DT);
    }

    let hud = game.hud();
    println!(
        "seed {seed}: {:?} on level {} with {} points (best {}), {} items, {} obstacles avoided",
        hud.phase,
        hud.level,
        hud.score,
        hud.high_score,
        hud.stats.items_collected,
        hud.stats.obstacles_avoided
    );
}

/// Dodge the closest obstacle ahead in our lane, otherwise drift toward pickups
#[cfg(not(target_arch = "wasm32"))]
fn steer(game: &mut road_rush::Game) {
    use road_rush::sim::Entity;

    let world = game.world();
    let car = world.player.body;
    let center = car.center();

    let threat = world
        .obstacles
        .iter()
        .map(|o| o.body)
        .filter(|b| b.pos.y + b.height() < car.pos.y + car.height() && b.pos.y > car.pos.y - 250.0)
        .filter(|b| b.pos.x < car.pos.x + car.width() + 15.0 && b.pos.x + b.width() > car.pos.x - 15.0)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    let target_x = match threat {
        Some(obstacle) => {
            let left_room = obstacle.pos.x;
            let right_room = world.viewport.x - (obstacle.pos.x + obstacle.width());
            if left_room > right_room {
                obstacle.pos.x - car.width()
            } else {
                obstacle.pos.x + obstacle.width() + car.width()
            }
        }
        None => world
            .fuel_pickups
            .iter()
            .map(|f| f.body())
            .chain(world.collectibles.iter().map(|c| c.body()))
            .chain(world.power_ups.iter().map(|p| p.body()))
            .filter(|b| b.pos.y < car.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map_or(world.viewport.x / 2.0, |b| b.center().x),
    };

    let (left, right) = match target_x - center.x {
        d if d < -10.0 => (true, false),
        d if d > 10.0 => (false, true),
        _ => (false, false),
    };
    for (code, held) in [("ArrowLeft", left), ("ArrowRight", right)] {
        if held {
            game.key_down(code);
        } else {
            game.key_up(code);
        }
    }
}
