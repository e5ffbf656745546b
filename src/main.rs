//! Ball Blitz entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};

    use ball_blitz::consts::*;
    use ball_blitz::render::{Sprite, draw_frame};
    use ball_blitz::sim::{GamePhase, GameState, TickInput, tick};

    use glam::Vec2;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        sprite: Option<Sprite>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // Track phase so the summary overlay is shown exactly once
        last_phase: GamePhase,
    }

    impl Game {
        fn new(seed: u64, canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state: GameState::new(seed),
                canvas,
                ctx,
                sprite: Sprite::load("assets/ball.png"),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                last_phase: GamePhase::Idle,
            }
        }

        /// Convert a client-space pointer position to playfield space
        fn pos_to_playfield(&self, client_x: f32, client_y: f32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let scale_x = self.state.config.width / rect.width() as f32;
            let scale_y = self.state.config.height / rect.height() as f32;
            Vec2::new(
                (client_x - rect.left() as f32) * scale_x,
                (client_y - rect.top() as f32) * scale_y,
            )
        }

        /// Run simulation ticks with a fixed-timestep accumulator
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pointer = None;
                self.input.start = false;
                self.input.reset = false;
            }
        }

        fn render(&self) {
            draw_frame(&self.ctx, &self.state, self.sprite.as_ref());
        }

        /// Mirror score/lives/level/bonus into HUD text elements
        fn update_hud(&mut self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.lives.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.level.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-bonus .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("${}", self.state.bonus_count)));
            }

            // Show the summary overlay on the Running -> terminal edge
            let phase = self.state.phase;
            if phase != self.last_phase {
                if let Some(summary) = self.state.summary() {
                    if let Some(el) = document.get_element_by_id("summary") {
                        let _ = el.set_attribute("class", "");
                    }
                    if let Some(el) = document.get_element_by_id("summary-title") {
                        let title = if summary.victory {
                            "You win!"
                        } else {
                            "Game over"
                        };
                        el.set_text_content(Some(title));
                    }
                    if let Some(el) = document.get_element_by_id("summary-detail") {
                        el.set_text_content(Some(&format!(
                            "Promo code: {} — bonus ${}, final discount ${}",
                            summary.code, summary.bonus_count, summary.reward
                        )));
                    }
                    log::info!(
                        "Run ended: {} (score {}, code {})",
                        if summary.victory { "victory" } else { "defeat" },
                        summary.score,
                        summary.code
                    );
                } else if let Some(el) = document.get_element_by_id("summary") {
                    // back to idle/running: hide the overlay
                    let _ = el.set_attribute("class", "hidden");
                }
                self.last_phase = phase;
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ball Blitz starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("playfield")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed internal resolution; CSS scales the element
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas.clone(), ctx)));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        request_animation_frame(game);

        log::info!("Ball Blitz running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down: pop attempt at the playfield position
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let mut g = game.borrow_mut();
            let point = g.pos_to_playfield(event.client_x() as f32, event.client_y() as f32);
            g.input.pointer = Some(point);
        });
        let _ =
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("reset-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                // fresh seed for the next run; the reset tick rebuilds from it
                g.state.seed = js_sys::Date::now() as u64;
                g.input.reset = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
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
fn main() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use ball_blitz::consts::SIM_DT;
    use ball_blitz::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Ball Blitz (native) starting headless autoplay...");

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut state = GameState::new(seed);

    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, SIM_DT);

    // Click the front-most ball twice a second until the run ends.
    let mut ticks: u64 = 0;
    while state.phase == GamePhase::Running && ticks < 120 * 600 {
        let pointer = (ticks % 60 == 0)
            .then(|| state.balls.last().map(|b| b.pos))
            .flatten();
        let input = TickInput {
            pointer,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        ticks += 1;
    }

    match state.summary() {
        Some(summary) => println!(
            "{} — score {}, level {}, bonus ${}, code {} (${} off)",
            if summary.victory { "Victory" } else { "Defeat" },
            summary.score,
            summary.level,
            summary.bonus_count,
            summary.code,
            summary.reward
        ),
        None => println!("Run still going after {} ticks", ticks),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
