//! Lava Run entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use lava_run::game::{FrameEvent, Game, RunPhase};
    use lava_run::levels::builtin_levels;
    use lava_run::render::DomDisplay;
    use lava_run::sim::Input;

    /// Pressed-state of the tracked keys, written by the event listeners
    /// and sampled once per frame
    #[derive(Default)]
    struct Keys {
        left: bool,
        right: bool,
        up: bool,
    }

    impl Keys {
        fn snapshot(&self) -> Input {
            Input {
                left: self.left,
                right: self.right,
                up: self.up,
            }
        }
    }

    /// App instance holding all state
    struct App {
        game: Game,
        display: DomDisplay,
        keys: Keys,
        last_time: f64,
        /// Last HUD time value written, to avoid DOM churn
        hud_time: i32,
    }

    impl App {
        /// Run one frame: simulate, redraw, update HUD
        fn frame(&mut self, document: &Document, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            let event = self.game.frame(dt, self.keys.snapshot());

            let result = match event {
                // Fresh level attempt: tear the old view down and rebuild
                Some(FrameEvent::LifeLost | FrameEvent::LevelWon) => {
                    self.display.clear();
                    DomDisplay::new(document, &parent(document), self.game.level())
                        .map(|display| self.display = display)
                }
                // Run over: take the level view down, the HUD carries the
                // final message
                Some(FrameEvent::GameOver | FrameEvent::GameComplete) => {
                    self.display.clear();
                    Ok(())
                }
                None => match self.game.phase() {
                    RunPhase::GameOver | RunPhase::Complete => Ok(()),
                    _ => self.display.draw_frame(document, self.game.level()),
                },
            };
            if let Err(err) = result {
                log::warn!("render error: {err:?}");
            }

            self.update_hud(document);
        }

        fn update_hud(&mut self, document: &Document) {
            let time = self.game.level().round_time().ceil() as i32;
            if time != self.hud_time {
                self.hud_time = time;
                if let Some(el) = document.get_element_by_id("time") {
                    el.set_text_content(Some(&time.to_string()));
                }
            }

            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&self.game.lives().to_string()));
            }

            if let Some(el) = document.get_element_by_id("status") {
                let text = match self.game.phase() {
                    RunPhase::Playing => "",
                    RunPhase::Paused => "Paused",
                    RunPhase::GameOver => "Game Over",
                    RunPhase::Complete => "You win!",
                };
                el.set_text_content(Some(text));
            }
        }
    }

    /// Element the level view is mounted under (`#game` if present,
    /// otherwise the body)
    fn parent(document: &Document) -> web_sys::Element {
        document
            .get_element_by_id("game")
            .unwrap_or_else(|| document.body().expect("no body").into())
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lava Run starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(builtin_levels(), seed).expect("built-in levels are valid");
        let display = DomDisplay::new(&document, &parent(&document), game.level())
            .expect("failed to build level view");

        log::info!("Run initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            display,
            keys: Keys::default(),
            last_time: 0.0,
            hud_time: -1,
        }));

        setup_key_handlers(app.clone());
        request_animation_frame(app);

        log::info!("Lava Run running!");
    }

    fn setup_key_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        // Keydown: movement flags on, pause toggle on Escape
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => {
                        a.keys.left = true;
                        event.prevent_default();
                    }
                    "ArrowRight" => {
                        a.keys.right = true;
                        event.prevent_default();
                    }
                    "ArrowUp" => {
                        a.keys.up = true;
                        event.prevent_default();
                    }
                    "Escape" => {
                        a.game.toggle_pause();
                        log::info!("pause toggled: {:?}", a.game.phase());
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup: movement flags off
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" => a.keys.left = false,
                    "ArrowRight" => a.keys.right = false,
                    "ArrowUp" => a.keys.up = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .expect("no document");
            app.borrow_mut().frame(&document, time);
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lava_run::game::{Game, RunPhase};
    use lava_run::levels::builtin_levels;
    use lava_run::sim::Input;

    env_logger::init();
    log::info!("Lava Run (native) starting...");

    // Headless demo: hold right across the built-in levels and report how
    // the run ends. Mostly useful as a smoke test; run with `trunk serve`
    // for the playable web version.
    let mut game = Game::new(builtin_levels(), 42).expect("built-in levels are valid");
    let input = Input {
        right: true,
        ..Input::default()
    };

    for _ in 0..500_000u32 {
        game.frame(1.0 / 60.0, input);
        if matches!(game.phase(), RunPhase::GameOver | RunPhase::Complete) {
            break;
        }
    }

    log::info!(
        "run ended: {:?} on level {} with {} lives",
        game.phase(),
        game.level_index() + 1,
        game.lives()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
