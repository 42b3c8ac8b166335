//! Tide Hop entry point
//!
//! Native: runs a headless autopilot game and prints a JSON summary.
//! Web: exposes a small game handle that a JavaScript renderer drives.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use tide_hop::audio::AudioManager;
    use tide_hop::persistence::LocalStorageStore;
    use tide_hop::platform::DeviceHaptics;
    use tide_hop::{Game, Settings, Tuning};

    /// Game handle owned by the page
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new(seed: f64) -> WebGame {
            let game = Game::new(
                seed as u64,
                Tuning::default(),
                Settings::load(),
                Box::new(AudioManager::new()),
                Box::new(DeviceHaptics),
                Box::new(LocalStorageStore::default()),
            );
            WebGame { game }
        }

        pub fn press(&mut self) {
            self.game.input().begin_charge();
        }

        #[wasm_bindgen(js_name = "pointerMove")]
        pub fn pointer_move(&mut self) {
            self.game.input().continue_charge();
        }

        pub fn release(&mut self) {
            self.game.input().release_jump();
        }

        pub fn cancel(&mut self) {
            self.game.input().cancel_charge();
        }

        #[wasm_bindgen(js_name = "setAutopilot")]
        pub fn set_autopilot(&mut self, on: bool) {
            self.game.input().autopilot = on;
        }

        /// Advance by `dt` seconds and return the frame as JSON
        pub fn frame(&mut self, dt: f32) -> Result<String, JsValue> {
            self.game.advance(dt);
            self.game
                .frame()
                .to_json()
                .map_err(|e| JsValue::from_str(&e.to_string()))
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }
        log::info!("Tide Hop starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;
    use std::str::FromStr;

    use serde::Serialize;

    use tide_hop::audio::AudioManager;
    use tide_hop::persistence::{BestScoreStore, JsonFileStore, MemoryStore};
    use tide_hop::platform::DeviceHaptics;
    use tide_hop::render::Hud;
    use tide_hop::sim::{FallCause, GameEvent, GamePhase};
    use tide_hop::{Game, Settings, Tuning};

    const USAGE: &str = "usage: tide-hop [seed] [ticks] [best-score-file]";
    const DEFAULT_TICKS: u64 = 60 * 60;

    #[derive(Serialize)]
    struct Summary {
        seed: u64,
        ticks: u64,
        phase: GamePhase,
        fall_cause: Option<FallCause>,
        difficulty: f32,
        platforms: usize,
        hud: Hud,
    }

    fn arg<T: FromStr>(args: &[String], index: usize, default: T) -> Result<T, String> {
        match args.get(index) {
            Some(raw) => raw.parse().map_err(|_| format!("invalid argument: {raw}")),
            None => Ok(default),
        }
    }

    fn tuning() -> Tuning {
        let Ok(path) = std::env::var("TIDE_HOP_TUNING") else {
            return Tuning::default();
        };
        match Tuning::load(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Tuning::default()
            }
        }
    }

    pub fn run() -> ExitCode {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let (seed, ticks) = match (arg(&args, 0, 1u64), arg(&args, 1, DEFAULT_TICKS)) {
            (Ok(seed), Ok(ticks)) => (seed, ticks),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("{e}\n{USAGE}");
                return ExitCode::from(2);
            }
        };
        let store: Box<dyn BestScoreStore> = match args.get(2) {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };

        log::info!("Tide Hop (headless) seed {seed}, up to {ticks} ticks");

        let mut game = Game::new(
            seed,
            tuning(),
            Settings::load(),
            Box::new(AudioManager::new()),
            Box::new(DeviceHaptics),
            store,
        );
        game.input().autopilot = true;

        let mut fall_cause = None;
        let mut run = 0;
        while run < ticks && game.state().phase != GamePhase::GameOver {
            for event in game.step() {
                if let GameEvent::FallStarted { cause } = event {
                    fall_cause = Some(cause);
                }
            }
            run += 1;
        }

        let state = game.state();
        let summary = Summary {
            seed,
            ticks: run,
            phase: state.phase,
            fall_cause,
            difficulty: state.field.difficulty(),
            platforms: state.field.len(),
            hud: game.frame().hud,
        };
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("could not encode summary: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    headless::run()
}
