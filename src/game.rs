//! Game shell
//!
//! Owns the simulation and its collaborators: buffers input, runs fixed ticks, turns
//! simulation events into sounds, vibration and best-score saves. Collaborator failures
//! are logged and otherwise ignored; they never reach the simulation.

use crate::audio::{AudioSink, Cue};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::InputIntents;
use crate::persistence::BestScoreStore;
use crate::platform::{Haptics, Vibration};
use crate::render::RenderFrame;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};
use crate::tuning::Tuning;

/// Top-level game object
pub struct Game {
    state: GameState,
    input: InputIntents,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    haptics: Box<dyn Haptics>,
    store: Box<dyn BestScoreStore>,
    /// Best score as last written to the store
    saved_best: u64,
    /// Whether this run already played the new-best fanfare
    celebrated: bool,
    accumulator: f32,
}

impl Game {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        settings: Settings,
        mut audio: Box<dyn AudioSink>,
        haptics: Box<dyn Haptics>,
        mut store: Box<dyn BestScoreStore>,
    ) -> Self {
        let saved_best = match store.load_best() {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not load best score, starting from 0: {e}");
                0
            }
        };
        audio.apply_settings(&settings);

        let mut state = GameState::with_tuning(seed, tuning);
        state.best_score = saved_best;

        Self {
            state,
            input: InputIntents::new(),
            settings,
            audio,
            haptics,
            store,
            saved_best,
            celebrated: false,
            accumulator: 0.0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn input(&mut self) -> &mut InputIntents {
        &mut self.input
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in new preferences and persist them
    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.apply_settings(&settings);
        settings.save();
        self.settings = settings;
    }

    /// Run exactly one simulation tick; returns the events it produced
    pub fn step(&mut self) -> Vec<GameEvent> {
        let input = self.input.take();
        tick(&mut self.state, &input);

        let events = self.state.drain_events();
        for event in &events {
            self.dispatch(event);
        }
        events
    }

    /// Advance by wall-clock `dt` seconds using fixed ticks; returns ticks run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Snapshot for the renderer (screen shake removed when the player opted out)
    pub fn frame(&self) -> RenderFrame {
        let mut frame = RenderFrame::capture(&self.state);
        if !self.settings.effective_screen_shake() {
            frame.shake = 0.0;
        }
        frame
    }

    fn dispatch(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::Jumped { .. } => self.cue(Cue::Jump),
            GameEvent::Landed { .. } => self.cue(Cue::Land),
            GameEvent::Scored { .. } => self.cue(Cue::Score),
            GameEvent::PowerUpCollected { .. } => self.cue(Cue::PowerUp),
            GameEvent::NewBest { score } => {
                self.save_best(score);
                if !self.celebrated {
                    self.celebrated = true;
                    self.cue(Cue::NewBest);
                }
            }
            GameEvent::FallStarted { .. } => {
                self.cue(Cue::Splash);
                self.vibrate(Vibration::Light);
            }
            GameEvent::GameOver { .. } => {
                self.cue(Cue::GameOver);
                self.vibrate(Vibration::Heavy);
            }
            GameEvent::Restarted => self.celebrated = false,
            GameEvent::EffectExpired { .. } | GameEvent::SharkSpawned { .. } => {}
        }
    }

    fn cue(&mut self, cue: Cue) {
        if !self.settings.sound {
            return;
        }
        if let Err(e) = self.audio.play(cue) {
            log::warn!("Audio cue {cue:?} failed: {e}");
        }
    }

    fn vibrate(&mut self, strength: Vibration) {
        if !self.settings.vibration {
            return;
        }
        if let Err(e) = self.haptics.vibrate(strength) {
            log::warn!("Vibration failed: {e}");
        }
    }

    fn save_best(&mut self, score: u64) {
        if score <= self.saved_best {
            return;
        }
        match self.store.save_best(score) {
            Ok(()) => self.saved_best = score,
            Err(e) => log::warn!("Could not save best score {score}: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FeedbackError;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::sim::{FallCause, GamePhase, PowerUpKind, apply_powerup, enter_falling};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log<T> = Rc<RefCell<Vec<T>>>;

    struct RecordingAudio(Log<Cue>);

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: Cue) -> Result<(), FeedbackError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
    }

    struct BrokenAudio;

    impl AudioSink for BrokenAudio {
        fn play(&mut self, _cue: Cue) -> Result<(), FeedbackError> {
            Err(FeedbackError::Unavailable("speakers"))
        }
    }

    struct RecordingHaptics(Log<Vibration>);

    impl Haptics for RecordingHaptics {
        fn vibrate(&mut self, strength: Vibration) -> Result<(), FeedbackError> {
            self.0.borrow_mut().push(strength);
            Ok(())
        }
    }

    /// Store that remembers saves in a shared log and can be told to fail
    struct SharedStore {
        saves: Log<u64>,
        fail: bool,
    }

    impl BestScoreStore for SharedStore {
        fn load_best(&mut self) -> Result<u64, StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("test".into()));
            }
            Ok(self.saves.borrow().last().copied().unwrap_or(0))
        }

        fn save_best(&mut self, score: u64) -> Result<(), StoreError> {
            if self.fail {
                return Err(StoreError::Unavailable("test".into()));
            }
            self.saves.borrow_mut().push(score);
            Ok(())
        }
    }

    struct Rig {
        game: Game,
        cues: Log<Cue>,
        buzzes: Log<Vibration>,
        saves: Log<u64>,
    }

    fn rig(settings: Settings, fail_store: bool) -> Rig {
        let cues: Log<Cue> = Rc::default();
        let buzzes: Log<Vibration> = Rc::default();
        let saves: Log<u64> = Rc::default();
        let game = Game::new(
            9,
            Tuning::default(),
            settings,
            Box::new(RecordingAudio(cues.clone())),
            Box::new(RecordingHaptics(buzzes.clone())),
            Box::new(SharedStore {
                saves: saves.clone(),
                fail: fail_store,
            }),
        );
        Rig {
            game,
            cues,
            buzzes,
            saves,
        }
    }

    #[test]
    fn test_loads_best_from_store() {
        let game = Game::new(
            1,
            Tuning::default(),
            Settings::default(),
            Box::new(BrokenAudio),
            Box::new(RecordingHaptics(Rc::default())),
            Box::new(MemoryStore::with_json("70")),
        );
        assert_eq!(game.state().best_score, 70);
    }

    #[test]
    fn test_jump_plays_cue() {
        let mut rig = rig(Settings::default(), false);
        rig.game.input().begin_charge();
        rig.game.step();
        rig.game.input().release_jump();
        let events = rig.game.step();
        assert!(matches!(events[0], GameEvent::Jumped { .. }));
        assert_eq!(rig.cues.borrow().as_slice(), &[Cue::Jump]);
    }

    #[test]
    fn test_new_best_is_saved_once_per_improvement() {
        let mut rig = rig(Settings::default(), false);
        rig.game.step();
        apply_powerup(&mut rig.game.state, PowerUpKind::Score);
        rig.game.step();
        assert_eq!(rig.saves.borrow().as_slice(), &[50]);
        assert!(rig.cues.borrow().contains(&Cue::NewBest));

        apply_powerup(&mut rig.game.state, PowerUpKind::Score);
        rig.game.step();
        assert_eq!(rig.saves.borrow().as_slice(), &[50, 100]);
        let fanfares = rig.cues.borrow().iter().filter(|c| **c == Cue::NewBest).count();
        assert_eq!(fanfares, 1);
    }

    #[test]
    fn test_store_failure_is_not_fatal() {
        let mut rig = rig(Settings::default(), true);
        assert_eq!(rig.game.state().best_score, 0);
        apply_powerup(&mut rig.game.state, PowerUpKind::Score);
        rig.game.step();
        assert_eq!(rig.game.state().best_score, 50);
        assert_eq!(rig.game.state().phase, GamePhase::Playing);
        assert!(rig.saves.borrow().is_empty());
    }

    #[test]
    fn test_fall_and_game_over_feedback() {
        let mut rig = rig(Settings::default(), false);
        rig.game.step();
        enter_falling(&mut rig.game.state, FallCause::Gap);
        rig.game.step();
        assert_eq!(rig.buzzes.borrow().as_slice(), &[Vibration::Light]);
        assert!(rig.cues.borrow().contains(&Cue::Splash));

        for _ in 0..200 {
            rig.game.step();
        }
        assert_eq!(rig.game.state().phase, GamePhase::GameOver);
        assert_eq!(
            rig.buzzes.borrow().as_slice(),
            &[Vibration::Light, Vibration::Heavy]
        );
        assert_eq!(rig.cues.borrow().last(), Some(&Cue::GameOver));
    }

    #[test]
    fn test_settings_gate_feedback() {
        let settings = Settings {
            sound: false,
            vibration: false,
            ..Default::default()
        };
        let mut rig = rig(settings, false);
        rig.game.step();
        enter_falling(&mut rig.game.state, FallCause::Hazard);
        for _ in 0..200 {
            rig.game.step();
        }
        assert!(rig.cues.borrow().is_empty());
        assert!(rig.buzzes.borrow().is_empty());
    }

    #[test]
    fn test_broken_audio_does_not_stop_play() {
        let mut game = Game::new(
            3,
            Tuning::default(),
            Settings::default(),
            Box::new(BrokenAudio),
            Box::new(RecordingHaptics(Rc::default())),
            Box::new(MemoryStore::new()),
        );
        game.input().begin_charge();
        game.step();
        game.input().release_jump();
        game.step();
        assert!(game.state().player.jumping);
    }

    #[test]
    fn test_advance_runs_fixed_ticks() {
        let mut rig = rig(Settings::default(), false);
        assert_eq!(rig.game.advance(SIM_DT * 2.5), 2);
        assert_eq!(rig.game.state().time_ticks, 2);
        // Long stalls are capped
        assert_eq!(rig.game.advance(5.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_frame_respects_reduced_motion() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut rig = rig(settings, false);
        rig.game.state.camera.shake = 10.0;
        assert_eq!(rig.game.frame().shake, 0.0);
    }
}
