//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the tick function is the only writer.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::platforms::PlatformField;
use super::player::Player;
use super::powerup::{Effects, PowerUp, PowerUpKind};
use super::schedule::{Schedule, TimerKind};
use super::shark::Shark;
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Fall-into-the-water animation
    Falling,
    /// Run ended, waiting for restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallCause {
    Hazard,
    Gap,
    OffScreen,
    TimeUp,
    /// Not standing anywhere safe when protection ran out
    UnsafeLanding,
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped { power: f32 },
    Landed { index: usize },
    Scored { points: u64, steps: u64 },
    NewBest { score: u64 },
    PowerUpCollected { kind: PowerUpKind },
    EffectExpired { kind: PowerUpKind },
    SharkSpawned { id: u32, can_jump: bool },
    FallStarted { cause: FallCause },
    GameOver { score: u64, steps: u64 },
    Restarted,
}

/// Smoothed follow camera
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    /// Shake amplitude in pixels, decays each tick
    pub shake: f32,
}

impl Camera {
    /// Ease toward `target`, never scrolling left of the world origin
    pub fn follow(&mut self, target: Vec2, lerp: f32) {
        self.pos += (target - self.pos) * lerp;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
        }
    }

    pub fn decay_shake(&mut self) {
        if self.shake > 0.0 {
            self.shake *= 0.9;
            if self.shake < 0.1 {
                self.shake = 0.0;
            }
        }
    }
}

/// Round countdown in ticks
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Countdown {
    pub total_ticks: u64,
    pub remaining_ticks: u64,
}

impl Countdown {
    pub fn new(secs: f32) -> Self {
        let ticks = secs_to_ticks(secs);
        Self {
            total_ticks: ticks,
            remaining_ticks: ticks,
        }
    }

    /// Count one tick down; true once time is up
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }

    pub fn set_remaining_secs(&mut self, secs: f32) {
        self.remaining_ticks = secs_to_ticks(secs);
    }

    pub fn remaining_secs(&self) -> f32 {
        crate::ticks_to_secs(self.remaining_ticks)
    }
}

/// A splash droplet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 at birth, removed at 0
    pub life: f32,
    pub size: f32,
    pub alpha: f32,
}

/// Maximum particles before a fresh splash is suppressed
pub const MAX_SPLASH_PARTICLES: usize = 30;
/// Droplets per splash burst
pub const SPLASH_BURST: usize = 15;

/// The falling-into-water animation (only exists while falling)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingAnimation {
    pub started_at: u64,
    pub duration_ticks: u64,
    pub cause: FallCause,
    pub particles: Vec<Particle>,
}

impl FallingAnimation {
    /// Progress in [0, 1]
    pub fn progress(&self, now: u64) -> f32 {
        if self.duration_ticks == 0 {
            return 1.0;
        }
        (now.saturating_sub(self.started_at) as f32 / self.duration_ticks as f32).min(1.0)
    }

    /// Burst of droplets around `center_x` on the water line
    pub fn splash(&mut self, center_x: f32, water_y: f32, rng: &mut Pcg32) {
        for _ in 0..SPLASH_BURST {
            self.particles.push(Particle {
                pos: Vec2::new(center_x + (rng.random::<f32>() - 0.5) * 60.0, water_y),
                vel: Vec2::new(
                    (rng.random::<f32>() - 0.5) * 8.0,
                    -rng.random::<f32>() * 12.0 - 5.0,
                ),
                life: 1.0,
                size: rng.random::<f32>() * 6.0 + 3.0,
                alpha: rng.random::<f32>() * 0.8 + 0.2,
            });
        }
    }

    /// Integrate droplets and drop dead ones
    pub fn update_particles(&mut self) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel;
            p.vel.y += 0.5;
            p.vel.x *= 0.98;
            p.life -= 0.02;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Runs started so far (1 for the first)
    pub run: u32,
    pub phase: GamePhase,
    /// Monotonic simulation tick counter
    pub time_ticks: u64,
    /// Animation clock for bobbing phases
    pub anim_time: f32,
    pub countdown: Countdown,
    pub player: Player,
    /// Player size outside of buffs
    pub base_size: f32,
    /// Input intent: pointer is held down
    pub touching: bool,
    pub field: PlatformField,
    /// Sharks in spawn order
    pub sharks: Vec<Shark>,
    pub powerups: Vec<PowerUp>,
    pub effects: Effects,
    pub schedule: Schedule,
    pub camera: Camera,
    pub score: u64,
    /// Platforms advanced this run
    pub steps: u64,
    pub best_score: u64,
    pub last_shark_tick: u64,
    pub last_powerup_tick: u64,
    /// Last collected pickup and when (for the banner)
    pub last_powerup: Option<(PowerUpKind, u64)>,
    pub falling: Option<FallingAnimation>,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let ground_y = tuning.world.ground_y();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning.player, ground_y),
            base_size: tuning.player.size,
            field: PlatformField::new(&tuning.world, &tuning.platforms),
            countdown: Countdown::new(tuning.round.countdown_secs),
            tuning,
            run: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            anim_time: 0.0,
            touching: false,
            sharks: Vec::new(),
            powerups: Vec::new(),
            effects: Effects::default(),
            schedule: Schedule::new(),
            camera: Camera::default(),
            score: 0,
            steps: 0,
            best_score: 0,
            last_shark_tick: 0,
            last_powerup_tick: 0,
            last_powerup: None,
            falling: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.start_run();
        state
    }

    /// Reinitialise everything except the best score and the RNG stream
    pub fn restart(&mut self) {
        self.start_run();
        self.events.push(GameEvent::Restarted);
    }

    fn start_run(&mut self) {
        let ground_y = self.tuning.world.ground_y();
        self.run += 1;
        self.phase = GamePhase::Playing;
        self.anim_time = 0.0;
        self.countdown = Countdown::new(self.tuning.round.countdown_secs);
        self.player = Player::new(&self.tuning.player, ground_y);
        self.base_size = self.tuning.player.size;
        self.touching = false;
        self.field.reset(&self.tuning.platforms);
        self.sharks.clear();
        self.powerups.clear();
        self.effects.clear();
        self.schedule.clear();
        self.camera = Camera::default();
        self.score = 0;
        self.steps = 0;
        self.last_shark_tick = self.time_ticks;
        self.last_powerup_tick = self.time_ticks;
        self.last_powerup = None;
        self.falling = None;

        let first_shark = self.time_ticks + secs_to_ticks(self.tuning.sharks.first_spawn_secs);
        self.schedule.schedule(TimerKind::FirstShark, first_shark);

        log::info!("Run {} started (seed {})", self.run, self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Credit points and platform steps, tracking the best score
    pub fn add_score(&mut self, points: u64, steps: u64) {
        self.score += points;
        self.steps += steps;
        if points > 0 {
            self.events.push(GameEvent::Scored { points, steps });
        }
        if self.score > self.best_score {
            self.best_score = self.score;
            self.events.push(GameEvent::NewBest { score: self.score });
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.run, 1);
        assert_eq!(state.field.len(), 1);
        assert_eq!(state.countdown.remaining_ticks, 1800);
        assert!(state.schedule.is_pending(TimerKind::FirstShark));
        assert!(state.player.on_ground);
    }

    #[test]
    fn test_add_score_tracks_best() {
        let mut state = GameState::new(1);
        state.best_score = 10;
        state.add_score(5, 1);
        assert_eq!(state.best_score, 10);
        state.add_score(10, 2);
        assert_eq!(state.score, 15);
        assert_eq!(state.steps, 3);
        assert_eq!(state.best_score, 15);
        assert!(state.events.contains(&GameEvent::NewBest { score: 15 }));
    }

    #[test]
    fn test_countdown() {
        let mut c = Countdown::new(1.0);
        assert_eq!(c.remaining_ticks, 60);
        c.set_remaining_secs(0.01);
        assert_eq!(c.remaining_ticks, 1);
        assert!(c.tick());
        assert!(c.tick());
    }

    #[test]
    fn test_camera_clamps_left() {
        let mut cam = Camera::default();
        cam.follow(Vec2::new(-500.0, 40.0), 0.1);
        assert_eq!(cam.pos.x, 0.0);
        assert!((cam.pos.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_splash_particles_die_out() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut anim = FallingAnimation {
            started_at: 0,
            duration_ticks: 180,
            cause: FallCause::Gap,
            particles: Vec::new(),
        };
        anim.splash(100.0, 370.0, &mut rng);
        assert_eq!(anim.particles.len(), SPLASH_BURST);
        for _ in 0..60 {
            anim.update_particles();
        }
        assert!(anim.particles.is_empty());
        assert_eq!(anim.progress(90), 0.5);
    }
}
