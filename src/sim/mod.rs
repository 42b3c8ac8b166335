//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod platforms;
pub mod player;
pub mod powerup;
pub mod schedule;
pub mod shark;
pub mod state;
pub mod tick;

pub use autopilot::predict_landing_x;
pub use collision::{Contact, Landing, resolve_landing};
pub use platforms::{Platform, PlatformField, PlatformKind};
pub use player::{LaunchBoost, Motion, Player};
pub use powerup::{ActiveEffect, Effects, PowerUp, PowerUpKind};
pub use schedule::{Schedule, TimerKind};
pub use shark::{Shark, SharkState};
pub use state::{
    Camera, Countdown, FallCause, FallingAnimation, GameEvent, GamePhase, GameState, Particle,
};
pub use tick::{TickInput, apply_powerup, enter_falling, tick};
