//! Tide Hop - A charge-and-jump platform runner over shark-infested water
//!
//! Core modules:
//! - `sim`: Deterministic simulation (platforms, player, sharks, power-ups, game state)
//! - `render`: Per-tick snapshot handed to an external renderer
//! - `input`: Press/move/release intents buffered between ticks
//! - `persistence`: Best score storage
//! - `audio`, `platform`: Sound cues and device vibration
//! - `tuning`: Data-driven game balance
//! - `game`: Shell that wires the simulation to audio, haptics and storage

pub mod audio;
pub mod game;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Animation clock advance per tick (drives bobbing and wobble phases)
    pub const ANIM_STEP: f32 = 0.05;
}

/// Convert a duration in seconds to whole simulation ticks (rounded up)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::SIM_HZ as f32).ceil() as u64
}

/// Convert a tick count back to seconds (render boundary only)
#[inline]
pub fn ticks_to_secs(ticks: u64) -> f32 {
    ticks as f32 * consts::SIM_DT
}

/// Euclidean overlap test between two circles
#[inline]
pub fn circles_overlap(a: Vec2, b: Vec2, combined_radius: f32) -> bool {
    a.distance(b) < combined_radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks_rounds_up() {
        assert_eq!(secs_to_ticks(30.0), 1800);
        assert_eq!(secs_to_ticks(0.01), 1);
        assert_eq!(secs_to_ticks(0.0), 0);
        assert_eq!(secs_to_ticks(-2.0), 0);
        assert!((ticks_to_secs(90) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.1));
        assert!(!circles_overlap(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
    }
}
