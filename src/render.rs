//! Per-tick snapshot for an external renderer
//!
//! The core draws nothing. [`RenderFrame::capture`] copies out everything a renderer
//! needs (world positions, categories, HUD values) as plain serializable data.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_HZ;
use crate::sim::{GamePhase, GameState, Particle, PlatformKind, PowerUpKind, SharkState};

/// How long the power-up name stays on screen
pub const BANNER_TICKS: u64 = 2 * SIM_HZ as u64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub charging: bool,
    pub flying: bool,
    /// Power meter fill in [0, 1]
    pub charge: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformView {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharkView {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub direction: f32,
    pub state: SharkState,
    pub jaw_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: f32,
}

/// An active buff and how long it has left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuffView {
    pub kind: PowerUpKind,
    pub remaining_secs: f32,
}

/// Scalar HUD state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub steps: u64,
    pub best_score: u64,
    /// Countdown in whole seconds (rounded up)
    pub remaining_secs: u64,
    pub buffs: Vec<BuffView>,
    /// Recently collected power-up to announce
    pub banner: Option<PowerUpKind>,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    pub tick: u64,
    pub phase: GamePhase,
    pub camera: Vec2,
    pub shake: f32,
    pub ground_y: f32,
    pub river_y: f32,
    pub river_bottom: f32,
    pub player: PlayerView,
    pub platforms: Vec<PlatformView>,
    pub sharks: Vec<SharkView>,
    pub powerups: Vec<PowerUpView>,
    pub particles: Vec<Particle>,
    pub hud: Hud,
    /// Falling animation progress in [0, 1] while falling
    pub fall_progress: Option<f32>,
}

impl RenderFrame {
    /// Snapshot the state for drawing
    ///
    /// Platforms are culled to the camera's horizontal view; every shark and uncollected
    /// power-up is passed through.
    pub fn capture(state: &GameState) -> Self {
        let world = &state.tuning.world;
        let view_left = state.camera.pos.x;
        let view_right = view_left + world.screen_width;
        let now = state.time_ticks;

        let platforms = state
            .field
            .platforms()
            .iter()
            .filter(|p| p.overlaps_x(view_left, view_right))
            .map(|p| PlatformView {
                pos: p.pos,
                width: p.width,
                height: p.height,
                kind: p.kind,
            })
            .collect();

        let sharks = state
            .sharks
            .iter()
            .map(|s| SharkView {
                id: s.id,
                pos: s.pos,
                size: s.size,
                direction: s.direction,
                state: s.state,
                jaw_open: s.jaw_open,
            })
            .collect();

        let powerups = state
            .powerups
            .iter()
            .filter(|p| !p.collected)
            .map(|p| PowerUpView {
                id: p.id,
                kind: p.kind,
                pos: p.pos,
                size: p.size,
            })
            .collect();

        let effects = &state.effects;
        let buffs = [
            (PowerUpKind::Grow, &effects.grow),
            (PowerUpKind::Speed, &effects.invincible),
            (PowerUpKind::Jump, &effects.flight),
        ]
        .into_iter()
        .filter(|(_, e)| e.active)
        .map(|(kind, e)| BuffView {
            kind,
            remaining_secs: crate::ticks_to_secs(e.remaining(now)),
        })
        .collect();

        let banner = state
            .last_powerup
            .filter(|(_, at)| now.saturating_sub(*at) < BANNER_TICKS)
            .map(|(kind, _)| kind);

        let player = &state.player;
        Self {
            tick: now,
            phase: state.phase,
            camera: state.camera.pos,
            shake: state.camera.shake,
            ground_y: world.ground_y(),
            river_y: world.river_y(),
            river_bottom: world.river_bottom(),
            player: PlayerView {
                pos: player.pos,
                size: player.size,
                charging: player.charging,
                flying: player.flying,
                charge: player.charge_ratio(&state.tuning.player),
            },
            platforms,
            sharks,
            powerups,
            particles: state
                .falling
                .as_ref()
                .map(|f| f.particles.clone())
                .unwrap_or_default(),
            hud: Hud {
                score: state.score,
                steps: state.steps,
                best_score: state.best_score,
                remaining_secs: state.countdown.remaining_ticks.div_ceil(SIM_HZ as u64),
                buffs,
                banner,
            },
            fall_progress: state.falling.as_ref().map(|f| f.progress(now)),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{TickInput, apply_powerup, tick};

    #[test]
    fn test_fresh_frame() {
        let mut state = GameState::new(12);
        tick(&mut state, &TickInput::default());
        let frame = RenderFrame::capture(&state);

        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(frame.hud.remaining_secs, 30);
        assert_eq!(frame.platforms[0].kind, PlatformKind::Start);
        assert!(frame.platforms.len() < state.field.len());
        let view_right = frame.camera.x + 800.0;
        assert!(frame.platforms.iter().all(|p| p.pos.x < view_right));
        assert!(frame.particles.is_empty());
        assert!(frame.fall_progress.is_none());
        assert_eq!(frame.ground_y, 350.0);
    }

    #[test]
    fn test_buffs_and_banner() {
        let mut state = GameState::new(12);
        apply_powerup(&mut state, PowerUpKind::Speed);
        let frame = RenderFrame::capture(&state);
        assert_eq!(frame.hud.buffs.len(), 1);
        assert_eq!(frame.hud.buffs[0].kind, PowerUpKind::Speed);
        assert!((frame.hud.buffs[0].remaining_secs - 5.0).abs() < 1e-3);
        assert_eq!(frame.hud.banner, Some(PowerUpKind::Speed));

        state.time_ticks += BANNER_TICKS;
        assert_eq!(RenderFrame::capture(&state).hud.banner, None);
    }

    #[test]
    fn test_frame_serializes() {
        let state = GameState::new(12);
        let json = RenderFrame::capture(&state).to_json().unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
