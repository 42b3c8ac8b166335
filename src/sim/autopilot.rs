//! Autopilot: plays the game for demo mode and headless runs
//!
//! Charges while standing and lets go once the predicted touchdown would put the player
//! on the next platform.

use super::platforms::Platform;
use super::player::{LaunchBoost, Motion, Player};
use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use crate::tuning::PlayerTuning;

/// Upper bound on simulated flight length
const MAX_FLIGHT_TICKS: u32 = 1_000;

/// Left edge of the player when it touches the ground line after a jump at `power`
///
/// Runs the same integration as the live player, so the answer is exact for an
/// unobstructed arc.
pub fn predict_landing_x(
    player: &Player,
    power: f32,
    boost: LaunchBoost,
    tuning: &PlayerTuning,
    ground_y: f32,
) -> f32 {
    let mut ghost = player.clone();
    ghost.on_ground = true;
    ghost.jumping = false;
    ghost.flying = false;
    ghost.charging = true;
    ghost.jump_power = power;
    if ghost.jump(tuning, boost).is_none() {
        return player.pos.x;
    }

    for _ in 0..MAX_FLIGHT_TICKS {
        if ghost.step(tuning, ground_y) == Motion::TouchedGround {
            break;
        }
    }
    ghost.pos.x
}

/// Input the autopilot would give this tick
pub fn drive(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    let player = &state.player;
    if state.phase != GamePhase::Playing || player.is_airborne() || !player.on_ground {
        return input;
    }

    if !state.touching {
        input.press = true;
        return input;
    }

    let tuning = &state.tuning.player;
    let Some(target) = next_platform(state) else {
        input.release = true;
        return input;
    };

    let predicted = predict_landing_x(
        player,
        player.jump_power,
        state.effects.launch_boost(),
        tuning,
        state.tuning.world.ground_y(),
    );
    // Aim to centre the player on the target
    let aim = target.center_x() - player.width() / 2.0;
    if predicted >= aim || player.jump_power >= tuning.max_power {
        input.release = true;
    }
    input
}

/// First platform entirely ahead of the player
fn next_platform(state: &GameState) -> Option<&Platform> {
    let right = state.player.right();
    state.field.platforms().iter().find(|p| p.left() > right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::tick;

    #[test]
    fn test_prediction_matches_live_jump() {
        let tuning = PlayerTuning::default();
        let ground = 350.0;
        let mut player = Player::new(&tuning, ground);
        let predicted = predict_landing_x(&player, 12.0, LaunchBoost::default(), &tuning, ground);

        player.start_charging(&tuning);
        player.jump_power = 12.0;
        player.jump(&tuning, LaunchBoost::default()).unwrap();
        while player.step(&tuning, ground) == Motion::Moving {}
        assert_eq!(player.pos.x, predicted);
    }

    #[test]
    fn test_more_power_goes_further() {
        let tuning = PlayerTuning::default();
        let player = Player::new(&tuning, 350.0);
        let mut last = player.pos.x;
        for step in 0..=30 {
            let power = tuning.min_power + step as f32 * tuning.charge_step;
            let x = predict_landing_x(&player, power, LaunchBoost::default(), &tuning, 350.0);
            assert!(x > last);
            last = x;
        }
    }

    #[test]
    fn test_presses_when_idle_on_ground() {
        let state = GameState::new(1);
        assert!(drive(&state).press);
    }

    #[test]
    fn test_does_nothing_mid_air() {
        let mut state = GameState::new(1);
        state.player.jumping = true;
        state.player.on_ground = false;
        assert_eq!(drive(&state), TickInput::default());
    }

    #[test]
    fn test_autopilot_makes_progress() {
        let mut state = GameState::new(4);
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &auto);
            if state.steps > 0 {
                break;
            }
        }
        assert!(state.steps > 0);
        assert_eq!(state.score, state.steps * 5);
    }
}
