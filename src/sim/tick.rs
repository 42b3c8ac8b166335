//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::autopilot;
use super::collision::{self, Contact};
use super::powerup::{PowerUp, PowerUpKind};
use super::schedule::TimerKind;
use super::shark::Shark;
use super::state::{
    FallCause, FallingAnimation, GameEvent, GamePhase, GameState, MAX_SPLASH_PARTICLES,
};
use crate::consts::ANIM_STEP;
use crate::secs_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Pointer went down: begin charging, or restart after game over
    pub press: bool,
    /// Pointer moves while held; each one adds an extra charge step
    pub moves: u32,
    /// Pointer released: jump
    pub release: bool,
    /// Gesture cancelled: drop the charge
    pub cancel: bool,
    /// Autopilot plays the game
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    match state.phase {
        GamePhase::Playing => tick_playing(state, input),
        GamePhase::Falling => tick_falling(state),
        GamePhase::GameOver => {
            if input.press {
                state.restart();
            }
        }
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput) {
    // Time expiry is never suppressed
    if state.countdown.tick() {
        enter_falling(state, FallCause::TimeUp);
        return;
    }

    run_timers(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.autopilot {
        autopilot::drive(state)
    } else {
        input.clone()
    };
    apply_intents(state, &input);

    state.anim_time += ANIM_STEP;
    if state.touching && state.player.charging {
        state.player.charge(&state.tuning.player);
    }

    let was_jumping = state.player.jumping;
    let ground_y = state.tuning.world.ground_y();
    state.player.step(&state.tuning.player, ground_y);

    update_camera(state);
    update_sharks(state);
    update_powerups(state);

    let contact = collision::resolve_landing(
        &mut state.field,
        &mut state.player,
        &mut state.rng,
        &state.tuning.world,
        &state.tuning.platforms,
    );

    let in_gap = match contact {
        Contact::Landed(landing) => {
            if was_jumping {
                state.events.push(GameEvent::Landed {
                    index: landing.index,
                });
            }
            if landing.is_new_platform() {
                state.add_score(landing.points, landing.skipped as u64);
            }
            false
        }
        Contact::InGap => true,
        Contact::Airborne => false,
    };

    if state.effects.protected() {
        return;
    }

    let center = state.player.center();
    let radius = state.player.hit_radius();
    if state.sharks.iter().any(|s| s.hits(center, radius)) {
        enter_falling(state, FallCause::Hazard);
    } else if in_gap {
        enter_falling(state, FallCause::Gap);
    } else if off_screen(state) {
        enter_falling(state, FallCause::OffScreen);
    }
}

/// Apply buffered intents in order: press, moves, release, cancel
fn apply_intents(state: &mut GameState, input: &TickInput) {
    if input.press && state.player.start_charging(&state.tuning.player) {
        state.touching = true;
    }

    if state.touching {
        for _ in 0..input.moves {
            state.player.charge(&state.tuning.player);
        }
    }

    if input.release {
        if state.touching {
            let power = state.player.jump_power;
            let boost = state.effects.launch_boost();
            if state.player.jump(&state.tuning.player, boost).is_some() {
                state.events.push(GameEvent::Jumped { power });
            } else {
                state.player.cancel_charge();
            }
        }
        state.touching = false;
    }

    if input.cancel {
        state.touching = false;
        state.player.cancel_charge();
    }
}

fn run_timers(state: &mut GameState) {
    while let Some(kind) = state.schedule.pop_due(state.time_ticks) {
        match kind {
            TimerKind::GrowExpiry => {
                state.player.resize(Vec2::splat(state.base_size));
                state.effects.grow.stop();
                expired(state, PowerUpKind::Grow);
            }
            TimerKind::InvincibilityExpiry => {
                state.effects.invincible.stop();
                expired(state, PowerUpKind::Speed);
                safety_check(state);
            }
            TimerKind::FlightExpiry => {
                state.effects.flight.stop();
                expired(state, PowerUpKind::Jump);
                land_after_flight(state);
            }
            TimerKind::FirstShark => spawn_shark(state),
            TimerKind::FallingDone => {}
        }

        if state.phase != GamePhase::Playing {
            break;
        }
    }
}

fn expired(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("{} wore off", kind.label());
    state.events.push(GameEvent::EffectExpired { kind });
}

/// Apply a collected power-up
///
/// Timed kinds (re)start their own timer, so collecting one that is already running
/// restarts its duration instead of extending it.
pub fn apply_powerup(state: &mut GameState, kind: PowerUpKind) {
    let now = state.time_ticks;
    let tuning = &state.tuning.powerups;

    match kind {
        PowerUpKind::Grow => {
            let factor = tuning.grow_factor;
            let due = now + secs_to_ticks(tuning.grow_secs);
            let size = (state.player.size * factor).min(Vec2::splat(tuning.grow_cap));
            state.player.resize(size);
            state.effects.grow.start(factor, due);
            state.schedule.schedule(TimerKind::GrowExpiry, due);
        }
        PowerUpKind::Speed => {
            let multiplier = tuning.speed_multiplier;
            let due = now + secs_to_ticks(tuning.invincibility_secs);
            state.effects.invincible.start(multiplier, due);
            state.schedule.schedule(TimerKind::InvincibilityExpiry, due);
        }
        PowerUpKind::Jump => {
            let multiplier = tuning.jump_multiplier;
            let due = now + secs_to_ticks(tuning.flight_secs);
            state.effects.flight.start(multiplier, due);
            state.schedule.schedule(TimerKind::FlightExpiry, due);
            state.player.start_flying(&state.tuning.player);
            state.touching = false;
        }
        PowerUpKind::Score => {
            let bonus = tuning.score_bonus;
            state.add_score(bonus, 0);
        }
    }

    log::debug!("Collected {} at tick {}", kind.label(), now);
    state.last_powerup = Some((kind, now));
    state.events.push(GameEvent::PowerUpCollected { kind });
}

/// End the run unless the player is somewhere safe
///
/// Runs when invincibility (or the post-flight grace period) runs out.
fn safety_check(state: &mut GameState) {
    let airborne = state.player.is_airborne();
    let in_gap = collision::in_gap(&state.field, &state.player);
    let on_platform = collision::on_platform(&state.field, &state.player, &state.tuning.world);

    if in_gap || off_screen(state) || (!on_platform && !airborne) {
        enter_falling(state, FallCause::UnsafeLanding);
    }
}

/// Put the player down on the nearest platform once flight ends
fn land_after_flight(state: &mut GameState) {
    state.player.end_flying();

    let origin = state.player.pos;
    let search_back = state.tuning.powerups.landing_search_back;
    let nearest = state
        .field
        .platforms()
        .iter()
        .filter(|p| p.left() - origin.x >= -search_back)
        .min_by(|a, b| a.pos.distance(origin).total_cmp(&b.pos.distance(origin)))
        .cloned();

    match nearest {
        Some(platform) => {
            state.player.pos.x = platform.center_x();
            state.player.cancel_charge();
            state.player.land_on(&platform);
            log::debug!("Flight over, set down at x={:.0}", platform.center_x());
        }
        None => {
            state.player.vel.y = 0.0;
            let due = state.time_ticks + secs_to_ticks(state.tuning.powerups.grace_secs);
            state.effects.invincible.start(1.0, due);
            state.schedule.schedule(TimerKind::InvincibilityExpiry, due);
            log::debug!("Flight over with nowhere to land, grace until tick {due}");
        }
    }
}

fn update_camera(state: &mut GameState) {
    let world = &state.tuning.world;
    let target = Vec2::new(
        state.player.pos.x - world.screen_width / 3.0,
        state.player.pos.y - world.screen_height / 2.0,
    );
    state.camera.follow(target, state.tuning.round.camera_lerp);
}

fn off_screen(state: &GameState) -> bool {
    state.player.pos.y
        > state.tuning.world.screen_height + state.camera.pos.y + state.tuning.round.offscreen_margin
}

fn spawn_shark(state: &mut GameState) {
    let x = state.camera.pos.x + state.tuning.world.screen_width + 100.0;
    let river_y = state.tuning.world.river_y();
    let depth = state.tuning.world.river_depth;
    let id = state.next_entity_id();
    let shark = Shark::spawn(id, x, river_y, depth, &mut state.rng, &state.tuning.sharks);

    log::debug!(
        "Shark {} spawned at x={:.0}{}",
        id,
        x,
        if shark.can_jump { " (jumper)" } else { "" }
    );
    state.events.push(GameEvent::SharkSpawned {
        id,
        can_jump: shark.can_jump,
    });
    state.sharks.push(shark);
}

fn update_sharks(state: &mut GameState) {
    let interval = secs_to_ticks(state.tuning.sharks.spawn_interval_secs);
    if state.time_ticks - state.last_shark_tick > interval {
        spawn_shark(state);
        state.last_shark_tick = state.time_ticks;
    }

    let anim_time = state.anim_time;
    for shark in state.sharks.iter_mut() {
        shark.update(anim_time, &mut state.rng, &state.tuning.sharks);
    }

    let cutoff = state.camera.pos.x - state.tuning.sharks.prune_margin;
    state.sharks.retain(|s| s.pos.x >= cutoff);
}

fn update_powerups(state: &mut GameState) {
    let interval = secs_to_ticks(state.tuning.powerups.spawn_interval_secs);
    if state.time_ticks - state.last_powerup_tick > interval {
        let x = state.camera.pos.x + state.tuning.world.screen_width + 50.0;
        let id = state.next_entity_id();
        let powerup = PowerUp::spawn(id, x, &mut state.rng, &state.tuning.powerups);
        state.powerups.push(powerup);
        state.last_powerup_tick = state.time_ticks;
    }

    let anim_time = state.anim_time;
    let center = state.player.center();
    let width = state.player.width();
    let mut collected = Vec::new();
    for powerup in state.powerups.iter_mut() {
        powerup.update(anim_time);
        if powerup.touches(center, width) {
            powerup.collected = true;
            collected.push(powerup.kind);
        }
    }

    let cutoff = state.camera.pos.x - state.tuning.powerups.prune_margin;
    state.powerups.retain(|p| !p.collected && p.pos.x >= cutoff);

    for kind in collected {
        apply_powerup(state, kind);
    }
}

/// Leave `Playing` for the falling animation
pub fn enter_falling(state: &mut GameState, cause: FallCause) {
    if state.phase != GamePhase::Playing {
        return;
    }

    log::info!(
        "Run {} fell ({:?}) with score {} after {} steps",
        state.run,
        cause,
        state.score,
        state.steps
    );

    state.phase = GamePhase::Falling;
    state.touching = false;
    state.effects.clear();
    state.schedule.clear();

    let player = &mut state.player;
    player.cancel_charge();
    player.flying = false;
    player.on_ground = false;
    player.jumping = true;
    player.vel = Vec2::new(0.0, 2.0);

    let now = state.time_ticks;
    let duration_ticks = secs_to_ticks(state.tuning.round.fall_secs);
    let mut animation = FallingAnimation {
        started_at: now,
        duration_ticks,
        cause,
        particles: Vec::new(),
    };
    animation.splash(
        state.player.center().x,
        state.tuning.world.river_y(),
        &mut state.rng,
    );
    state.falling = Some(animation);
    state.schedule.schedule(TimerKind::FallingDone, now + duration_ticks);
    state.events.push(GameEvent::FallStarted { cause });
}

fn tick_falling(state: &mut GameState) {
    state.anim_time += ANIM_STEP;
    state.player.fall_step(&state.tuning.player);
    state.camera.decay_shake();

    let water_y = state.tuning.world.river_y();
    if let Some(animation) = state.falling.as_mut() {
        if state.player.feet() >= water_y && animation.particles.len() < MAX_SPLASH_PARTICLES {
            animation.splash(state.player.center().x, water_y, &mut state.rng);
            state.camera.shake = 10.0;
        }
        animation.update_particles();
    }

    while let Some(kind) = state.schedule.pop_due(state.time_ticks) {
        if kind == TimerKind::FallingDone {
            finish_game_over(state);
            break;
        }
    }
}

fn finish_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.falling = None;
    state.schedule.clear();
    state.camera.shake = 0.0;

    log::info!(
        "Game over: score {} ({} steps), best {}",
        state.score,
        state.steps,
        state.best_score
    );
    state.events.push(GameEvent::GameOver {
        score: state.score,
        steps: state.steps,
    });
}
