//! Shark hazards
//!
//! Sharks enter from the right edge and swim left through the river. Jump-capable
//! sharks occasionally leap out of the water in a ballistic arc and always splash back
//! down exactly on their baseline. The surfacing cycle (surfacing -> surface -> diving)
//! is fully modelled but nothing in the spawn logic enters it yet; see
//! [`Shark::begin_surfacing`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::SharkTuning;

/// Behavioural state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharkState {
    Swimming,
    Jumping,
    Surfacing,
    Surface,
    Diving,
}

/// A shark entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shark {
    pub id: u32,
    /// Centre of the shark
    pub pos: Vec2,
    /// Cruising depth
    pub base_y: f32,
    /// Depth used by the surfacing cycle
    pub surface_y: f32,
    pub size: f32,
    pub speed: f32,
    /// -1 swims left, +1 swims right
    pub direction: f32,
    /// Random phase for bobbing
    pub phase: f32,
    pub state: SharkState,
    /// Ticks spent in the current state
    pub state_ticks: u32,
    pub jaw_open: bool,
    pub jaw_ticks: u32,
    pub can_jump: bool,
    /// Vertical velocity while jumping
    pub jump_vel: f32,
}

impl Shark {
    /// Spawn a shark at `x` in the river that starts at `river_y`
    pub fn spawn(
        id: u32,
        x: f32,
        river_y: f32,
        river_depth: f32,
        rng: &mut Pcg32,
        tuning: &SharkTuning,
    ) -> Self {
        let base_y = river_y + river_depth * 0.7;
        let can_jump = rng.random::<f32>() < tuning.jumper_chance;
        Self {
            id,
            pos: Vec2::new(x, base_y),
            base_y,
            surface_y: river_y + 10.0,
            size: tuning.size,
            speed: tuning.min_speed + rng.random::<f32>() * (tuning.max_speed - tuning.min_speed),
            direction: -1.0,
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            state: SharkState::Swimming,
            state_ticks: 0,
            jaw_open: false,
            jaw_ticks: 0,
            can_jump,
            jump_vel: 0.0,
        }
    }

    /// Enter the surfacing cycle (not triggered by the current spawn logic)
    pub fn begin_surfacing(&mut self) {
        if self.state == SharkState::Swimming {
            self.enter(SharkState::Surfacing);
        }
    }

    /// Advance one tick
    pub fn update(&mut self, anim_time: f32, rng: &mut Pcg32, tuning: &SharkTuning) {
        self.state_ticks += 1;
        self.jaw_ticks += 1;

        if self.jaw_ticks > tuning.jaw_cooldown_ticks && rng.random::<f32>() < tuning.jaw_chance {
            self.jaw_open = !self.jaw_open;
            self.jaw_ticks = 0;
        }

        let stride = self.speed * self.direction;
        match self.state {
            SharkState::Swimming => {
                self.pos.x += stride;
                self.pos.y = self.base_y + (anim_time + self.phase).sin() * 5.0;

                if self.can_jump
                    && self.state_ticks >= tuning.jump_after_ticks
                    && rng.random::<f32>() < tuning.jump_chance
                {
                    self.enter(SharkState::Jumping);
                    self.jump_vel = tuning.jump_impulse;
                    log::debug!("Shark {} leaps from y={:.0}", self.id, self.pos.y);
                }
            }
            SharkState::Jumping => {
                self.pos.x += stride * 0.8;
                self.jump_vel += tuning.jump_gravity;
                self.pos.y += self.jump_vel;

                if self.pos.y >= self.base_y {
                    self.pos.y = self.base_y;
                    self.jump_vel = 0.0;
                    self.enter(SharkState::Swimming);
                    log::debug!("Shark {} splashes down", self.id);
                }
            }
            SharkState::Surfacing => {
                self.pos.x += stride * 0.5;
                let progress = self.progress(tuning);
                self.pos.y = self.base_y + (self.surface_y - self.base_y) * progress;
                if progress >= 1.0 {
                    self.enter(SharkState::Surface);
                }
            }
            SharkState::Surface => {
                self.pos.x += stride * 0.3;
                self.pos.y = self.surface_y + (anim_time * 2.0).sin() * 3.0;
                if self.state_ticks > tuning.surface_hold_ticks {
                    self.enter(SharkState::Diving);
                }
            }
            SharkState::Diving => {
                self.pos.x += stride * 0.7;
                let progress = self.progress(tuning);
                self.pos.y = self.surface_y + (self.base_y - self.surface_y) * progress;
                if progress >= 1.0 {
                    self.enter(SharkState::Swimming);
                }
            }
        }
    }

    /// Collision radius for the current state
    pub fn hit_radius(&self) -> f32 {
        match self.state {
            SharkState::Jumping => self.size * 0.8,
            SharkState::Surface => self.size * 0.7,
            _ => self.size * 0.5,
        }
    }

    /// Whether a round body at `center` with `radius` touches this shark
    pub fn hits(&self, center: Vec2, radius: f32) -> bool {
        crate::circles_overlap(self.pos, center, self.hit_radius() + radius)
    }

    fn progress(&self, tuning: &SharkTuning) -> f32 {
        (self.state_ticks as f32 / tuning.transition_ticks.max(1) as f32).min(1.0)
    }

    fn enter(&mut self, state: SharkState) {
        self.state = state;
        self.state_ticks = 0;
    }
}
