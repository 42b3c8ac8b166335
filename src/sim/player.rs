//! Player physics: charge, jump, gravity, landing and flight
//!
//! Units are pixels and pixels/tick; gravity is applied per tick before integration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platforms::Platform;
use crate::tuning::PlayerTuning;

/// Result of advancing the player one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Still in the air (or resting without touching down this tick)
    Moving,
    /// Feet reached the ground line this tick; the resolver must look for a platform
    TouchedGround,
}

/// Launch multipliers from active buffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchBoost {
    pub horizontal: f32,
    pub vertical: f32,
}

impl Default for LaunchBoost {
    fn default() -> Self {
        Self {
            horizontal: 1.0,
            vertical: 1.0,
        }
    }
}

/// The controlled character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Width and height
    pub size: Vec2,
    pub on_ground: bool,
    pub jumping: bool,
    pub charging: bool,
    pub jump_power: f32,
    pub flying: bool,
}

impl Player {
    /// Player standing at the start position on the ground line
    pub fn new(tuning: &PlayerTuning, ground_y: f32) -> Self {
        Self {
            pos: Vec2::new(tuning.start_x, ground_y - tuning.size),
            vel: Vec2::ZERO,
            size: Vec2::splat(tuning.size),
            on_ground: true,
            jumping: false,
            charging: false,
            jump_power: 0.0,
            flying: false,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Y of the player's feet
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Radius used against round hazards
    pub fn hit_radius(&self) -> f32 {
        self.size.x.max(self.size.y) / 2.5
    }

    /// Airborne in the gameplay sense (mid-jump or flying)
    pub fn is_airborne(&self) -> bool {
        self.jumping || self.flying
    }

    /// Charge progress in [0, 1] for the power meter
    pub fn charge_ratio(&self, tuning: &PlayerTuning) -> f32 {
        let span = tuning.max_power - tuning.min_power;
        if span <= 0.0 {
            return 0.0;
        }
        ((self.jump_power - tuning.min_power) / span).clamp(0.0, 1.0)
    }

    /// Begin charging; only possible when standing and not mid-jump
    pub fn start_charging(&mut self, tuning: &PlayerTuning) -> bool {
        if self.on_ground && !self.jumping && !self.flying {
            self.charging = true;
            self.jump_power = tuning.min_power;
            true
        } else {
            false
        }
    }

    /// One charge step, capped at max power
    pub fn charge(&mut self, tuning: &PlayerTuning) {
        if self.charging && self.jump_power < tuning.max_power {
            self.jump_power = (self.jump_power + tuning.charge_step).min(tuning.max_power);
        }
    }

    pub fn cancel_charge(&mut self) {
        self.charging = false;
    }

    /// Release the charge into a rightward launch; returns the launch velocity
    pub fn jump(&mut self, tuning: &PlayerTuning, boost: LaunchBoost) -> Option<Vec2> {
        if !(self.charging && self.on_ground) {
            return None;
        }
        let horizontal = self.jump_power * tuning.horizontal_ratio * boost.horizontal;
        let vertical = self.jump_power * tuning.vertical_ratio * boost.vertical;
        self.vel = Vec2::new(horizontal, -vertical);
        self.on_ground = false;
        self.charging = false;
        self.jumping = true;
        Some(self.vel)
    }

    /// Advance one tick against the ground line
    pub fn step(&mut self, tuning: &PlayerTuning, ground_y: f32) -> Motion {
        if self.flying {
            self.vel = Vec2::new(tuning.flight_drift, 0.0);
        } else if !self.on_ground {
            self.vel.y += tuning.gravity;
        }

        self.pos += self.vel;

        if !self.flying && self.feet() >= ground_y && self.vel.y > 0.0 {
            self.pos.y = ground_y - self.size.y;
            self.settle();
            return Motion::TouchedGround;
        }
        Motion::Moving
    }

    /// Free fall used by the falling animation (ignores the ground line)
    pub fn fall_step(&mut self, tuning: &PlayerTuning) {
        self.vel.y += tuning.gravity;
        self.pos += self.vel;
    }

    /// Snap on top of a platform and come to rest
    pub fn land_on(&mut self, platform: &Platform) {
        self.pos.y = platform.top() - self.size.y;
        self.settle();
    }

    /// Enter flight: gravity off, constant forward drift
    pub fn start_flying(&mut self, tuning: &PlayerTuning) {
        self.flying = true;
        self.on_ground = false;
        self.jumping = false;
        self.charging = false;
        self.vel = Vec2::new(tuning.flight_drift, 0.0);
    }

    /// Leave flight; the caller decides where the player ends up
    pub fn end_flying(&mut self) {
        self.flying = false;
        self.vel.x = 0.0;
    }

    /// Resize around the current feet so the player stays planted
    pub fn resize(&mut self, size: Vec2) {
        let feet = self.feet();
        self.size = size;
        self.pos.y = feet - size.y;
    }

    fn settle(&mut self) {
        self.vel = Vec2::ZERO;
        self.on_ground = true;
        self.jumping = false;
        if !self.charging {
            self.jump_power = 0.0;
        }
    }
}
