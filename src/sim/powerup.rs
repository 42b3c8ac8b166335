//! Floating pickups and the buffs they grant

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::schedule::TimerKind;
use crate::tuning::PowerUpTuning;

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Player grows for a while
    Grow,
    /// Invincibility
    Speed,
    /// Flight
    Jump,
    /// Flat bonus points
    Score,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Grow,
        PowerUpKind::Speed,
        PowerUpKind::Jump,
        PowerUpKind::Score,
    ];

    /// Banner text shown after collection
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Grow => "Grow",
            PowerUpKind::Speed => "Invincible",
            PowerUpKind::Jump => "Flight",
            PowerUpKind::Score => "Bonus Score",
        }
    }

    /// Expiry timer owned by this kind (score is instant)
    pub fn timer(&self) -> Option<TimerKind> {
        match self {
            PowerUpKind::Grow => Some(TimerKind::GrowExpiry),
            PowerUpKind::Speed => Some(TimerKind::InvincibilityExpiry),
            PowerUpKind::Jump => Some(TimerKind::FlightExpiry),
            PowerUpKind::Score => None,
        }
    }
}

/// A pickup drifting through the sky
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    /// Centre
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub phase: f32,
    pub collected: bool,
}

impl PowerUp {
    /// Spawn a random pickup at `x`
    pub fn spawn(id: u32, x: f32, rng: &mut Pcg32, tuning: &PowerUpTuning) -> Self {
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let y = tuning.min_height + rng.random::<f32>() * (tuning.max_height - tuning.min_height);
        Self {
            id,
            kind,
            pos: Vec2::new(x, y),
            size: tuning.size,
            speed: tuning.min_speed + rng.random::<f32>() * (tuning.max_speed - tuning.min_speed),
            phase: rng.random::<f32>() * std::f32::consts::TAU,
            collected: false,
        }
    }

    /// Drift left and bob
    pub fn update(&mut self, anim_time: f32) {
        self.pos.x -= self.speed;
        self.pos.y += (anim_time + self.phase).sin() * 0.5;
    }

    /// Whether a player of `player_width` centred at `player_center` touches it
    pub fn touches(&self, player_center: Vec2, player_width: f32) -> bool {
        !self.collected
            && crate::circles_overlap(self.pos, player_center, (self.size + player_width) / 2.0)
    }
}

/// One timed buff
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub active: bool,
    pub multiplier: f32,
    /// Tick at which the effect ends (None while inactive)
    pub expires_at: Option<u64>,
}

impl Default for ActiveEffect {
    fn default() -> Self {
        Self {
            active: false,
            multiplier: 1.0,
            expires_at: None,
        }
    }
}

impl ActiveEffect {
    pub fn start(&mut self, multiplier: f32, expires_at: u64) {
        self.active = true;
        self.multiplier = multiplier;
        self.expires_at = Some(expires_at);
    }

    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Ticks left before expiry
    pub fn remaining(&self, now: u64) -> u64 {
        self.expires_at.map(|t| t.saturating_sub(now)).unwrap_or(0)
    }
}

/// All buffs, one slot per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effects {
    pub grow: ActiveEffect,
    pub invincible: ActiveEffect,
    pub flight: ActiveEffect,
}

impl Effects {
    /// Immune to hazards, gaps and falling off-screen
    pub fn protected(&self) -> bool {
        self.invincible.active || self.flight.active
    }

    /// Launch multipliers from active buffs
    pub fn launch_boost(&self) -> super::player::LaunchBoost {
        super::player::LaunchBoost {
            horizontal: if self.invincible.active {
                self.invincible.multiplier
            } else {
                1.0
            },
            vertical: if self.flight.active {
                self.flight.multiplier
            } else {
                1.0
            },
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_within_bounds() {
        let tuning = PowerUpTuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for id in 0..50 {
            let p = PowerUp::spawn(id, 850.0, &mut rng, &tuning);
            assert!(p.pos.y >= 100.0 && p.pos.y <= 300.0);
            assert!(p.speed >= 1.0 && p.speed <= 2.0);
            assert!(!p.collected);
        }
    }

    #[test]
    fn test_update_drifts_left() {
        let tuning = PowerUpTuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut p = PowerUp::spawn(1, 500.0, &mut rng, &tuning);
        p.update(0.0);
        assert!(p.pos.x < 500.0);
    }

    #[test]
    fn test_touch_uses_combined_size() {
        let tuning = PowerUpTuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut p = PowerUp::spawn(1, 500.0, &mut rng, &tuning);
        let near = p.pos + Vec2::new(24.0, 0.0);
        let far = p.pos + Vec2::new(26.0, 0.0);
        assert!(p.touches(near, 30.0));
        assert!(!p.touches(far, 30.0));
        p.collected = true;
        assert!(!p.touches(p.pos, 30.0));
    }

    #[test]
    fn test_effect_lifecycle() {
        let mut e = ActiveEffect::default();
        e.start(1.5, 400);
        assert!(e.active);
        assert_eq!(e.remaining(100), 300);
        e.stop();
        assert!(!e.active);
        assert_eq!(e.multiplier, 1.0);
        assert_eq!(e.remaining(100), 0);
    }

    #[test]
    fn test_protected_and_boost() {
        let mut fx = Effects::default();
        assert!(!fx.protected());
        fx.invincible.start(2.0, 10);
        assert!(fx.protected());
        assert_eq!(fx.launch_boost().horizontal, 2.0);
        assert_eq!(fx.launch_boost().vertical, 1.0);
    }
}
