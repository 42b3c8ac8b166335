//! Data-driven game balance
//!
//! Every number that shapes a run lives here so a JSON document can rebalance the game
//! without touching the simulation. Sections default individually, so a partial
//! document only overrides what it names.

use serde::{Deserialize, Serialize};

/// Error loading a tuning document
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read tuning: {e}"),
            Self::Parse(e) => write!(f, "invalid tuning document: {e}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// A weighted uniform range: picked when the roll is below `until` (cumulative)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Cumulative probability ceiling for this band
    pub until: f32,
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(until: f32, min: f32, max: f32) -> Self {
        Self { until, min, max }
    }
}

/// Pick the band matching `roll` (falls back to the last band)
pub fn pick_band(bands: &[Band], roll: f32) -> Option<&Band> {
    bands.iter().find(|b| roll < b.until).or_else(|| bands.last())
}

/// Screen and world geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Distance from the bottom of the screen to the ground line
    pub ground_offset: f32,
    pub platform_height: f32,
    /// Extra depth below a platform top that still counts as landing on it
    pub landing_tolerance: f32,
    pub river_depth: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 450.0,
            ground_offset: 100.0,
            platform_height: 20.0,
            landing_tolerance: 5.0,
            river_depth: 80.0,
        }
    }
}

impl WorldTuning {
    /// Y of the ground line (top of every platform)
    pub fn ground_y(&self) -> f32 {
        self.screen_height - self.ground_offset
    }

    /// Y where the river surface starts (below the platforms)
    pub fn river_y(&self) -> f32 {
        self.ground_y() + self.platform_height
    }

    /// Bottom of the river
    pub fn river_bottom(&self) -> f32 {
        self.river_y() + self.river_depth
    }
}

/// Platform generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    pub batch_size: usize,
    /// Horizontal reach that must exist beyond the player
    pub lookahead: f32,
    /// Generate another batch when landing leaves fewer than this many platforms ahead
    pub regenerate_below: usize,
    pub gap_bands: Vec<Band>,
    pub width_bands: Vec<Band>,
    pub bonus_chance: f32,
    pub special_chance: f32,
    pub difficulty_step: f32,
    /// Gap growth per difficulty level above 1
    pub gap_factor: f32,
    pub points_per_platform: u64,
    pub start_x: f32,
    pub start_width: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            batch_size: 12,
            lookahead: 500.0,
            regenerate_below: 8,
            gap_bands: vec![
                Band::new(0.3, 30.0, 70.0),
                Band::new(0.6, 60.0, 110.0),
                Band::new(0.85, 100.0, 160.0),
                Band::new(1.0, 150.0, 200.0),
            ],
            width_bands: vec![
                Band::new(0.2, 35.0, 55.0),
                Band::new(0.7, 50.0, 80.0),
                Band::new(1.0, 75.0, 110.0),
            ],
            bonus_chance: 0.08,
            special_chance: 0.10,
            difficulty_step: 0.1,
            gap_factor: 0.1,
            points_per_platform: 5,
            start_x: 20.0,
            start_width: 80.0,
        }
    }
}

/// Player physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    pub start_x: f32,
    pub gravity: f32,
    pub min_power: f32,
    pub max_power: f32,
    pub charge_step: f32,
    pub horizontal_ratio: f32,
    pub vertical_ratio: f32,
    pub flight_drift: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            start_x: 50.0,
            gravity: 0.6,
            min_power: 5.0,
            max_power: 20.0,
            charge_step: 0.5,
            horizontal_ratio: 0.8,
            vertical_ratio: 0.7,
            flight_drift: 3.0,
        }
    }
}

/// Shark spawning and behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SharkTuning {
    pub spawn_interval_secs: f32,
    pub first_spawn_secs: f32,
    pub jumper_chance: f32,
    pub size: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub jump_impulse: f32,
    pub jump_gravity: f32,
    pub jump_after_ticks: u32,
    pub jump_chance: f32,
    pub jaw_cooldown_ticks: u32,
    pub jaw_chance: f32,
    pub transition_ticks: u32,
    pub surface_hold_ticks: u32,
    pub prune_margin: f32,
}

impl Default for SharkTuning {
    fn default() -> Self {
        Self {
            spawn_interval_secs: 8.0,
            first_spawn_secs: 1.0,
            jumper_chance: 0.2,
            size: 40.0,
            min_speed: 1.5,
            max_speed: 2.5,
            jump_impulse: -8.0,
            jump_gravity: 0.4,
            jump_after_ticks: 120,
            jump_chance: 0.08,
            jaw_cooldown_ticks: 60,
            jaw_chance: 0.02,
            transition_ticks: 60,
            surface_hold_ticks: 90,
            prune_margin: 200.0,
        }
    }
}

/// Power-up spawning and effects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub spawn_interval_secs: f32,
    pub size: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub grow_factor: f32,
    pub grow_cap: f32,
    pub grow_secs: f32,
    pub invincibility_secs: f32,
    pub flight_secs: f32,
    pub grace_secs: f32,
    pub score_bonus: u64,
    /// How far behind the player the post-flight landing search reaches
    pub landing_search_back: f32,
    pub prune_margin: f32,
    /// Horizontal launch multiplier while invincible
    pub speed_multiplier: f32,
    /// Vertical launch multiplier while flight is active
    pub jump_multiplier: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            spawn_interval_secs: 3.0,
            size: 20.0,
            min_speed: 1.0,
            max_speed: 2.0,
            min_height: 100.0,
            max_height: 300.0,
            grow_factor: 1.5,
            grow_cap: 80.0,
            grow_secs: 5.0,
            invincibility_secs: 5.0,
            flight_secs: 2.0,
            grace_secs: 3.0,
            score_bonus: 50,
            landing_search_back: 200.0,
            prune_margin: 100.0,
            speed_multiplier: 1.0,
            jump_multiplier: 1.0,
        }
    }
}

/// Round timing and camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub countdown_secs: f32,
    pub fall_secs: f32,
    pub offscreen_margin: f32,
    pub camera_lerp: f32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            countdown_secs: 30.0,
            fall_secs: 3.0,
            offscreen_margin: 200.0,
            camera_lerp: 0.1,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub platforms: PlatformTuning,
    pub player: PlayerTuning,
    pub sharks: SharkTuning,
    pub powerups: PowerUpTuning,
    pub round: RoundTuning,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tuning document from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
