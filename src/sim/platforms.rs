//! Procedural platform generation
//!
//! Platforms form one strictly increasing chain along x. The field always starts with a
//! single `Start` platform and grows in batches as the player advances; every batch
//! nudges the difficulty up, widening the gaps.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::{PlatformTuning, WorldTuning, pick_band};

/// Platform category (drives colour in the renderer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Start,
    Normal,
    Special,
    Bonus,
}

/// A single platform segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32, kind: PlatformKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
            kind,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Open-interval horizontal overlap with the span [left, right]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        right > self.left() && left < self.right()
    }
}

/// The ever-extending platform chain plus generation state
#[derive(Debug, Clone)]
pub struct PlatformField {
    platforms: Vec<Platform>,
    /// Index of the platform the player last landed on (scoring baseline)
    last_landed: usize,
    /// Difficulty level, starts at 1 and grows per batch
    difficulty: f32,
    ground_y: f32,
    platform_height: f32,
}

impl PlatformField {
    /// Fresh field holding only the start platform
    pub fn new(world: &WorldTuning, tuning: &PlatformTuning) -> Self {
        let mut field = Self {
            platforms: Vec::new(),
            last_landed: 0,
            difficulty: 1.0,
            ground_y: world.ground_y(),
            platform_height: world.platform_height,
        };
        field.reset(tuning);
        field
    }

    /// Build a field from an explicit layout (scripted courses and tests)
    pub fn from_platforms(world: &WorldTuning, platforms: Vec<Platform>) -> Self {
        assert!(!platforms.is_empty(), "platform field needs at least one platform");
        Self {
            platforms,
            last_landed: 0,
            difficulty: 1.0,
            ground_y: world.ground_y(),
            platform_height: world.platform_height,
        }
    }

    /// Back to the single start platform at difficulty 1
    pub fn reset(&mut self, tuning: &PlatformTuning) {
        self.platforms.clear();
        self.platforms.push(Platform::new(
            tuning.start_x,
            self.ground_y,
            tuning.start_width,
            self.platform_height,
            PlatformKind::Start,
        ));
        self.last_landed = 0;
        self.difficulty = 1.0;
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }

    pub fn last_landed(&self) -> usize {
        self.last_landed
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Multiplier applied to every gap drawn at the current difficulty
    pub fn gap_scale(&self, tuning: &PlatformTuning) -> f32 {
        1.0 + (self.difficulty - 1.0) * tuning.gap_factor
    }

    /// Right edge of the furthest platform
    pub fn reach(&self) -> f32 {
        self.platforms.last().map(Platform::right).unwrap_or(f32::NEG_INFINITY)
    }

    /// Make sure the chain extends at least `lookahead` past `player_x`
    ///
    /// Returns the number of platforms appended (0 when the reach already suffices).
    pub fn ensure_ahead(&mut self, player_x: f32, rng: &mut Pcg32, tuning: &PlatformTuning) -> usize {
        let before = self.platforms.len();
        let wanted = player_x + tuning.lookahead;
        while self.reach() < wanted {
            log::debug!(
                "Player at {:.0}, chain ends at {:.0}: extending",
                player_x,
                self.reach()
            );
            self.generate_batch(rng, tuning);
        }
        self.platforms.len() - before
    }

    /// Append one batch of platforms after the current last one
    pub fn generate_batch(&mut self, rng: &mut Pcg32, tuning: &PlatformTuning) {
        let gap_scale = self.gap_scale(tuning);
        let mut next_x = self.reach();

        for _ in 0..tuning.batch_size {
            let gap = pick_band(&tuning.gap_bands, rng.random::<f32>())
                .map(|b| b.min + rng.random::<f32>() * (b.max - b.min))
                .unwrap_or(0.0);
            next_x += gap * gap_scale;

            let width = pick_band(&tuning.width_bands, rng.random::<f32>())
                .map(|b| b.min + rng.random::<f32>() * (b.max - b.min))
                .unwrap_or(tuning.start_width);

            let roll = rng.random::<f32>();
            let kind = if roll < tuning.bonus_chance {
                PlatformKind::Bonus
            } else if roll < tuning.bonus_chance + tuning.special_chance {
                PlatformKind::Special
            } else {
                PlatformKind::Normal
            };

            self.platforms.push(Platform::new(
                next_x,
                self.ground_y,
                width,
                self.platform_height,
                kind,
            ));
            next_x += width;
        }

        self.difficulty += tuning.difficulty_step;
        log::info!(
            "Generated {} platforms ({} total), difficulty {:.1}",
            tuning.batch_size,
            self.platforms.len(),
            self.difficulty
        );
    }

    /// Record a landing on `index`; returns how many platforms were advanced
    ///
    /// Re-landing on the current platform (or an earlier one) advances nothing.
    pub(crate) fn mark_landed(&mut self, index: usize) -> usize {
        if index > self.last_landed {
            let skipped = index - self.last_landed;
            self.last_landed = index;
            skipped
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn field() -> (PlatformField, PlatformTuning) {
        let tuning = PlatformTuning::default();
        (PlatformField::new(&WorldTuning::default(), &tuning), tuning)
    }

    #[test]
    fn test_new_field_is_single_start_platform() {
        let (field, _) = field();
        assert_eq!(field.len(), 1);
        assert_eq!(field.platforms()[0].kind, PlatformKind::Start);
        assert_eq!(field.difficulty(), 1.0);
        assert_eq!(field.last_landed(), 0);
    }

    #[test]
    fn test_batch_appends_twelve_and_raises_difficulty() {
        let (mut field, tuning) = field();
        let mut rng = Pcg32::seed_from_u64(7);
        field.generate_batch(&mut rng, &tuning);
        assert_eq!(field.len(), 13);
        assert!((field.difficulty() - 1.1).abs() < 1e-6);
        assert!(
            field.platforms()[1..]
                .iter()
                .all(|p| p.kind != PlatformKind::Start)
        );
    }

    #[test]
    fn test_ensure_ahead_is_idempotent() {
        let (mut field, tuning) = field();
        let mut rng = Pcg32::seed_from_u64(3);
        let added = field.ensure_ahead(50.0, &mut rng, &tuning);
        assert!(added > 0);
        assert!(field.reach() >= 50.0 + tuning.lookahead);
        assert_eq!(field.ensure_ahead(50.0, &mut rng, &tuning), 0);
    }

    #[test]
    fn test_ensure_ahead_covers_long_teleport() {
        let (mut field, tuning) = field();
        let mut rng = Pcg32::seed_from_u64(11);
        field.ensure_ahead(10_000.0, &mut rng, &tuning);
        assert!(field.reach() >= 10_000.0 + tuning.lookahead);
    }

    #[test]
    fn test_reset_restores_start_state() {
        let (mut field, tuning) = field();
        let mut rng = Pcg32::seed_from_u64(5);
        field.ensure_ahead(2_000.0, &mut rng, &tuning);
        field.mark_landed(4);
        field.reset(&tuning);
        assert_eq!(field.len(), 1);
        assert_eq!(field.difficulty(), 1.0);
        assert_eq!(field.last_landed(), 0);
    }

    #[test]
    fn test_mark_landed_only_advances_forward() {
        let (mut field, tuning) = field();
        let mut rng = Pcg32::seed_from_u64(1);
        field.generate_batch(&mut rng, &tuning);
        assert_eq!(field.mark_landed(3), 3);
        assert_eq!(field.mark_landed(3), 0);
        assert_eq!(field.mark_landed(1), 0);
        assert_eq!(field.last_landed(), 3);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn platforms_never_overlap_and_gaps_stay_in_band(
                seed in 0u64..500,
                batches in 1usize..6
            ) {
                let (mut field, tuning) = field();
                let mut rng = Pcg32::seed_from_u64(seed);
                let min_gap = tuning.gap_bands.iter().map(|b| b.min).fold(f32::MAX, f32::min);
                let max_gap = tuning.gap_bands.iter().map(|b| b.max).fold(0.0, f32::max);

                for _ in 0..batches {
                    let scale = field.gap_scale(&tuning);
                    let start = field.len();
                    field.generate_batch(&mut rng, &tuning);
                    for i in start..field.len() {
                        let prev = &field.platforms()[i - 1];
                        let cur = &field.platforms()[i];
                        let gap = cur.left() - prev.right();
                        prop_assert!(cur.left() >= prev.right());
                        prop_assert!(gap >= min_gap * scale - 1e-3, "gap {} below band", gap);
                        prop_assert!(gap <= max_gap * scale + 1e-3, "gap {} above band", gap);
                    }
                }
            }

            #[test]
            fn widths_stay_in_band(seed in 0u64..500) {
                let (mut field, tuning) = field();
                let mut rng = Pcg32::seed_from_u64(seed);
                field.generate_batch(&mut rng, &tuning);
                for p in &field.platforms()[1..] {
                    prop_assert!(p.width >= 35.0 && p.width <= 110.0);
                    prop_assert_eq!(p.top(), field.ground_y());
                }
            }
        }
    }
}
