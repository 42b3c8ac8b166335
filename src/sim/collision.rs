//! Landing resolution against the platform chain
//!
//! Decides each tick whether the player is airborne, standing on a platform, or has
//! dropped into a gap, and turns forward progress into score.

use rand_pcg::Pcg32;

use super::platforms::PlatformField;
use super::player::Player;
use crate::tuning::{PlatformTuning, WorldTuning};

/// A successful landing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    /// Index of the platform landed on
    pub index: usize,
    /// Platforms advanced since the previous landing (0 when re-landing)
    pub skipped: usize,
    /// Points earned by this landing
    pub points: u64,
}

impl Landing {
    pub fn is_new_platform(&self) -> bool {
        self.skipped > 0
    }
}

/// Where the player stands after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Airborne,
    Landed(Landing),
    /// Feet at ground level with no platform underneath
    InGap,
}

/// Settle the player against the platforms for this tick
///
/// Extends the chain first, then lands the player on the first platform under a
/// descending or resting footprint. Flight suppresses landing entirely.
pub fn resolve_landing(
    field: &mut PlatformField,
    player: &mut Player,
    rng: &mut Pcg32,
    world: &WorldTuning,
    tuning: &PlatformTuning,
) -> Contact {
    assert!(!field.is_empty(), "platform chain must never be empty");
    field.ensure_ahead(player.pos.x, rng, tuning);

    if player.flying {
        return Contact::Airborne;
    }

    let Some(index) = find_landing(field, player, world) else {
        return if in_gap(field, player) {
            Contact::InGap
        } else {
            Contact::Airborne
        };
    };

    player.land_on(&field.platforms()[index]);

    let skipped = field.mark_landed(index);
    if skipped > 0 && index + tuning.regenerate_below >= field.len() {
        log::debug!("Landed on {index} of {}, topping up", field.len());
        field.generate_batch(rng, tuning);
    }

    Contact::Landed(Landing {
        index,
        skipped,
        points: skipped as u64 * tuning.points_per_platform,
    })
}

/// Index of the first platform the player would land on, if any
pub fn find_landing(field: &PlatformField, player: &Player, world: &WorldTuning) -> Option<usize> {
    if player.vel.y < 0.0 {
        return None;
    }
    let feet = player.feet();
    field.platforms().iter().position(|p| {
        p.overlaps_x(player.pos.x, player.right())
            && feet >= p.top()
            && feet <= p.top() + p.height + world.landing_tolerance
    })
}

/// Feet at ground level with nothing underneath
pub fn in_gap(field: &PlatformField, player: &Player) -> bool {
    if player.feet() < field.ground_y() {
        return false;
    }
    !field
        .platforms()
        .iter()
        .any(|p| p.overlaps_x(player.pos.x, player.right()))
}

/// Whether the player is currently standing on some platform
pub fn on_platform(field: &PlatformField, player: &Player, world: &WorldTuning) -> bool {
    player.on_ground && find_landing(field, player, world).is_some()
}
