//! One probabilistic melee exchange.

use crate::dice::GameRng;
use crate::types::Combatant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub hit: bool,
    pub damage: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeOutcome {
    Missed,
    Wounded { damage: i32 },
    Killed { damage: i32 },
}

/// Hits when a uniform draw falls under `hit_chance_pct`; a hit deals `1..=damage_max`.
/// Damage is only rolled on a hit.
pub fn resolve(rng: &mut GameRng, hit_chance_pct: u8, damage_max: i32) -> Strike {
    if !rng.chance_pct(hit_chance_pct) {
        return Strike { hit: false, damage: 0 };
    }
    Strike { hit: true, damage: rng.roll_inclusive(1, damage_max.max(1)) }
}

/// Applies `strike` to `target`'s health.
pub fn apply(target: &mut Combatant, strike: Strike) -> StrikeOutcome {
    if !strike.hit {
        return StrikeOutcome::Missed;
    }
    target.health -= strike.damage;
    if target.is_dead() {
        StrikeOutcome::Killed { damage: strike.damage }
    } else {
        StrikeOutcome::Wounded { damage: strike.damage }
    }
}
