use crate::config::MAX_INTEGRITY;
use crate::game_params::RoundParams;

use super::types::{EarthquakeEvent, Structure};

// =============================================================================
// Damage formula
// =============================================================================

/// `max(min_factor, 1 - distance * falloff)`: damage attenuates with distance
/// but never reaches zero.
pub fn distance_factor(distance: usize, round: &RoundParams) -> f32 {
    (1.0 - distance as f32 * round.distance_falloff).max(round.min_distance_factor)
}

/// Damage an earthquake deals to one structure, before clamping:
/// `magnitude * k * distance_factor * reinforcement * (1 + height * sway)`.
pub fn structure_damage(structure: &Structure, event: &EarthquakeEvent, round: &RoundParams) -> f32 {
    let distance = structure.id.abs_diff(event.epicenter);
    let base = event.magnitude * round.damage_per_magnitude * distance_factor(distance, round);
    let reinforcement = if structure.reinforced {
        round.reinforced_damage_multiplier
    } else {
        1.0
    };
    let height_factor = structure.height as f32 * round.height_sway_factor;
    base * reinforcement * (1.0 + height_factor)
}

/// Apply one damage pass, returning the replacement roster and the damage
/// dealt to each structure. The input roster is left untouched.
pub fn apply_damage_pass(
    roster: &[Structure],
    event: &EarthquakeEvent,
    round: &RoundParams,
) -> (Vec<Structure>, Vec<f32>) {
    roster
        .iter()
        .map(|s| {
            let damage = structure_damage(s, event, round);
            let next = Structure {
                integrity: (s.integrity - damage).clamp(0.0, MAX_INTEGRITY),
                ..s.clone()
            };
            (next, damage)
        })
        .unzip()
}

/// `floor(sum(integrity) / divisor)`. Recomputed from scratch, never accumulated.
pub fn score_for(roster: &[Structure], round: &RoundParams) -> u32 {
    let total: f32 = roster.iter().map(|s| s.integrity).sum();
    (total / round.score_divisor).floor().max(0.0) as u32
}
