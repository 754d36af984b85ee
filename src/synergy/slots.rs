//! Teammate-slot accounting for synergy sets.

use crate::data::character::SynergySet;

/// Most teammates a single synergy set may reference.
pub const MAX_SYNERGY_SLOTS: i64 = 4;

/// Explicit characters plus the summed `numberMatchesRequired` of every category definition.
/// Saturates at the `i64` bounds so out-of-range counts still yield a usage.
pub fn slot_usage(set: &SynergySet) -> i64 {
    let explicit = i64::try_from(set.characters().len()).unwrap_or(i64::MAX);
    set.category_definitions()
        .iter()
        .fold(explicit, |total, def| total.saturating_add(def.number_matches_required))
}

/// `0 < slot_usage(set) <= MAX_SYNERGY_SLOTS`.
pub fn is_within_capacity(set: &SynergySet) -> bool {
    let usage = slot_usage(set);
    usage > 0 && usage <= MAX_SYNERGY_SLOTS
}

/// Slots still available for further teammates. Never negative.
pub fn remaining_slots(set: &SynergySet) -> i64 {
    MAX_SYNERGY_SLOTS.saturating_sub(slot_usage(set)).max(0)
}
