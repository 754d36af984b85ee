//! Synergy-set rules shared by the tier resolver, the integrity validator and
//! draft editing: slot accounting and teammate matching.

pub mod matcher;
pub mod slots;

pub use matcher::{
    matches_for_omicron_bonus, matches_for_standard_bonus, synergy_partners, MatchVia,
    SynergyLink,
};
pub use slots::{is_within_capacity, remaining_slots, slot_usage, MAX_SYNERGY_SLOTS};
