//! Applicability of synergy sets to candidate characters.
//!
//! Standard bonuses apply through explicit listing or any matching category
//! definition. Omicron bonuses apply through explicit listing only: they model
//! an ability granted to named allies, never a team trait.

use serde::Serialize;

use crate::data::character::{Character, SynergySet};
use crate::data::dataset::Dataset;

pub fn matches_for_standard_bonus(set: &SynergySet, candidate: &Character) -> bool {
    set.lists_character(&candidate.id)
        || set
            .category_definitions()
            .iter()
            .any(|def| def.matches(candidate.categories()))
}

pub fn matches_for_omicron_bonus(set: &SynergySet, candidate: &Character) -> bool {
    set.lists_character(&candidate.id)
}

/// How a synergy set picked up a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MatchVia {
    Listed,
    Category { definition: usize },
}

fn standard_match_via(set: &SynergySet, candidate: &Character) -> Option<MatchVia> {
    if set.lists_character(&candidate.id) {
        return Some(MatchVia::Listed);
    }
    set.category_definitions()
        .iter()
        .position(|def| def.matches(candidate.categories()))
        .map(|definition| MatchVia::Category { definition })
}

/// Another character's synergy set that counts `target` as a teammate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergyLink {
    pub owner: String,
    pub set_index: usize,
    pub via: MatchVia,
}

/// Every set owned by someone else that applies to `target` for standard bonuses, in dataset order.
pub fn synergy_partners(target: &Character, dataset: &Dataset) -> Vec<SynergyLink> {
    dataset
        .characters()
        .iter()
        .filter(|owner| owner.id != target.id)
        .flat_map(|owner| {
            owner
                .synergy_sets()
                .iter()
                .enumerate()
                .filter_map(move |(set_index, set)| {
                    standard_match_via(set, target).map(|via| SynergyLink {
                        owner: owner.id.clone(),
                        set_index,
                        via,
                    })
                })
        })
        .collect()
}
