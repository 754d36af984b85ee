//! Tier resolution against small hand-built datasets.

use tierlist::data::{CategoryDefinition, Character, Dataset, SynergySet};
use tierlist::synergy::{matches_for_omicron_bonus, matches_for_standard_bonus};
use tierlist::tier::{resolve_all, resolve_tier, OmicronSource, ResolveOptions};

fn nobody(_: &str) -> bool {
    false
}

fn ids(values: &[&str]) -> Option<Vec<String>> {
    Some(values.iter().map(|v| v.to_string()).collect())
}

fn listed(enhancement: Option<i64>, omicron: Option<i64>, characters: &[&str]) -> SynergySet {
    SynergySet {
        synergy_enhancement: enhancement,
        synergy_enhancement_omicron: omicron,
        characters: ids(characters),
        ..SynergySet::default()
    }
}

#[test]
fn own_synergy_lowers_base_tier() {
    let mut a = Character::with_tier("A", 8);
    a.synergy_sets = Some(vec![listed(Some(3), None, &["B", "C"])]);
    let dataset = Dataset::new(vec![a, Character::new("B"), Character::new("C")]);

    let resolution = resolve_tier("A", &dataset, &nobody).expect("A is in the dataset");
    assert_eq!(resolution.final_tier, 5);
    assert_eq!(resolution.breakdown.best_synergy, 3);
    assert_eq!(resolution.breakdown.winning_set, Some(0));
}

#[test]
fn omicron_granted_by_another_character() {
    let mut x = Character::with_tier("X", 6);
    x.synergy_sets = Some(vec![listed(None, Some(4), &["Y"])]);
    let y = Character::with_tier("Y", 10);
    let dataset = Dataset::new(vec![x, y]);
    let only_x = |id: &str| id == "X";

    let resolution = resolve_tier("Y", &dataset, &only_x).expect("Y is in the dataset");
    assert_eq!(resolution.breakdown.applied_omicron, 4);
    assert_eq!(
        resolution.breakdown.omicron_source,
        Some(OmicronSource::GrantedBy("X".to_string()))
    );
    assert_eq!(resolution.final_tier, 6);

    let payload = serde_json::to_value(&resolution.breakdown).unwrap();
    assert_eq!(payload["omicronSource"], "X");
}

#[test]
fn applied_omicron_is_the_larger_bonus_not_the_sum() {
    let mut x = Character::with_tier("X", 6);
    x.synergy_sets = Some(vec![listed(None, Some(2), &["Y"])]);
    let mut y = Character::with_tier("Y", 12);
    y.omicron_boost = Some(3);
    let dataset = Dataset::new(vec![x, y]);
    let everyone = |_: &str| true;

    let resolution = resolve_tier("Y", &dataset, &everyone).unwrap();
    assert_eq!(resolution.breakdown.personal_omicron, 3);
    assert_eq!(resolution.breakdown.external_omicron, 2);
    assert_eq!(resolution.breakdown.applied_omicron, 3);
    assert_eq!(resolution.breakdown.omicron_source, Some(OmicronSource::Personal));
    assert_eq!(resolution.final_tier, 9);
}

#[test]
fn personal_omicron_wins_ties() {
    let mut x = Character::with_tier("X", 6);
    x.synergy_sets = Some(vec![listed(None, Some(3), &["Y"])]);
    let mut y = Character::with_tier("Y", 12);
    y.omicron_boost = Some(3);
    let dataset = Dataset::new(vec![x, y]);

    let resolution = resolve_tier("Y", &dataset, &|_: &str| true).unwrap();
    assert_eq!(resolution.breakdown.omicron_source, Some(OmicronSource::Personal));
}

#[test]
fn final_tier_is_clamped_to_range() {
    let mut strong = Character::with_tier("STRONG", 2);
    strong.omicron_boost = Some(10);
    strong.synergy_sets = Some(vec![listed(Some(10), None, &["WEAK"])]);
    let weak = Character::with_tier("WEAK", 40);
    let negative = Character::with_tier("ZERO", -5);
    let dataset = Dataset::new(vec![strong, weak, negative]);
    let everyone = |_: &str| true;

    assert_eq!(resolve_tier("STRONG", &dataset, &everyone).unwrap().final_tier, 1);
    assert_eq!(resolve_tier("WEAK", &dataset, &everyone).unwrap().final_tier, 19);
    assert_eq!(resolve_tier("ZERO", &dataset, &everyone).unwrap().final_tier, 1);
}

#[test]
fn unknown_id_resolves_to_none() {
    let dataset = Dataset::new(vec![Character::new("A")]);
    assert!(resolve_tier("MISSING", &dataset, &nobody).is_none());
}

#[test]
fn category_matches_never_grant_omicron_bonuses() {
    let set = SynergySet {
        synergy_enhancement: Some(1),
        synergy_enhancement_omicron: Some(4),
        category_definitions: Some(vec![CategoryDefinition::new(vec!["Jedi".to_string()], 2)]),
        ..SynergySet::default()
    };
    let mut jedi = Character::new("JEDI_KNIGHT");
    jedi.categories = Some(vec!["jedi".to_string()]);

    assert!(matches_for_standard_bonus(&set, &jedi));
    assert!(!matches_for_omicron_bonus(&set, &jedi));

    let mut owner = Character::with_tier("OWNER", 5);
    owner.synergy_sets = Some(vec![set]);
    let dataset = Dataset::new(vec![jedi, owner]);
    let resolution = resolve_tier("JEDI_KNIGHT", &dataset, &|_: &str| true).unwrap();
    assert_eq!(resolution.breakdown.external_omicron, 0);
}

#[test]
fn batch_resolution_matches_single_resolution() {
    let mut a = Character::with_tier("A", 9);
    a.synergy_sets = Some(vec![listed(Some(2), Some(3), &["B", "C"])]);
    let mut b = Character::with_tier("B", 7);
    b.synergy_sets = Some(vec![listed(None, Some(5), &["C"])]);
    let c = Character::with_tier("C", 11);
    let dataset = Dataset::new(vec![a, b, c]);
    let qualifies = |id: &str| id != "C";

    let batch = resolve_all(&dataset, &qualifies, &ResolveOptions::best_case());
    let single: Vec<_> = ["A", "B", "C"]
        .iter()
        .map(|id| resolve_tier(id, &dataset, &qualifies).unwrap())
        .collect();
    assert_eq!(batch, single);
    assert_eq!(batch[2].breakdown.applied_omicron, 5);
}
