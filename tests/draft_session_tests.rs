//! Draft editing lifecycle: open, edit, commit or discard, switch.

use tierlist::data::{CategoryDefinition, Character, Dataset, SynergySet};
use tierlist::draft::{DraftError, DraftSession, DraftState, EditError};
use tierlist::integrity::{validate_dataset, IntegrityRule};

fn dataset() -> Dataset {
    let mut rey = Character::with_tier("REY", 4);
    rey.categories = Some(vec!["Resistance".to_string()]);
    let mut finn = Character::with_tier("FINN", 9);
    finn.categories = Some(vec!["Resistance".to_string()]);
    let poe = Character::with_tier("POE", 11);
    Dataset::new(vec![finn, poe, rey])
}

#[test]
fn commit_writes_back_and_captures_new_baseline() {
    let mut dataset = dataset();
    let mut session = DraftSession::open(dataset.get("FINN").unwrap());

    let set = session
        .add_synergy_set(SynergySet {
            synergy_enhancement: Some(2),
            ..SynergySet::default()
        })
        .unwrap();
    session.add_set_character(set, "REY").unwrap();
    session
        .add_category_definition(set, CategoryDefinition::new(vec!["Resistance".to_string()], 2))
        .unwrap();
    assert_eq!(session.state(), DraftState::Dirty);

    session.commit(&mut dataset).unwrap();
    assert_eq!(session.state(), DraftState::Clean);
    assert_eq!(session.baseline(), session.draft());

    let stored = dataset.get("FINN").unwrap();
    assert_eq!(stored.synergy_sets().len(), 1);
    assert_eq!(stored.synergy_sets()[0].characters(), ["REY".to_string()]);
    assert!(validate_dataset(&dataset).is_clean());
}

#[test]
fn commit_requires_changes_and_a_valid_record() {
    let mut dataset = dataset();
    let mut session = DraftSession::open(dataset.get("POE").unwrap());
    assert!(matches!(
        session.commit(&mut dataset),
        Err(DraftError::NothingToCommit(_))
    ));

    session.add_synergy_set(SynergySet::default()).unwrap();
    let Err(DraftError::Invalid { report, .. }) = session.commit(&mut dataset) else {
        panic!("a set without an enhancement must not commit");
    };
    assert!(report.count_for(IntegrityRule::EnhancementRange) > 0);
    assert!(dataset.get("POE").unwrap().synergy_sets.is_none());
    assert!(session.is_dirty());
}

#[test]
fn slot_ceiling_is_enforced_at_edit_time() {
    let mut session = DraftSession::open(&Character::with_tier("HAN", 8));
    let set = session
        .add_synergy_set(SynergySet {
            synergy_enhancement: Some(1),
            ..SynergySet::default()
        })
        .unwrap();
    session.add_set_character(set, "CHEWBACCA").unwrap();
    session.add_set_character(set, "LANDO").unwrap();
    session
        .add_category_definition(set, CategoryDefinition::new(vec!["Smuggler".to_string()], 2))
        .unwrap();

    let before = session.draft().clone();
    assert_eq!(
        session.set_number_matches_required(set, 0, 3),
        Err(EditError::SlotCapacity { set: 0, usage: 5 })
    );
    assert_eq!(session.draft(), &before);

    let err = session.add_set_character(set, "QIRA").unwrap_err();
    assert!(err.to_string().contains("at most 4"));
}

#[test]
fn invalid_ids_and_duplicates_are_rejected() {
    let mut session = DraftSession::open(&Character::with_tier("HAN", 8));
    let set = session
        .add_synergy_set(SynergySet {
            synergy_enhancement: Some(1),
            ..SynergySet::default()
        })
        .unwrap();
    assert_eq!(
        session.add_set_character(set, "chewie"),
        Err(EditError::InvalidCharacterId("chewie".to_string()))
    );
    session.add_skip_character(set, "GREEDO").unwrap();
    assert!(matches!(
        session.add_skip_character(set, "GREEDO"),
        Err(EditError::DuplicateEntry { .. })
    ));
    assert_eq!(session.add_set_character(7, "LANDO"), Err(EditError::NoSuchSet(7)));
}

#[test]
fn discard_restores_the_baseline() {
    let mut session = DraftSession::open(&Character::with_tier("HAN", 8));
    session.set_base_tier(3).unwrap();
    session.set_omicron_boost(Some(2)).unwrap();
    assert!(session.needs_confirmation());

    assert!(session.discard());
    assert_eq!(session.draft().base_tier, 8);
    assert_eq!(session.draft().omicron_boost, None);
    assert!(!session.discard());
}

#[test]
fn switching_records_while_dirty_needs_confirmation() {
    let dataset = dataset();
    let mut session = DraftSession::open(dataset.get("REY").unwrap());
    session.remove_category("Resistance").unwrap();
    assert_eq!(session.draft().categories, None);

    let poe = dataset.get("POE").unwrap();
    assert!(matches!(
        session.switch_to(poe, false),
        Err(DraftError::UnsavedChanges(id)) if id == "REY"
    ));
    assert_eq!(session.character_id(), "REY");

    session.switch_to(poe, true).unwrap();
    assert_eq!(session.character_id(), "POE");
    assert_eq!(session.state(), DraftState::Clean);
}

#[test]
fn out_of_range_values_leave_the_draft_unchanged() {
    let mut session = DraftSession::open(&Character::with_tier("HAN", 8));
    assert!(matches!(
        session.set_base_tier(20),
        Err(EditError::OutOfRange { field: "baseTier", .. })
    ));
    assert!(matches!(
        session.set_omicron_boost(Some(11)),
        Err(EditError::OutOfRange { field: "omicronBoost", .. })
    ));
    assert_eq!(session.state(), DraftState::Clean);
}

#[test]
fn over_capacity_records_stay_editable() {
    let mut crowded = Character::with_tier("HAN", 8);
    crowded.synergy_sets = Some(vec![SynergySet {
        synergy_enhancement: Some(1),
        characters: Some(
            ["B", "C", "D", "E", "F", "G"]
                .iter()
                .map(|id| id.to_string())
                .collect(),
        ),
        ..SynergySet::default()
    }]);
    let mut session = DraftSession::open(&crowded);

    session.set_base_tier(5).unwrap();
    session.remove_set_character(0, "G").unwrap();
    assert_eq!(session.draft().synergy_sets()[0].characters().len(), 5);

    assert_eq!(
        session.add_set_character(0, "G"),
        Err(EditError::SlotCapacity { set: 0, usage: 6 })
    );
    assert_eq!(session.draft().synergy_sets()[0].characters().len(), 5);
}
