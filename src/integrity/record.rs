//! Checks that need only one record: ranges, enhancement presence, slot
//! capacity, blank or repeated entries, id pattern. The draft session runs
//! these before a commit; the dataset validator runs them for every record.

use std::collections::HashSet;

use crate::data::character::{
    is_valid_character_id, tag_key, CategoryDefinition, Character, SynergySet, MAX_ENHANCEMENT,
    MAX_MATCHES_REQUIRED, MAX_TIER, MIN_ENHANCEMENT, MIN_MATCHES_REQUIRED, MIN_TIER,
};
use crate::data::reference::ReferenceProvider;
use crate::integrity::report::{IntegrityRule, ValidationDiagnostic, ValidationReport};
use crate::synergy::{slot_usage, MAX_SYNERGY_SLOTS};

pub fn validate_record(character: &Character) -> ValidationReport {
    let mut report = ValidationReport::default();
    check_record(character, &mut report);
    report
}

/// Per-record checks plus reserved-tag collisions against reference data.
pub fn validate_record_with_reference<R>(character: &Character, reference: &R) -> ValidationReport
where
    R: ReferenceProvider + ?Sized,
{
    let mut report = validate_record(character);
    check_reserved_tags(character, reference, &mut report);
    report
}

pub(crate) fn check_record(character: &Character, report: &mut ValidationReport) {
    let id = character.id.as_str();

    if !is_valid_character_id(id) {
        report.push(
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character id '{id}' does not match the id pattern"),
            )
            .character(id)
            .field("id")
            .observed(id)
            .expected("^[A-Z0-9_]+$"),
        );
    }

    if !(MIN_TIER..=MAX_TIER).contains(&character.base_tier) {
        report.push(
            ValidationDiagnostic::error(
                IntegrityRule::TierRange,
                format!("character '{id}' has baseTier outside the tier range"),
            )
            .character(id)
            .field("baseTier")
            .observed(character.base_tier)
            .expected(format!("{MIN_TIER}..={MAX_TIER}")),
        );
    }

    if let Some(boost) = character.omicron_boost {
        if !(MIN_ENHANCEMENT..=MAX_ENHANCEMENT).contains(&boost) {
            report.push(
                ValidationDiagnostic::error(
                    IntegrityRule::Schema,
                    format!("character '{id}' has omicronBoost outside the bonus range"),
                )
                .character(id)
                .field("omicronBoost")
                .observed(boost)
                .expected(format!("{MIN_ENHANCEMENT}..={MAX_ENHANCEMENT}")),
            );
        }
    }

    check_list(report, id, None, "categories", character.categories.as_deref(), false);
    check_list(report, id, None, "requiredZetas", character.required_zetas.as_deref(), true);
    check_list(report, id, None, "requiredOmicrons", character.required_omicrons.as_deref(), true);

    for (flag, value, list) in [
        ("requiresAllZetas", character.requires_all_zetas, &character.required_zetas),
        ("requiresAllOmicrons", character.requires_all_omicrons, &character.required_omicrons),
    ] {
        if value.is_some() && list.is_none() {
            report.push(
                ValidationDiagnostic::warning(
                    IntegrityRule::Schema,
                    format!("character '{id}' sets {flag} without the matching required list; it has no effect"),
                )
                .character(id)
                .field(flag),
            );
        }
    }

    for (index, set) in character.synergy_sets().iter().enumerate() {
        check_synergy_set(report, id, index, set);
    }
}

fn check_synergy_set(report: &mut ValidationReport, id: &str, index: usize, set: &SynergySet) {
    if !set.has_enhancement() {
        report.push(
            ValidationDiagnostic::error(
                IntegrityRule::EnhancementRange,
                format!(
                    "character '{id}' synergy set {index} sets neither synergyEnhancement nor synergyEnhancementOmicron"
                ),
            )
            .character(id)
            .set(index),
        );
    }

    for (field, value) in [
        ("synergyEnhancement", set.synergy_enhancement),
        ("synergyEnhancementOmicron", set.synergy_enhancement_omicron),
    ] {
        let Some(value) = value else { continue };
        if !(MIN_ENHANCEMENT..=MAX_ENHANCEMENT).contains(&value) {
            report.push(
                ValidationDiagnostic::error(
                    IntegrityRule::EnhancementRange,
                    format!("character '{id}' synergy set {index} has {field} outside the bonus range"),
                )
                .character(id)
                .set(index)
                .field(field)
                .observed(value)
                .expected(format!("{MIN_ENHANCEMENT}..={MAX_ENHANCEMENT}")),
            );
        }
    }

    let usage = slot_usage(set);
    if usage <= 0 || usage > MAX_SYNERGY_SLOTS {
        let message = if usage <= 0 {
            format!("character '{id}' synergy set {index} references no teammates")
        } else {
            format!("character '{id}' synergy set {index} references more teammates than a lineup holds")
        };
        report.push(
            ValidationDiagnostic::error(IntegrityRule::SlotCapacity, message)
                .character(id)
                .set(index)
                .observed(usage)
                .expected(format!("1..={MAX_SYNERGY_SLOTS}")),
        );
    }

    check_list(report, id, Some(index), "characters", set.characters.as_deref(), true);
    check_list(
        report,
        id,
        Some(index),
        "skipIfPresentCharacters",
        set.skip_if_present_characters.as_deref(),
        true,
    );

    for (def_index, definition) in set.category_definitions().iter().enumerate() {
        check_category_definition(report, id, index, def_index, definition);
    }
}

fn check_category_definition(
    report: &mut ValidationReport,
    id: &str,
    set_index: usize,
    def_index: usize,
    definition: &CategoryDefinition,
) {
    let field = format!("categoryDefinitions[{def_index}]");
    let scoped = |diag: ValidationDiagnostic| diag.character(id).set(set_index);

    if definition.include.is_empty() {
        report.push(scoped(
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character '{id}' synergy set {set_index} category definition {def_index} has an empty include list"),
            )
            .field(format!("{field}.include")),
        ));
    }

    let matches = definition.number_matches_required;
    if !(MIN_MATCHES_REQUIRED..=MAX_MATCHES_REQUIRED).contains(&matches) {
        report.push(scoped(
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character '{id}' synergy set {set_index} category definition {def_index} has numberMatchesRequired outside its range"),
            )
            .field(format!("{field}.numberMatchesRequired"))
            .observed(matches)
            .expected(format!("{MIN_MATCHES_REQUIRED}..={MAX_MATCHES_REQUIRED}")),
        ));
    }

    for tag in definition.overlapping_tags() {
        report.push(scoped(
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character '{id}' synergy set {set_index} category definition {def_index} both includes and excludes '{tag}'"),
            )
            .field(field.clone()),
        ));
    }

    check_list(report, id, Some(set_index), &format!("{field}.include"), Some(definition.include.as_slice()), false);
    check_list(report, id, Some(set_index), &format!("{field}.exclude"), definition.exclude.as_deref(), false);
}

/// Blank entries are errors; repeated entries are errors too. Tag lists
/// compare case-insensitively, id lists exactly.
fn check_list(
    report: &mut ValidationReport,
    id: &str,
    set_index: Option<usize>,
    field: &str,
    values: Option<&[String]>,
    case_sensitive: bool,
) {
    let Some(values) = values else { return };
    let mut seen = HashSet::new();
    for (position, value) in values.iter().enumerate() {
        let mut diag = if value.trim().is_empty() {
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character '{id}' has a blank entry in {field}"),
            )
        } else {
            let key = if case_sensitive {
                value.clone()
            } else {
                tag_key(value)
            };
            if seen.insert(key) {
                continue;
            }
            ValidationDiagnostic::error(
                IntegrityRule::Schema,
                format!("character '{id}' lists '{value}' more than once in {field}"),
            )
        };
        diag = diag.character(id).field(format!("{field}[{position}]"));
        if let Some(index) = set_index {
            diag = diag.set(index);
        }
        report.push(diag);
    }
}

pub(crate) fn check_reserved_tags<R>(character: &Character, reference: &R, report: &mut ValidationReport)
where
    R: ReferenceProvider + ?Sized,
{
    for (position, tag) in character.categories().iter().enumerate() {
        if reference.is_reserved_tag(tag) {
            report.push(
                ValidationDiagnostic::error(
                    IntegrityRule::Schema,
                    format!(
                        "character '{}' category '{tag}' collides with a category, role or alignment name",
                        character.id
                    ),
                )
                .character(character.id.clone())
                .field(format!("categories[{position}]")),
            );
        }
    }
}
