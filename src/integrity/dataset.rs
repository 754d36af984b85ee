//! Whole-dataset validation. All problems are collected in one pass; nothing
//! here stops at the first violation.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::data::character::Character;
use crate::data::dataset::{root_entries, Dataset, INDENT_UNIT};
use crate::data::reference::ReferenceProvider;
use crate::integrity::format::check_indentation;
use crate::integrity::record::{check_record, check_reserved_tags};
use crate::integrity::report::{IntegrityRule, ValidationDiagnostic, ValidationReport};
use crate::integrity::schema::{check_unknown_fields, known_fields_only};

/// Validate an in-memory dataset: unique and sorted ids, per-record ranges
/// and capacity, and cross-references. Parse, schema and indentation rules
/// need the file text; see [validate_json].
pub fn validate_dataset(dataset: &Dataset) -> ValidationReport {
    let mut report = ValidationReport::default();
    let ids: Vec<&str> = dataset.characters().iter().map(|c| c.id.as_str()).collect();
    check_ids(&ids, &mut report);
    for character in dataset.characters() {
        check_record(character, &mut report);
    }
    let known: HashSet<&str> = ids.iter().copied().collect();
    check_references(dataset.characters(), &known, &mut report);
    report
}

pub fn validate_dataset_with_reference<R>(dataset: &Dataset, reference: &R) -> ValidationReport
where
    R: ReferenceProvider + ?Sized,
{
    let mut report = validate_dataset(dataset);
    for character in dataset.characters() {
        check_reserved_tags(character, reference, &mut report);
    }
    report
}

/// Validate persisted dataset text against every integrity rule.
pub fn validate_json(raw: &str) -> ValidationReport {
    validate_json_inner(raw, None)
}

/// [validate_json] plus reserved-tag collisions against reference data.
pub fn validate_json_with_reference(raw: &str, reference: &dyn ReferenceProvider) -> ValidationReport {
    validate_json_inner(raw, Some(reference))
}

fn validate_json_inner(raw: &str, reference: Option<&dyn ReferenceProvider>) -> ValidationReport {
    let mut report = ValidationReport::default();

    let payload: Value = match serde_json::from_str(raw) {
        Ok(payload) => payload,
        Err(err) => {
            report.push(ValidationDiagnostic::error(
                IntegrityRule::Structure,
                format!("dataset is not valid JSON: {err}"),
            ));
            return report;
        }
    };
    let Some(entries) = root_entries(&payload) else {
        report.push(
            ValidationDiagnostic::error(
                IntegrityRule::Structure,
                "dataset has no root collection of character records",
            )
            .expected("top-level array or { \"characters\": [...] }"),
        );
        return report;
    };

    check_indentation(raw, INDENT_UNIT, &mut report);

    let mut ids: Vec<&str> = Vec::with_capacity(entries.len());
    let mut characters: Vec<Character> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let label = format!("entry[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(ValidationDiagnostic::error(
                IntegrityRule::Structure,
                format!("{label} is not an object"),
            ));
            continue;
        };
        let id = object.get("id").and_then(Value::as_str);
        if let Some(id) = id {
            ids.push(id);
        }

        check_unknown_fields(object, &label, &mut report);

        match serde_json::from_value::<Character>(known_fields_only(object)) {
            Ok(character) => characters.push(character),
            Err(err) => {
                let mut diag = ValidationDiagnostic::error(
                    IntegrityRule::Structure,
                    format!("{label} is not a readable character record: {err}"),
                );
                if let Some(id) = id {
                    diag = diag.character(id);
                }
                report.push(diag);
            }
        }
    }

    check_ids(&ids, &mut report);
    for character in &characters {
        check_record(character, &mut report);
        if let Some(reference) = reference {
            check_reserved_tags(character, reference, &mut report);
        }
    }
    let known: HashSet<&str> = ids.iter().copied().collect();
    check_references(&characters, &known, &mut report);

    report
}

/// Duplicate ids (each repeat after the first) and adjacent ordering breaks.
fn check_ids(ids: &[&str], report: &mut ValidationReport) {
    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (index, id) in ids.iter().copied().enumerate() {
        if let Some(first) = first_seen.get(id) {
            report.push(
                ValidationDiagnostic::error(
                    IntegrityRule::UniqueIds,
                    format!("duplicate id '{id}' at record {index}, first seen at record {first}"),
                )
                .character(id)
                .field("id"),
            );
        } else {
            first_seen.insert(id, index);
        }
    }

    for (index, pair) in ids.windows(2).enumerate() {
        let (current, next) = (pair[0], pair[1]);
        if current > next {
            report.push(
                ValidationDiagnostic::error(
                    IntegrityRule::SortedIds,
                    format!("record {} '{next}' must sort before record {index} '{current}'", index + 1),
                )
                .character(next)
                .field("id")
                .observed(format!("'{current}' before '{next}'"))
                .expected("ascending case-sensitive order"),
            );
        }
    }
}

/// One violation per reference to an id missing from the dataset.
fn check_references(characters: &[Character], known: &HashSet<&str>, report: &mut ValidationReport) {
    for character in characters {
        for (set_index, set) in character.synergy_sets().iter().enumerate() {
            for (field, listed) in [
                ("characters", set.characters()),
                ("skipIfPresentCharacters", set.skip_if_present_characters()),
            ] {
                for (position, referenced) in listed.iter().enumerate() {
                    if referenced.trim().is_empty() || known.contains(referenced.as_str()) {
                        continue;
                    }
                    report.push(
                        ValidationDiagnostic::error(
                            IntegrityRule::References,
                            format!(
                                "character '{}' synergy set {set_index} references unknown character '{referenced}'",
                                character.id
                            ),
                        )
                        .character(character.id.clone())
                        .set(set_index)
                        .field(format!("{field}[{position}]"))
                        .observed(referenced),
                    );
                }
            }
        }
    }
}
