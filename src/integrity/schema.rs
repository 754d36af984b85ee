//! Closed-schema check on raw JSON records. Field names are fixed; anything
//! else is reported and stripped before the record is read as a [Character].
//!
//! [Character]: crate::data::Character

use serde_json::{Map, Value};

use crate::integrity::report::{IntegrityRule, ValidationDiagnostic, ValidationReport};

pub const CHARACTER_FIELDS: &[&str] = &[
    "id",
    "baseTier",
    "omicronBoost",
    "categories",
    "requiredZetas",
    "requiredOmicrons",
    "requiresAllZetas",
    "requiresAllOmicrons",
    "synergySets",
];

pub const SYNERGY_SET_FIELDS: &[&str] = &[
    "synergyEnhancement",
    "synergyEnhancementOmicron",
    "characters",
    "skipIfPresentCharacters",
    "categoryDefinitions",
];

pub const CATEGORY_DEFINITION_FIELDS: &[&str] = &["include", "exclude", "numberMatchesRequired"];

/// Report every unknown field of one raw record, nested objects included.
pub(crate) fn check_unknown_fields(
    entry: &Map<String, Value>,
    label: &str,
    report: &mut ValidationReport,
) {
    let id = entry.get("id").and_then(Value::as_str);
    let unknown = |field: String, set: Option<usize>, name: &str| {
        let mut diag = ValidationDiagnostic::error(
            IntegrityRule::Schema,
            format!("{label} has unrecognized field '{name}'"),
        )
        .field(field);
        if let Some(id) = id {
            diag = diag.character(id);
        }
        if let Some(index) = set {
            diag = diag.set(index);
        }
        diag
    };

    for name in unknown_keys(entry, CHARACTER_FIELDS) {
        report.push(unknown(name.to_string(), None, name));
    }

    for (set_index, set) in objects_in(entry, "synergySets") {
        for name in unknown_keys(set, SYNERGY_SET_FIELDS) {
            report.push(unknown(name.to_string(), Some(set_index), name));
        }
        for (def_index, definition) in objects_in(set, "categoryDefinitions") {
            for name in unknown_keys(definition, CATEGORY_DEFINITION_FIELDS) {
                report.push(unknown(
                    format!("categoryDefinitions[{def_index}].{name}"),
                    Some(set_index),
                    name,
                ));
            }
        }
    }
}

/// Copy of a raw record with unknown fields removed at every level.
pub(crate) fn known_fields_only(entry: &Map<String, Value>) -> Value {
    let mut record = retain_known(entry, CHARACTER_FIELDS);
    if let Some(Value::Array(sets)) = record.get_mut("synergySets") {
        for set in sets.iter_mut() {
            let Value::Object(set_object) = set else { continue };
            let mut cleaned = retain_known(set_object, SYNERGY_SET_FIELDS);
            if let Some(Value::Array(definitions)) = cleaned.get_mut("categoryDefinitions") {
                for definition in definitions.iter_mut() {
                    if let Value::Object(def_object) = definition {
                        *definition =
                            Value::Object(retain_known(def_object, CATEGORY_DEFINITION_FIELDS));
                    }
                }
            }
            *set = Value::Object(cleaned);
        }
    }
    Value::Object(record)
}

fn retain_known(object: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(key, _)| known.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn unknown_keys<'a>(
    object: &'a Map<String, Value>,
    known: &'a [&'a str],
) -> impl Iterator<Item = &'a str> {
    object
        .keys()
        .map(String::as_str)
        .filter(move |key| !known.contains(key))
}

fn objects_in<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> impl Iterator<Item = (usize, &'a Map<String, Value>)> {
    object
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .enumerate()
        .filter_map(|(index, value)| value.as_object().map(|object| (index, object)))
}
