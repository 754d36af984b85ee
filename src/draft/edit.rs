//! Edit-time rules. A mutation that breaks one of these is rejected before it
//! touches the draft.

use std::collections::HashSet;

use thiserror::Error;

use crate::data::character::{
    is_valid_character_id, tag_key, CategoryDefinition, SynergySet, MAX_ENHANCEMENT,
    MAX_MATCHES_REQUIRED, MIN_ENHANCEMENT, MIN_MATCHES_REQUIRED,
};
use crate::synergy::{slot_usage, MAX_SYNERGY_SLOTS};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("synergy set {set} would use {usage} teammate slots; at most {max} are allowed", max = MAX_SYNERGY_SLOTS)]
    SlotCapacity { set: usize, usage: i64 },
    #[error("category '{0}' is already present")]
    DuplicateCategory(String),
    #[error("category '{0}' is a reserved category, role or alignment name")]
    ReservedCategory(String),
    #[error("'{0}' is not a valid character id (expected ^[A-Z0-9_]+$)")]
    InvalidCharacterId(String),
    #[error("'{value}' is already listed in {field}")]
    DuplicateEntry { field: &'static str, value: String },
    #[error("{field} entries must not be blank")]
    BlankEntry { field: &'static str },
    #[error("'{value}' is not listed in {field}")]
    NotListed { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("{flag} needs {list} to be set first")]
    MissingOverride {
        flag: &'static str,
        list: &'static str,
    },
    #[error("synergy set {0} does not exist")]
    NoSuchSet(usize),
    #[error("category definition {definition} of synergy set {set} does not exist")]
    NoSuchDefinition { set: usize, definition: usize },
    #[error("a category definition needs at least one include tag")]
    EmptyInclude,
    #[error("tag '{0}' cannot be both included and excluded")]
    IncludeExcludeOverlap(String),
}

pub(crate) fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), EditError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(EditError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

pub(crate) fn check_enhancement(field: &'static str, value: Option<i64>) -> Result<(), EditError> {
    match value {
        Some(value) => check_range(field, value, MIN_ENHANCEMENT, MAX_ENHANCEMENT),
        None => Ok(()),
    }
}

/// Trimmed, non-blank entry.
pub(crate) fn clean_entry(field: &'static str, raw: &str) -> Result<String, EditError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(EditError::BlankEntry { field });
    }
    Ok(value.to_string())
}

pub(crate) fn clean_character_id(field: &'static str, raw: &str) -> Result<String, EditError> {
    let id = clean_entry(field, raw)?;
    if !is_valid_character_id(&id) {
        return Err(EditError::InvalidCharacterId(id));
    }
    Ok(id)
}

/// Cleaned list with blanks and repeats rejected.
pub(crate) fn clean_list(
    field: &'static str,
    values: &[String],
    case_sensitive: bool,
) -> Result<Vec<String>, EditError> {
    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(values.len());
    for raw in values {
        let value = clean_entry(field, raw)?;
        let key = if case_sensitive {
            value.clone()
        } else {
            tag_key(&value)
        };
        if !seen.insert(key) {
            return Err(EditError::DuplicateEntry { field, value });
        }
        cleaned.push(value);
    }
    Ok(cleaned)
}

fn clean_id_list(field: &'static str, values: Option<&Vec<String>>) -> Result<Option<Vec<String>>, EditError> {
    let Some(values) = values else {
        return Ok(None);
    };
    let cleaned = clean_list(field, values, true)?;
    for id in &cleaned {
        if !is_valid_character_id(id) {
            return Err(EditError::InvalidCharacterId(id.clone()));
        }
    }
    Ok(Some(cleaned))
}

pub(crate) fn clean_category_definition(definition: &CategoryDefinition) -> Result<CategoryDefinition, EditError> {
    let include = clean_list("include", &definition.include, false)?;
    if include.is_empty() {
        return Err(EditError::EmptyInclude);
    }
    let exclude = match &definition.exclude {
        Some(exclude) => Some(clean_list("exclude", exclude, false)?),
        None => None,
    };
    let cleaned = CategoryDefinition {
        include,
        exclude,
        number_matches_required: definition.number_matches_required,
    };
    if let Some(tag) = cleaned.overlapping_tags().into_iter().next() {
        return Err(EditError::IncludeExcludeOverlap(tag));
    }
    check_range(
        "numberMatchesRequired",
        cleaned.number_matches_required,
        MIN_MATCHES_REQUIRED,
        MAX_MATCHES_REQUIRED,
    )?;
    Ok(cleaned)
}

/// Whole-set edit check used when a set is added. Presence of an enhancement
/// and a non-zero slot count are left to commit time so sets can be built up
/// one field at a time.
pub(crate) fn clean_synergy_set(set: &SynergySet) -> Result<SynergySet, EditError> {
    check_enhancement("synergyEnhancement", set.synergy_enhancement)?;
    check_enhancement("synergyEnhancementOmicron", set.synergy_enhancement_omicron)?;
    let category_definitions = match &set.category_definitions {
        Some(definitions) => Some(
            definitions
                .iter()
                .map(clean_category_definition)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };
    Ok(SynergySet {
        synergy_enhancement: set.synergy_enhancement,
        synergy_enhancement_omicron: set.synergy_enhancement_omicron,
        characters: clean_id_list("characters", set.characters.as_ref())?,
        skip_if_present_characters: clean_id_list(
            "skipIfPresentCharacters",
            set.skip_if_present_characters.as_ref(),
        )?,
        category_definitions,
    })
}

/// Reject an edit only when it raises some set's usage above the ceiling.
/// Sets already over capacity may stay there or shrink. A shorter list means
/// a set was removed, which never adds usage.
pub(crate) fn check_capacity_growth(before: &[SynergySet], after: &[SynergySet]) -> Result<(), EditError> {
    if after.len() < before.len() {
        return Ok(());
    }
    for (set, synergy) in after.iter().enumerate() {
        let usage = slot_usage(synergy);
        let previous = before.get(set).map_or(0, slot_usage);
        if usage > MAX_SYNERGY_SLOTS && usage > previous {
            return Err(EditError::SlotCapacity { set, usage });
        }
    }
    Ok(())
}
