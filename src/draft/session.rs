//! Single-record draft editing with a Clean/Dirty baseline comparison.

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::data::character::{
    same_tag, tag_key, CategoryDefinition, Character, SynergySet, MAX_ENHANCEMENT,
    MAX_MATCHES_REQUIRED, MAX_TIER, MIN_ENHANCEMENT, MIN_MATCHES_REQUIRED, MIN_TIER,
};
use crate::data::dataset::Dataset;
use crate::draft::edit::{
    check_capacity_growth, check_enhancement, check_range, clean_category_definition,
    clean_character_id, clean_entry, clean_list, clean_synergy_set, EditError,
};
use crate::integrity::{validate_record, ValidationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftState {
    /// Draft equals the baseline.
    Clean,
    /// Draft differs from the baseline.
    Dirty,
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("draft for '{0}' has no changes to commit")]
    NothingToCommit(String),
    #[error("draft for '{id}' fails {} integrity check(s)", .report.errors().count())]
    Invalid { id: String, report: ValidationReport },
    #[error("draft for '{0}' has unsaved changes; confirm before switching records")]
    UnsavedChanges(String),
}

/// Staged edits for one character. Mutations go to `draft`; `baseline` is the
/// last committed copy. Each mutation is checked first and leaves the draft
/// untouched when rejected.
#[derive(Debug, Clone)]
pub struct DraftSession {
    baseline: Character,
    draft: Character,
    state: DraftState,
    reserved_tags: BTreeSet<String>,
}

impl DraftSession {
    pub fn open(record: &Character) -> Self {
        Self {
            baseline: record.clone(),
            draft: record.clone(),
            state: DraftState::Clean,
            reserved_tags: BTreeSet::new(),
        }
    }

    /// Category, role and alignment names that may not be used as tags.
    pub fn with_reserved_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.reserved_tags = tags
            .into_iter()
            .map(|tag| tag_key(tag.as_ref().trim()))
            .collect();
        self
    }

    pub fn character_id(&self) -> &str {
        &self.baseline.id
    }

    pub fn draft(&self) -> &Character {
        &self.draft
    }

    pub fn baseline(&self) -> &Character {
        &self.baseline
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == DraftState::Dirty
    }

    /// True when discarding or switching would lose edits, so the caller
    /// should ask first.
    pub fn needs_confirmation(&self) -> bool {
        self.is_dirty()
    }

    /// Open `record` in place of the current draft. Refused while dirty
    /// unless `confirmed`.
    pub fn switch_to(&mut self, record: &Character, confirmed: bool) -> Result<(), DraftError> {
        if self.is_dirty() && !confirmed {
            return Err(DraftError::UnsavedChanges(self.baseline.id.clone()));
        }
        if self.is_dirty() {
            log::info!("dropping unsaved edits to '{}'", self.baseline.id);
        }
        let reserved = std::mem::take(&mut self.reserved_tags);
        *self = Self::open(record);
        self.reserved_tags = reserved;
        Ok(())
    }

    /// Write the draft into `dataset` and make it the new baseline.
    pub fn commit(&mut self, dataset: &mut Dataset) -> Result<(), DraftError> {
        if !self.is_dirty() {
            return Err(DraftError::NothingToCommit(self.baseline.id.clone()));
        }
        let report = validate_record(&self.draft);
        if report.has_errors() {
            return Err(DraftError::Invalid {
                id: self.draft.id.clone(),
                report,
            });
        }
        dataset.upsert(self.draft.clone());
        self.baseline = self.draft.clone();
        self.state = DraftState::Clean;
        log::info!("committed draft for '{}'", self.baseline.id);
        Ok(())
    }

    /// Reset the draft to the baseline. Returns whether edits were dropped.
    pub fn discard(&mut self) -> bool {
        let dropped = self.is_dirty();
        self.draft = self.baseline.clone();
        self.state = DraftState::Clean;
        dropped
    }

    /// Apply `change` to a copy of the draft; keep the copy only when the
    /// change holds and pushes no set past the slot ceiling.
    fn edit<T, F>(&mut self, change: F) -> Result<T, EditError>
    where
        F: FnOnce(&mut Character) -> Result<T, EditError>,
    {
        let mut candidate = self.draft.clone();
        let value = change(&mut candidate)?;
        check_capacity_growth(self.draft.synergy_sets(), candidate.synergy_sets())?;
        self.draft = candidate;
        self.state = if self.draft == self.baseline {
            DraftState::Clean
        } else {
            DraftState::Dirty
        };
        Ok(value)
    }

    pub fn set_base_tier(&mut self, tier: i64) -> Result<(), EditError> {
        check_range("baseTier", tier, MIN_TIER, MAX_TIER)?;
        self.edit(|draft| {
            draft.base_tier = tier;
            Ok(())
        })
    }

    /// `None` removes the field.
    pub fn set_omicron_boost(&mut self, boost: Option<i64>) -> Result<(), EditError> {
        if let Some(value) = boost {
            check_range("omicronBoost", value, MIN_ENHANCEMENT, MAX_ENHANCEMENT)?;
        }
        self.edit(|draft| {
            draft.omicron_boost = boost;
            Ok(())
        })
    }

    pub fn add_category(&mut self, tag: &str) -> Result<(), EditError> {
        let tag = clean_entry("categories", tag)?;
        if self.reserved_tags.contains(&tag_key(&tag)) {
            return Err(EditError::ReservedCategory(tag));
        }
        self.edit(|draft| {
            if draft.has_category(&tag) {
                return Err(EditError::DuplicateCategory(tag));
            }
            draft.categories.get_or_insert_with(Vec::new).push(tag);
            Ok(())
        })
    }

    /// Removing the last tag removes the field.
    pub fn remove_category(&mut self, tag: &str) -> Result<(), EditError> {
        self.edit(|draft| {
            let categories = draft.categories.get_or_insert_with(Vec::new);
            let Some(position) = categories
                .iter()
                .position(|existing| same_tag(existing, tag.trim()))
            else {
                return Err(EditError::NotListed {
                    field: "categories",
                    value: tag.to_string(),
                });
            };
            categories.remove(position);
            if categories.is_empty() {
                draft.categories = None;
            }
            Ok(())
        })
    }

    /// `None` restores "all zetas required" and drops `requiresAllZetas`.
    pub fn set_required_zetas(&mut self, abilities: Option<Vec<String>>) -> Result<(), EditError> {
        let abilities = match abilities {
            Some(list) => Some(clean_list("requiredZetas", &list, true)?),
            None => None,
        };
        self.edit(|draft| {
            if abilities.is_none() {
                draft.requires_all_zetas = None;
            }
            draft.required_zetas = abilities;
            Ok(())
        })
    }

    /// `None` restores "all omicrons required" and drops `requiresAllOmicrons`.
    pub fn set_required_omicrons(&mut self, abilities: Option<Vec<String>>) -> Result<(), EditError> {
        let abilities = match abilities {
            Some(list) => Some(clean_list("requiredOmicrons", &list, true)?),
            None => None,
        };
        self.edit(|draft| {
            if abilities.is_none() {
                draft.requires_all_omicrons = None;
            }
            draft.required_omicrons = abilities;
            Ok(())
        })
    }

    pub fn set_requires_all_zetas(&mut self, value: Option<bool>) -> Result<(), EditError> {
        self.edit(|draft| {
            if value.is_some() && draft.required_zetas.is_none() {
                return Err(EditError::MissingOverride {
                    flag: "requiresAllZetas",
                    list: "requiredZetas",
                });
            }
            draft.requires_all_zetas = value;
            Ok(())
        })
    }

    pub fn set_requires_all_omicrons(&mut self, value: Option<bool>) -> Result<(), EditError> {
        self.edit(|draft| {
            if value.is_some() && draft.required_omicrons.is_none() {
                return Err(EditError::MissingOverride {
                    flag: "requiresAllOmicrons",
                    list: "requiredOmicrons",
                });
            }
            draft.requires_all_omicrons = value;
            Ok(())
        })
    }

    /// Append a synergy set; returns its ordinal.
    pub fn add_synergy_set(&mut self, set: SynergySet) -> Result<usize, EditError> {
        let set = clean_synergy_set(&set)?;
        self.edit(|draft| {
            let sets = draft.synergy_sets.get_or_insert_with(Vec::new);
            sets.push(set);
            Ok(sets.len() - 1)
        })
    }

    /// Removing the last set removes the field.
    pub fn remove_synergy_set(&mut self, index: usize) -> Result<SynergySet, EditError> {
        self.edit(|draft| {
            let sets = draft.synergy_sets.get_or_insert_with(Vec::new);
            if index >= sets.len() {
                return Err(EditError::NoSuchSet(index));
            }
            let removed = sets.remove(index);
            if sets.is_empty() {
                draft.synergy_sets = None;
            }
            Ok(removed)
        })
    }

    pub fn set_synergy_enhancement(&mut self, index: usize, value: Option<i64>) -> Result<(), EditError> {
        check_enhancement("synergyEnhancement", value)?;
        self.edit_set(index, |set| {
            set.synergy_enhancement = value;
            Ok(())
        })
    }

    pub fn set_synergy_enhancement_omicron(&mut self, index: usize, value: Option<i64>) -> Result<(), EditError> {
        check_enhancement("synergyEnhancementOmicron", value)?;
        self.edit_set(index, |set| {
            set.synergy_enhancement_omicron = value;
            Ok(())
        })
    }

    pub fn add_set_character(&mut self, index: usize, id: &str) -> Result<(), EditError> {
        let id = clean_character_id("characters", id)?;
        self.edit_set(index, |set| push_unique("characters", &mut set.characters, id))
    }

    pub fn remove_set_character(&mut self, index: usize, id: &str) -> Result<(), EditError> {
        self.edit_set(index, |set| remove_listed("characters", &mut set.characters, id))
    }

    pub fn add_skip_character(&mut self, index: usize, id: &str) -> Result<(), EditError> {
        let id = clean_character_id("skipIfPresentCharacters", id)?;
        self.edit_set(index, |set| {
            push_unique("skipIfPresentCharacters", &mut set.skip_if_present_characters, id)
        })
    }

    pub fn remove_skip_character(&mut self, index: usize, id: &str) -> Result<(), EditError> {
        self.edit_set(index, |set| {
            remove_listed("skipIfPresentCharacters", &mut set.skip_if_present_characters, id)
        })
    }

    /// Append a category definition to a set; returns its ordinal.
    pub fn add_category_definition(
        &mut self,
        index: usize,
        definition: CategoryDefinition,
    ) -> Result<usize, EditError> {
        let definition = clean_category_definition(&definition)?;
        self.edit_set(index, |set| {
            let definitions = set.category_definitions.get_or_insert_with(Vec::new);
            definitions.push(definition);
            Ok(definitions.len() - 1)
        })
    }

    pub fn remove_category_definition(&mut self, index: usize, definition: usize) -> Result<(), EditError> {
        self.edit_set(index, |set| {
            let definitions = set.category_definitions.get_or_insert_with(Vec::new);
            if definition >= definitions.len() {
                return Err(EditError::NoSuchDefinition { set: index, definition });
            }
            definitions.remove(definition);
            if definitions.is_empty() {
                set.category_definitions = None;
            }
            Ok(())
        })
    }

    pub fn set_number_matches_required(
        &mut self,
        index: usize,
        definition: usize,
        matches: i64,
    ) -> Result<(), EditError> {
        check_range(
            "numberMatchesRequired",
            matches,
            MIN_MATCHES_REQUIRED,
            MAX_MATCHES_REQUIRED,
        )?;
        self.edit_set(index, |set| {
            let target = set
                .category_definitions
                .as_mut()
                .and_then(|definitions| definitions.get_mut(definition))
                .ok_or(EditError::NoSuchDefinition { set: index, definition })?;
            target.number_matches_required = matches;
            Ok(())
        })
    }

    fn edit_set<T, F>(&mut self, index: usize, change: F) -> Result<T, EditError>
    where
        F: FnOnce(&mut SynergySet) -> Result<T, EditError>,
    {
        self.edit(|draft| {
            let set = draft
                .synergy_sets
                .as_mut()
                .and_then(|sets| sets.get_mut(index))
                .ok_or(EditError::NoSuchSet(index))?;
            change(set)
        })
    }
}

fn push_unique(field: &'static str, list: &mut Option<Vec<String>>, value: String) -> Result<(), EditError> {
    let entries = list.get_or_insert_with(Vec::new);
    if entries.contains(&value) {
        return Err(EditError::DuplicateEntry { field, value });
    }
    entries.push(value);
    Ok(())
}

fn remove_listed(field: &'static str, list: &mut Option<Vec<String>>, value: &str) -> Result<(), EditError> {
    let entries = list.get_or_insert_with(Vec::new);
    let Some(position) = entries.iter().position(|entry| entry == value.trim()) else {
        return Err(EditError::NotListed {
            field,
            value: value.to_string(),
        });
    };
    entries.remove(position);
    if entries.is_empty() {
        *list = None;
    }
    Ok(())
}
