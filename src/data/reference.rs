//! Reference data supplied from outside the dataset: which characters hold
//! omicron abilities (and in which game modes), which tag names are reserved
//! by categories/roles/alignments, and per-character ability counts.
//! Loaded from `data/reference.yaml`; a missing file means "no reference data".

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::character::same_tag;

pub const DEFAULT_REFERENCE_PATH: &str = "data/reference.yaml";

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("failed to read reference data '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse reference data YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Decides whether a character currently qualifies for an omicron bonus.
pub trait OmicronQualifier {
    fn qualifies_for_omicron(&self, character_id: &str) -> bool;
}

impl<F> OmicronQualifier for F
where
    F: Fn(&str) -> bool,
{
    fn qualifies_for_omicron(&self, character_id: &str) -> bool {
        self(character_id)
    }
}

/// Full reference-data surface consumed by validation and display code.
pub trait ReferenceProvider: OmicronQualifier {
    /// Case-insensitive lookup against category, role and alignment names.
    fn is_reserved_tag(&self, tag: &str) -> bool;
    fn ability_counts(&self, character_id: &str) -> Option<AbilityCounts>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCounts {
    #[serde(default)]
    pub zetas: u32,
    #[serde(default)]
    pub omicrons: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceData {
    /// Game modes whose omicrons count. Empty selects every mode.
    #[serde(default)]
    pub selected_omicron_modes: BTreeSet<String>,
    /// Character id -> modes in which it has an omicron ability.
    #[serde(default)]
    pub omicron_modes: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub abilities: BTreeMap<String, AbilityCounts>,
}

impl ReferenceData {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ReferenceError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ReferenceError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Load when the file exists, otherwise fall back to empty reference data.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!(
                "reference data not found at {}; no character qualifies for omicron bonuses",
                path.display()
            );
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

impl OmicronQualifier for ReferenceData {
    fn qualifies_for_omicron(&self, character_id: &str) -> bool {
        let Some(modes) = self.omicron_modes.get(character_id) else {
            return false;
        };
        if self.selected_omicron_modes.is_empty() {
            return !modes.is_empty();
        }
        modes
            .iter()
            .any(|mode| self.selected_omicron_modes.contains(mode))
    }
}

impl ReferenceProvider for ReferenceData {
    fn is_reserved_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|name| same_tag(name, tag))
    }

    fn ability_counts(&self, character_id: &str) -> Option<AbilityCounts> {
        self.abilities.get(character_id).copied()
    }
}
