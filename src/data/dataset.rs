//! In-memory dataset snapshot: load, lookup, ordering and canonical persistence.
//!
//! The persisted form is one JSON array of characters sorted by id
//! (case-sensitive, ascending) and indented with [INDENT_UNIT] spaces.
//! Saves replace the whole file at once; concurrent writers are not
//! coordinated, the last save wins.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::data::character::{is_valid_character_id, Character};

pub const DEFAULT_DATASET_PATH: &str = "data/characters.json";
/// Spaces per nesting level in the persisted file.
pub const INDENT_UNIT: usize = 2;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to render dataset JSON: {0}")]
    Render(#[source] serde_json::Error),
    #[error("expected top-level JSON array or {{ \"characters\": [...] }}")]
    MissingRoot,
    #[error("character id '{0}' does not match ^[A-Z0-9_]+$")]
    InvalidId(String),
    #[error("character id '{0}' already exists")]
    DuplicateId(String),
    #[error("failed to write dataset '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Locate the character array in a parsed dataset document.
pub fn root_entries(payload: &Value) -> Option<&Vec<Value>> {
    payload
        .as_array()
        .or_else(|| payload.get("characters").and_then(Value::as_array))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    characters: Vec<Character>,
}

impl Dataset {
    pub fn new(characters: Vec<Character>) -> Self {
        Self { characters }
    }

    /// Structural load. Unknown fields and out-of-range values are accepted
    /// here and left for the integrity validator to report.
    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let payload: Value = serde_json::from_str(raw)?;
        let entries = root_entries(&payload).ok_or(DatasetError::MissingRoot)?;
        let characters = entries
            .iter()
            .map(|entry| serde_json::from_value(entry.clone()))
            .collect::<Result<Vec<Character>, _>>()?;
        Ok(Self { characters })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = read_text(path)?;
        let dataset = Self::from_json_str(&raw)?;
        log::info!(
            "loaded {} characters from {}",
            dataset.len(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|character| character.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add a record with only an id and the default base tier, keeping id order.
    pub fn create_character(&mut self, id: &str) -> Result<&Character, DatasetError> {
        if !is_valid_character_id(id) {
            return Err(DatasetError::InvalidId(id.to_string()));
        }
        if self.contains(id) {
            return Err(DatasetError::DuplicateId(id.to_string()));
        }
        let position = self.insertion_point(id);
        self.characters.insert(position, Character::new(id));
        Ok(&self.characters[position])
    }

    /// Replace the record with the same id, or insert it in id order.
    pub fn upsert(&mut self, record: Character) {
        match self.characters.iter().position(|c| c.id == record.id) {
            Some(index) => self.characters[index] = record,
            None => {
                let position = self.insertion_point(&record.id);
                self.characters.insert(position, record);
            }
        }
    }

    fn insertion_point(&self, id: &str) -> usize {
        self.characters
            .iter()
            .position(|existing| existing.id.as_str() > id)
            .unwrap_or(self.characters.len())
    }

    /// Restore canonical order: ascending, case-sensitive by id. Stable for equal ids.
    pub fn sort_by_id(&mut self) {
        self.characters.sort_by(|a, b| a.id.cmp(&b.id));
    }

    pub fn is_sorted_by_id(&self) -> bool {
        self.characters.windows(2).all(|pair| pair[0].id <= pair[1].id)
    }

    /// Sorted, two-space indented JSON array with a trailing newline.
    pub fn to_canonical_json(&self) -> Result<String, DatasetError> {
        let mut sorted = self.clone();
        sorted.sort_by_id();
        let mut rendered =
            serde_json::to_string_pretty(&sorted.characters).map_err(DatasetError::Render)?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Write the canonical form to a sibling temp file, then rename over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let rendered = self.to_canonical_json()?;
        let tmp = path.with_extension("json.tmp");
        let write_err = |source| DatasetError::Write {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(&tmp, rendered).map_err(write_err)?;
        fs::rename(&tmp, path).map_err(write_err)?;
        log::info!("saved {} characters to {}", self.len(), path.display());
        Ok(())
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_array_and_wrapped_roots() {
        let array = Dataset::from_json_str(r#"[{"id":"A","baseTier":3}]"#).unwrap();
        let wrapped =
            Dataset::from_json_str(r#"{"characters":[{"id":"A","baseTier":3}]}"#).unwrap();
        assert_eq!(array, wrapped);
        assert!(matches!(
            Dataset::from_json_str(r#"{"roster":[]}"#),
            Err(DatasetError::MissingRoot)
        ));
    }

    #[test]
    fn malformed_json_is_a_structural_error() {
        assert!(matches!(
            Dataset::from_json_str("[{\"id\": "),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn create_character_keeps_order_and_rejects_bad_ids() {
        let mut dataset = Dataset::new(vec![Character::new("ALPHA"), Character::new("GAMMA")]);
        dataset.create_character("BETA").unwrap();
        let ids: Vec<_> = dataset.characters().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ALPHA", "BETA", "GAMMA"]);

        assert!(matches!(
            dataset.create_character("BETA"),
            Err(DatasetError::DuplicateId(_))
        ));
        assert!(matches!(
            dataset.create_character("beta"),
            Err(DatasetError::InvalidId(_))
        ));
    }

    #[test]
    fn canonical_json_is_sorted_and_two_space_indented() {
        let dataset = Dataset::new(vec![Character::with_tier("B", 2), Character::with_tier("A", 1)]);
        let rendered = dataset.to_canonical_json().unwrap();
        assert!(rendered.starts_with("[\n  {\n    \"id\": \"A\""));
        assert!(rendered.ends_with("]\n"));
    }

    #[test]
    fn sort_is_case_sensitive() {
        let mut dataset = Dataset::new(vec![Character::new("b"), Character::new("B"), Character::new("A")]);
        dataset.sort_by_id();
        let ids: Vec<_> = dataset.characters().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "b"]);
        assert!(dataset.is_sorted_by_id());
    }
}
