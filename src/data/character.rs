//! Character records as persisted in the tier dataset.
//! Field names are the camelCase keys of the JSON file; optional fields are
//! omitted when absent, and an empty list is a different value from no list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MIN_TIER: i64 = 1;
pub const MAX_TIER: i64 = 19;
/// Base tier given to a character created with only an id.
pub const DEFAULT_BASE_TIER: i64 = 10;
pub const MIN_ENHANCEMENT: i64 = 0;
pub const MAX_ENHANCEMENT: i64 = 10;
pub const MIN_MATCHES_REQUIRED: i64 = 1;
pub const MAX_MATCHES_REQUIRED: i64 = 4;

static CHARACTER_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9_]+$").expect("character id pattern compiles"));

/// True if `id` matches `^[A-Z0-9_]+$`.
pub fn is_valid_character_id(id: &str) -> bool {
    CHARACTER_ID_PATTERN.is_match(id)
}

/// Case-folded form used for every tag comparison. Full Unicode lowercase.
pub fn tag_key(tag: &str) -> String {
    tag.to_lowercase()
}

pub fn same_tag(a: &str, b: &str) -> bool {
    a == b || tag_key(a) == tag_key(b)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub base_tier: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omicron_boost: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_zetas: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_omicrons: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_all_zetas: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_all_omicrons: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy_sets: Option<Vec<SynergySet>>,
}

impl Character {
    /// A fresh record carrying only an id and the default base tier.
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_tier(id, DEFAULT_BASE_TIER)
    }

    pub fn with_tier(id: impl Into<String>, base_tier: i64) -> Self {
        Self {
            id: id.into(),
            base_tier,
            omicron_boost: None,
            categories: None,
            required_zetas: None,
            required_omicrons: None,
            requires_all_zetas: None,
            requires_all_omicrons: None,
            synergy_sets: None,
        }
    }

    pub fn categories(&self) -> &[String] {
        self.categories.as_deref().unwrap_or(&[])
    }

    pub fn synergy_sets(&self) -> &[SynergySet] {
        self.synergy_sets.as_deref().unwrap_or(&[])
    }

    /// Case-insensitive tag membership.
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories()
            .iter()
            .any(|existing| same_tag(existing, tag))
    }
}

/// Conditional bonus owned by one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynergySet {
    /// Bonus applied to the owner's own tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy_enhancement: Option<i64>,
    /// Bonus granted to explicitly listed characters when the owner qualifies for an omicron.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synergy_enhancement_omicron: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_if_present_characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_definitions: Option<Vec<CategoryDefinition>>,
}

impl SynergySet {
    pub fn characters(&self) -> &[String] {
        self.characters.as_deref().unwrap_or(&[])
    }

    pub fn skip_if_present_characters(&self) -> &[String] {
        self.skip_if_present_characters.as_deref().unwrap_or(&[])
    }

    pub fn category_definitions(&self) -> &[CategoryDefinition] {
        self.category_definitions.as_deref().unwrap_or(&[])
    }

    /// At least one of the two enhancement fields is present.
    pub fn has_enhancement(&self) -> bool {
        self.synergy_enhancement.is_some() || self.synergy_enhancement_omicron.is_some()
    }

    pub fn lists_character(&self, id: &str) -> bool {
        self.characters().iter().any(|listed| listed == id)
    }

    /// Positive standard bonus, if any.
    pub fn standard_bonus(&self) -> Option<i64> {
        self.synergy_enhancement.filter(|value| *value > 0)
    }

    /// Positive omicron bonus, if any.
    pub fn omicron_bonus(&self) -> Option<i64> {
        self.synergy_enhancement_omicron.filter(|value| *value > 0)
    }
}

/// Category-based teammate requirement inside a synergy set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,
    pub number_matches_required: i64,
}

impl CategoryDefinition {
    pub fn new(include: Vec<String>, number_matches_required: i64) -> Self {
        Self {
            include,
            exclude: None,
            number_matches_required,
        }
    }

    pub fn exclude(&self) -> &[String] {
        self.exclude.as_deref().unwrap_or(&[])
    }

    /// Candidate tags carry every `include` tag and no `exclude` tag.
    /// Tag comparison is case-insensitive.
    pub fn matches(&self, tags: &[String]) -> bool {
        let carries = |wanted: &String| tags.iter().any(|tag| same_tag(tag, wanted));
        !self.include.is_empty() && self.include.iter().all(carries) && !self.exclude().iter().any(carries)
    }

    /// Tags present in both `include` and `exclude`, compared case-insensitively.
    pub fn overlapping_tags(&self) -> Vec<String> {
        self.include
            .iter()
            .filter(|tag| {
                self.exclude()
                    .iter()
                    .any(|excluded| same_tag(excluded, tag))
            })
            .cloned()
            .collect()
    }
}
