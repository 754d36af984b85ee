pub mod character;
pub mod dataset;
pub mod reference;
pub mod requirements;

pub use character::{
    is_valid_character_id, same_tag, tag_key, CategoryDefinition, Character, SynergySet, DEFAULT_BASE_TIER,
    MAX_ENHANCEMENT, MAX_MATCHES_REQUIRED, MAX_TIER, MIN_ENHANCEMENT, MIN_MATCHES_REQUIRED,
    MIN_TIER,
};
pub use dataset::{Dataset, DatasetError, DEFAULT_DATASET_PATH, INDENT_UNIT};
pub use reference::{
    AbilityCounts, OmicronQualifier, ReferenceData, ReferenceError, ReferenceProvider,
    DEFAULT_REFERENCE_PATH,
};
pub use requirements::{summarize_requirements, Requirement, RequirementSummary};
