//! Zeta/omicron requirement summaries for display. Not used by tier math.

use serde::Serialize;

use crate::data::character::Character;
use crate::data::reference::ReferenceProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Requirement {
    /// No override: every ability of this kind is required.
    All { total: Option<u32> },
    /// Override present; `abilities` may be empty.
    #[serde(rename_all = "camelCase")]
    Listed {
        abilities: Vec<String>,
        requires_all: bool,
        total: Option<u32>,
    },
}

impl Requirement {
    fn from_override(listed: Option<&Vec<String>>, requires_all: Option<bool>, total: Option<u32>) -> Self {
        match listed {
            None => Self::All { total },
            Some(abilities) => Self::Listed {
                abilities: abilities.clone(),
                requires_all: requires_all.unwrap_or(true),
                total,
            },
        }
    }

    /// Number of abilities a player must have, when it can be known.
    pub fn required_count(&self) -> Option<u32> {
        match self {
            Self::All { total } => *total,
            Self::Listed {
                abilities,
                requires_all: true,
                ..
            } => u32::try_from(abilities.len()).ok(),
            Self::Listed { abilities, .. } if abilities.is_empty() => Some(0),
            Self::Listed { .. } => Some(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementSummary {
    pub zetas: Requirement,
    pub omicrons: Requirement,
}

pub fn summarize_requirements<R>(character: &Character, reference: &R) -> RequirementSummary
where
    R: ReferenceProvider + ?Sized,
{
    let counts = reference.ability_counts(&character.id);
    RequirementSummary {
        zetas: Requirement::from_override(
            character.required_zetas.as_ref(),
            character.requires_all_zetas,
            counts.map(|c| c.zetas),
        ),
        omicrons: Requirement::from_override(
            character.required_omicrons.as_ref(),
            character.requires_all_omicrons,
            counts.map(|c| c.omicrons),
        ),
    }
}
