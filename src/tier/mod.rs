//! Tier resolution: effective tier and its explanation breakdown.

pub mod batch;
pub mod resolver;

pub use batch::{resolve_all, resolve_all_with_pool, OmicronGrantIndex};
pub use resolver::{
    best_synergy, clamp_tier, external_omicron, personal_omicron, resolve_character,
    resolve_tier, LineupPolicy, OmicronGrant, OmicronSource, ResolveOptions, TierBreakdown,
    TierResolution, BEST_CASE,
};
