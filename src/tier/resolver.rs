//! Effective tier of one character: base tier minus the best omicron bonus
//! (own or granted by another character) minus the best own synergy bonus,
//! clamped to the tier range.

use serde::{Serialize, Serializer};

use crate::data::character::{Character, SynergySet, MAX_TIER, MIN_TIER};
use crate::data::dataset::Dataset;
use crate::data::reference::OmicronQualifier;
use crate::synergy::matches_for_omicron_bonus;

/// Which teammates are assumed to be on the field when bonuses are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineupPolicy {
    /// Every declared synergy is assumed achievable; no roster is simulated
    /// and the evaluated lineup is empty.
    #[default]
    BestCase,
}

pub const BEST_CASE: LineupPolicy = LineupPolicy::BestCase;

impl LineupPolicy {
    /// Characters known to be present alongside the target.
    pub fn lineup(&self) -> &'static [String] {
        match self {
            Self::BestCase => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    pub lineup: LineupPolicy,
    /// Void sets whose `skipIfPresentCharacters` appear in the lineup.
    /// A no-op under [LineupPolicy::BestCase].
    pub honor_skip_if_present: bool,
}

impl ResolveOptions {
    pub fn best_case() -> Self {
        Self {
            lineup: BEST_CASE,
            honor_skip_if_present: false,
        }
    }

    pub(crate) fn is_voided(&self, set: &SynergySet) -> bool {
        if !self.honor_skip_if_present {
            return false;
        }
        let lineup = self.lineup.lineup();
        set.skip_if_present_characters()
            .iter()
            .any(|id| lineup.contains(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmicronSource {
    /// The character's own omicron.
    Personal,
    /// Granted by another character's synergy set.
    GrantedBy(String),
}

impl Serialize for OmicronSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Personal => serializer.serialize_str("self"),
            Self::GrantedBy(id) => serializer.serialize_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OmicronGrant {
    pub grantor: String,
    pub set_index: usize,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBreakdown {
    pub base_tier: i64,
    pub personal_omicron: i64,
    pub external_omicron: i64,
    pub applied_omicron: i64,
    pub omicron_source: Option<OmicronSource>,
    pub best_synergy: i64,
    /// Ordinal of the own synergy set that produced `best_synergy`.
    pub winning_set: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierResolution {
    pub character_id: String,
    pub final_tier: i64,
    pub breakdown: TierBreakdown,
}

pub fn clamp_tier(tier: i64) -> i64 {
    tier.clamp(MIN_TIER, MAX_TIER)
}

/// `omicronBoost` (default 1) when the character qualifies, else 0.
pub fn personal_omicron<Q>(character: &Character, qualifier: &Q) -> i64
where
    Q: OmicronQualifier + ?Sized,
{
    if qualifier.qualifies_for_omicron(&character.id) {
        character.omicron_boost.unwrap_or(1)
    } else {
        0
    }
}

/// Largest omicron bonus another qualifying character grants to `target` by
/// listing it explicitly. Ties keep the first grantor in dataset order.
pub fn external_omicron<Q>(
    target: &Character,
    dataset: &Dataset,
    qualifier: &Q,
    options: &ResolveOptions,
) -> Option<OmicronGrant>
where
    Q: OmicronQualifier + ?Sized,
{
    let mut best: Option<OmicronGrant> = None;
    for grantor in dataset.characters() {
        if grantor.id == target.id || !qualifier.qualifies_for_omicron(&grantor.id) {
            continue;
        }
        for (set_index, set) in grantor.synergy_sets().iter().enumerate() {
            let Some(value) = set.omicron_bonus() else {
                continue;
            };
            if options.is_voided(set) || !matches_for_omicron_bonus(set, target) {
                continue;
            }
            if best.as_ref().map_or(true, |current| value > current.value) {
                best = Some(OmicronGrant {
                    grantor: grantor.id.clone(),
                    set_index,
                    value,
                });
            }
        }
    }
    best
}

/// Best own standard synergy bonus and the set that carries it.
/// Ties keep the lowest set ordinal.
pub fn best_synergy(target: &Character, options: &ResolveOptions) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (index, set) in target.synergy_sets().iter().enumerate() {
        let Some(value) = set.standard_bonus() else {
            continue;
        };
        if options.is_voided(set) {
            continue;
        }
        if best.map_or(true, |(_, current)| value > current) {
            best = Some((index, value));
        }
    }
    best
}

/// Combine the components once the external grant is known. Shared by the
/// single-character path and batch resolution.
pub(crate) fn resolve_with_grant<Q>(
    target: &Character,
    grant: Option<&OmicronGrant>,
    qualifier: &Q,
    options: &ResolveOptions,
) -> TierResolution
where
    Q: OmicronQualifier + ?Sized,
{
    let personal = personal_omicron(target, qualifier);
    let external = grant.map_or(0, |g| g.value);

    let (applied_omicron, omicron_source) = if personal > 0 && personal >= external {
        (personal, Some(OmicronSource::Personal))
    } else if let Some(grant) = grant.filter(|g| g.value > 0) {
        (grant.value, Some(OmicronSource::GrantedBy(grant.grantor.clone())))
    } else {
        (personal.max(0), None)
    };

    let (winning_set, synergy) = match best_synergy(target, options) {
        Some((index, value)) => (Some(index), value),
        None => (None, 0),
    };

    let final_tier = clamp_tier(
        target
            .base_tier
            .saturating_sub(applied_omicron)
            .saturating_sub(synergy),
    );

    log::debug!(
        "{}: base {} - omicron {} ({:?}) - synergy {} => tier {}",
        target.id,
        target.base_tier,
        applied_omicron,
        omicron_source,
        synergy,
        final_tier
    );

    TierResolution {
        character_id: target.id.clone(),
        final_tier,
        breakdown: TierBreakdown {
            base_tier: target.base_tier,
            personal_omicron: personal,
            external_omicron: external,
            applied_omicron,
            omicron_source,
            best_synergy: synergy,
            winning_set,
        },
    }
}

pub fn resolve_character<Q>(
    target: &Character,
    dataset: &Dataset,
    qualifier: &Q,
    options: &ResolveOptions,
) -> TierResolution
where
    Q: OmicronQualifier + ?Sized,
{
    let grant = external_omicron(target, dataset, qualifier, options);
    resolve_with_grant(target, grant.as_ref(), qualifier, options)
}

/// Resolve by id with the best-case policy. `None` when the id is not in the dataset.
pub fn resolve_tier<Q>(character_id: &str, dataset: &Dataset, qualifier: &Q) -> Option<TierResolution>
where
    Q: OmicronQualifier + ?Sized,
{
    let target = dataset.get(character_id)?;
    Some(resolve_character(
        target,
        dataset,
        qualifier,
        &ResolveOptions::best_case(),
    ))
}
