//! Whole-dataset tier resolution.
//!
//! Omicron grants are indexed once per dataset, then every character is
//! resolved in parallel against that index. Results are identical to calling
//! [resolve_character](crate::tier::resolve_character) per character.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::data::dataset::Dataset;
use crate::data::reference::OmicronQualifier;
use crate::parallel::WorkerPool;
use crate::tier::resolver::{resolve_with_grant, OmicronGrant, ResolveOptions, TierResolution};

/// Best externally granted omicron bonus per target id.
#[derive(Debug, Clone, Default)]
pub struct OmicronGrantIndex {
    best: HashMap<String, OmicronGrant>,
}

impl OmicronGrantIndex {
    /// Grantors are visited in dataset order and sets in ordinal order; a later
    /// grant replaces an earlier one only when strictly larger.
    pub fn build<Q>(dataset: &Dataset, qualifier: &Q, options: &ResolveOptions) -> Self
    where
        Q: OmicronQualifier + ?Sized,
    {
        let mut best: HashMap<String, OmicronGrant> = HashMap::new();
        for grantor in dataset.characters() {
            if !qualifier.qualifies_for_omicron(&grantor.id) {
                continue;
            }
            for (set_index, set) in grantor.synergy_sets().iter().enumerate() {
                let Some(value) = set.omicron_bonus() else {
                    continue;
                };
                if options.is_voided(set) {
                    continue;
                }
                for target in set.characters() {
                    if *target == grantor.id {
                        continue;
                    }
                    let replace = best
                        .get(target)
                        .map_or(true, |current| value > current.value);
                    if replace {
                        best.insert(
                            target.clone(),
                            OmicronGrant {
                                grantor: grantor.id.clone(),
                                set_index,
                                value,
                            },
                        );
                    }
                }
            }
        }
        Self { best }
    }

    pub fn grant_for(&self, character_id: &str) -> Option<&OmicronGrant> {
        self.best.get(character_id)
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// Resolve every character, in dataset order, on the global rayon pool.
pub fn resolve_all<Q>(dataset: &Dataset, qualifier: &Q, options: &ResolveOptions) -> Vec<TierResolution>
where
    Q: OmicronQualifier + ?Sized,
{
    // Qualification is asked once per character up front so the parallel
    // stage only needs a Sync id set, not a Sync qualifier.
    let qualifying: HashSet<&str> = dataset
        .characters()
        .iter()
        .map(|c| c.id.as_str())
        .filter(|id| qualifier.qualifies_for_omicron(id))
        .collect();
    let qualifies = |id: &str| qualifying.contains(id);
    let grants = OmicronGrantIndex::build(dataset, &qualifies, options);

    dataset
        .characters()
        .par_iter()
        .map(|character| {
            resolve_with_grant(character, grants.grant_for(&character.id), &qualifies, options)
        })
        .collect()
}

/// [resolve_all] on a pool with a fixed worker count.
pub fn resolve_all_with_pool<Q>(
    dataset: &Dataset,
    qualifier: &Q,
    options: &ResolveOptions,
    pool: &WorkerPool,
) -> Vec<TierResolution>
where
    Q: OmicronQualifier + Sync + ?Sized,
{
    pool.install(|| resolve_all(dataset, qualifier, options))
}
