//! Runtime settings read from the environment.

use std::env;

use crate::data::dataset::DEFAULT_DATASET_PATH;
use crate::data::reference::DEFAULT_REFERENCE_PATH;
use crate::parallel::WorkerPool;
use crate::tier::ResolveOptions;

pub const DATASET_ENV: &str = "TIERLIST_DATASET";
pub const REFERENCE_ENV: &str = "TIERLIST_REFERENCE";
pub const WORKERS_ENV: &str = "TIERLIST_WORKERS";
pub const SKIP_IF_PRESENT_ENV: &str = "TIERLIST_SKIP_IF_PRESENT";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dataset_path: String,
    pub reference_path: String,
    /// 0 uses every core.
    pub workers: usize,
    pub honor_skip_if_present: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            reference_path: DEFAULT_REFERENCE_PATH.to_string(),
            workers: 0,
            honor_skip_if_present: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or unparsable values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let workers = match lookup(WORKERS_ENV) {
            Some(raw) => raw.trim().parse::<usize>().unwrap_or_else(|_| {
                log::warn!("invalid {WORKERS_ENV} '{raw}', using all cores");
                defaults.workers
            }),
            None => defaults.workers,
        };
        Self {
            dataset_path: lookup(DATASET_ENV).unwrap_or(defaults.dataset_path),
            reference_path: lookup(REFERENCE_ENV).unwrap_or(defaults.reference_path),
            workers,
            honor_skip_if_present: lookup(SKIP_IF_PRESENT_ENV)
                .map(|v| v.trim() == "1" || v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.honor_skip_if_present),
        }
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            honor_skip_if_present: self.honor_skip_if_present,
            ..ResolveOptions::best_case()
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::with_workers(self.workers)
    }
}
