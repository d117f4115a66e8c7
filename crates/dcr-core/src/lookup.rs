//! Identifier lookup seam and the missing-entry resolution pass.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use dcr_model::{LookupStatus, MissingEntry};

#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("lookup of '{name}' failed after {attempts} attempt(s): {reason}")]
    Transport {
        name: String,
        attempts: u32,
        reason: String,
    },

    #[error("invalid lookup URL template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("failed to build lookup client: {0}")]
    Client(String),
}

/// Resolves a drug name to compound identifiers.
///
/// An empty vector means the service answered and knows no such compound.
pub trait CompoundLookup {
    fn lookup(&self, name: &str) -> Result<Vec<String>, LookupError>;
}

impl<T: CompoundLookup + ?Sized> CompoundLookup for &T {
    fn lookup(&self, name: &str) -> Result<Vec<String>, LookupError> {
        (**self).lookup(name)
    }
}

/// Maps a lookup result onto the missing-list status.
pub fn lookup_status(result: &Result<Vec<String>, LookupError>) -> LookupStatus {
    match result {
        Ok(ids) if ids.is_empty() => LookupStatus::NotFound,
        Ok(_) => LookupStatus::Found,
        Err(err) => LookupStatus::Failed(err.to_string()),
    }
}

/// Settled answers from an earlier run, keyed by normalized name.
#[derive(Debug, Clone, Default)]
pub struct LookupCache {
    entries: HashMap<String, (Vec<String>, LookupStatus)>,
}

impl LookupCache {
    /// Seeds the cache from a previous missing-list.
    ///
    /// Failed and skipped entries are left out so they get queried again.
    pub fn from_entries(entries: &[MissingEntry]) -> Self {
        let entries = entries
            .iter()
            .filter(|entry| entry.lookup.is_settled())
            .map(|entry| {
                (
                    entry.key.clone(),
                    (entry.suggested_ids.clone(), entry.lookup.clone()),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<(&[String], &LookupStatus)> {
        self.entries
            .get(key)
            .map(|(ids, status)| (ids.as_slice(), status))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counts from one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    pub queried: usize,
    pub cached: usize,
    pub found: usize,
    pub not_found: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ResolveStats {
    fn record(&mut self, status: &LookupStatus) {
        match status {
            LookupStatus::Found => self.found += 1,
            LookupStatus::NotFound => self.not_found += 1,
            LookupStatus::Failed(_) => self.failed += 1,
            LookupStatus::Skipped => self.skipped += 1,
        }
    }
}

/// Attaches identifiers and a lookup status to each missing entry.
///
/// Cached answers are reused without a request. With no lookup (offline
/// run) uncached entries are marked skipped. A failed lookup affects only
/// its own entry. `on_progress` is called once per entry.
pub fn resolve_missing<F>(
    entries: &mut [MissingEntry],
    lookup: Option<&dyn CompoundLookup>,
    cache: &LookupCache,
    mut on_progress: F,
) -> ResolveStats
where
    F: FnMut(&MissingEntry),
{
    let span = info_span!("resolve_missing", entries = entries.len());
    let _guard = span.enter();
    let mut stats = ResolveStats::default();

    for entry in entries.iter_mut() {
        if let Some((ids, status)) = cache.get(&entry.key) {
            entry.suggested_ids = ids.to_vec();
            entry.lookup = status.clone();
            stats.cached += 1;
        } else if let Some(lookup) = lookup {
            let result = lookup.lookup(&entry.drug_name);
            stats.queried += 1;
            entry.lookup = lookup_status(&result);
            match result {
                Ok(ids) => {
                    debug!(name = %entry.drug_name, ids = ids.len(), "lookup answered");
                    entry.suggested_ids = ids;
                }
                Err(err) => {
                    warn!(name = %entry.drug_name, error = %err, "lookup failed");
                    entry.suggested_ids.clear();
                }
            }
        } else {
            entry.suggested_ids.clear();
            entry.lookup = LookupStatus::Skipped;
        }
        stats.record(&entry.lookup);
        on_progress(entry);
    }

    info!(
        queried = stats.queried,
        cached = stats.cached,
        found = stats.found,
        not_found = stats.not_found,
        failed = stats.failed,
        skipped = stats.skipped,
        "resolved missing entries"
    );
    stats
}
