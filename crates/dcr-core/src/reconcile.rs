//! The reconciliation pass: trial mentions against the compound roster.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use dcr_model::{
    CanonicalCompound, DrugMention, IgnoredEntry, MissingEntry, SynonymConflict, TrialDisplay,
    TrialRecord,
};
use dcr_normalization::{CaseVariant, NameNormalizer, RejectedToken, case_variants};

use crate::aggregate::{DuplicateTrials, TrialAggregator};
use crate::error::{ReconcileError, Result};
use crate::synonyms::SynonymIndex;

/// Status token marking compounds with at least one trial.
pub const DEFAULT_SENTINEL: &str = "Covid trial";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    pub sentinel: String,
    pub duplicates: DuplicateTrials,
    pub display: TrialDisplay,
    /// Fail the run on any synonym conflict instead of reporting it.
    pub strict_synonyms: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            duplicates: DuplicateTrials::default(),
            display: TrialDisplay::default(),
            strict_synonyms: false,
        }
    }
}

/// Mention counts. `matched + ignored + missing == mentions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    pub records: usize,
    pub mentions: usize,
    pub rejected: usize,
    pub matched: usize,
    pub ignored: usize,
    pub missing: usize,
    pub compounds_with_trials: usize,
    pub missing_names: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Roster compounds in input order, with trials and status filled in.
    pub compounds: Vec<CanonicalCompound>,
    /// Unmatched, not ignored, sorted by key then display. Not yet looked up.
    pub missing: Vec<MissingEntry>,
    pub conflicts: Vec<SynonymConflict>,
    pub rejected: Vec<RejectedToken>,
    pub case_variants: Vec<CaseVariant>,
    pub stats: ReconcileStats,
}

/// Adds the sentinel token to a status when the compound has trials.
///
/// The status is a comma-separated token list; a sentinel already present
/// (any case) leaves it unchanged, which keeps repeated runs stable.
pub fn apply_status(status: Option<&str>, sentinel: &str, has_trials: bool) -> Option<String> {
    let status = status.map(str::trim).filter(|s| !s.is_empty());
    if !has_trials {
        return status.map(str::to_string);
    }
    match status {
        None => Some(sentinel.to_string()),
        Some(existing)
            if existing
                .split(',')
                .any(|token| token.trim().eq_ignore_ascii_case(sentinel)) =>
        {
            Some(existing.to_string())
        }
        Some(existing) => Some(format!("{sentinel}, {existing}")),
    }
}

/// Reconciles trial records against the roster.
///
/// Every accepted mention lands in exactly one of matched, ignored or
/// missing; rejected tokens never reach matching.
pub fn reconcile(
    compounds: Vec<CanonicalCompound>,
    trials: &[TrialRecord],
    ignored: &[IgnoredEntry],
    normalizer: &NameNormalizer,
    options: &ReconcileOptions,
) -> Result<Reconciliation> {
    let span = info_span!("reconcile", compounds = compounds.len(), trials = trials.len());
    let _guard = span.enter();

    let (index, conflicts) = SynonymIndex::build(&compounds);
    if options.strict_synonyms
        && let Some(first) = conflicts.first()
    {
        return Err(ReconcileError::SynonymConflicts {
            count: conflicts.len(),
            first: first.clone(),
        });
    }

    let expansion = normalizer.expand(trials);
    let ignored_keys: HashSet<String> = ignored
        .iter()
        .filter_map(|entry| normalizer.normalize(&entry.drug_name))
        .map(|name| name.key)
        .collect();

    let mut matched: Vec<(usize, &DrugMention)> = Vec::new();
    let mut unmatched: Vec<&DrugMention> = Vec::new();
    let mut ignored_mentions = 0;
    for mention in &expansion.mentions {
        if let Some(position) = index.position_by_key(&mention.name.key) {
            matched.push((position, mention));
        } else if ignored_keys.contains(&mention.name.key) {
            ignored_mentions += 1;
        } else {
            unmatched.push(mention);
        }
    }
    debug!(
        matched = matched.len(),
        ignored = ignored_mentions,
        unmatched = unmatched.len(),
        "partitioned mentions"
    );

    let aggregator = TrialAggregator::new(options.duplicates, options.display);
    let groups = aggregator.aggregate(matched.iter().filter_map(|(position, mention)| {
        trials.get(mention.record).map(|trial| (*position, trial))
    }));

    let mut compounds = compounds;
    let mut with_trials = 0;
    for (position, compound) in compounds.iter_mut().enumerate() {
        // The index only hands out first-row positions; duplicates stay empty.
        match groups.get(&position) {
            Some(group) => {
                compound.trials = group.trial_ids.clone();
                compound.trial_display = Some(group.display.clone());
                with_trials += 1;
            }
            None => {
                compound.trials.clear();
                compound.trial_display = None;
            }
        }
        compound.status = apply_status(
            compound.status.as_deref(),
            &options.sentinel,
            compound.has_trials(),
        );
    }

    let missing = collect_missing(&unmatched, trials);
    let stats = ReconcileStats {
        records: trials.len(),
        mentions: expansion.mentions.len(),
        rejected: expansion.rejected.len(),
        matched: matched.len(),
        ignored: ignored_mentions,
        missing: unmatched.len(),
        compounds_with_trials: with_trials,
        missing_names: missing.len(),
    };
    info!(
        mentions = stats.mentions,
        matched = stats.matched,
        ignored = stats.ignored,
        missing = stats.missing,
        rejected = stats.rejected,
        conflicts = conflicts.len(),
        "reconciled trial mentions"
    );

    Ok(Reconciliation {
        compounds,
        missing,
        conflicts,
        case_variants: case_variants(&expansion.mentions),
        rejected: expansion.rejected,
        stats,
    })
}

/// One entry per key; the first-seen spelling is the display name.
fn collect_missing(unmatched: &[&DrugMention], trials: &[TrialRecord]) -> Vec<MissingEntry> {
    let mut by_key: HashMap<&str, MissingEntry> = HashMap::new();
    for mention in unmatched {
        let entry = by_key
            .entry(mention.name.key.as_str())
            .or_insert_with(|| MissingEntry::new(mention.name.display.clone()));
        if let Some(trial) = trials.get(mention.record)
            && !entry.trials.contains(&trial.trial_id)
        {
            entry.trials.push(trial.trial_id.clone());
        }
    }
    let mut missing: Vec<MissingEntry> = by_key.into_values().collect();
    missing.sort_by(|a, b| a.key.cmp(&b.key).then_with(|| a.drug_name.cmp(&b.drug_name)));
    missing
}
