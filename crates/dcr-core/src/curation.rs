//! Helpers for the hand-curated lists.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use dcr_model::{DrugMention, IgnoredEntry, LookupStatus, MissingEntry, TrialRecord};

/// Trial type whose drugs are never bulk-ignored.
pub const DEFAULT_KEPT_TRIAL_TYPE: &str = "Drug Repurposing";

/// Proposes ignore-list rows for missing names the lookup service does not
/// know.
///
/// The reason is the type of the first trial mentioning the name that is not
/// of `kept_type`. Names only seen in `kept_type` trials, names with
/// identifiers, and names whose lookup failed or never ran are left alone.
pub fn unresolved_ignores(
    missing: &[MissingEntry],
    trials: &[TrialRecord],
    kept_type: &str,
) -> Vec<IgnoredEntry> {
    let types: HashMap<&str, &str> = trials
        .iter()
        .map(|trial| (trial.trial_id.as_str(), trial.trial_type.as_str()))
        .collect();
    let mut seen = HashSet::new();
    missing
        .iter()
        .filter(|entry| entry.lookup == LookupStatus::NotFound && entry.suggested_ids.is_empty())
        .filter_map(|entry| {
            let reason = entry
                .trials
                .iter()
                .filter_map(|id| types.get(id.as_str()))
                .find(|trial_type| !trial_type.eq_ignore_ascii_case(kept_type))?;
            seen.insert(entry.drug_name.clone()).then(|| {
                let ignored = IgnoredEntry::new(entry.drug_name.clone());
                if reason.is_empty() {
                    ignored
                } else {
                    ignored.with_reason(*reason)
                }
            })
        })
        .collect()
}

/// Mentions of one display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionCount {
    pub name: String,
    pub mentions: usize,
    pub trials: usize,
}

/// Mentions per display name, highest first, ties by name.
pub fn mention_counts(mentions: &[DrugMention]) -> Vec<MentionCount> {
    let mut counts: HashMap<&str, (usize, BTreeSet<usize>)> = HashMap::new();
    for mention in mentions {
        let (count, records) = counts.entry(mention.name.display.as_str()).or_default();
        *count += 1;
        records.insert(mention.record);
    }
    let mut counts: Vec<MentionCount> = counts
        .into_iter()
        .map(|(name, (mentions, records))| MentionCount {
            name: name.to_string(),
            mentions,
            trials: records.len(),
        })
        .collect();
    counts.sort_by(|a, b| b.mentions.cmp(&a.mentions).then_with(|| a.name.cmp(&b.name)));
    counts
}

/// Distinct trial types in first-seen order, blanks skipped.
pub fn trial_types(trials: &[TrialRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    trials
        .iter()
        .map(|trial| trial.trial_type.trim())
        .filter(|trial_type| !trial_type.is_empty() && seen.insert(*trial_type))
        .map(str::to_string)
        .collect()
}
