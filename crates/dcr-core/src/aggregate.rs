//! Grouping trial records per drug.
//!
//! Cardinality: one group per key, one entry per trial in a group (or per
//! mention with [`DuplicateTrials::Keep`]).

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use dcr_model::{DrugMention, TrialDisplay, TrialRecord};

/// What to do when the same trial reaches a group more than once.
///
/// Happens when a trial lists two aliases of one compound, or repeats a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTrials {
    /// Keep the first occurrence of each trial id.
    #[default]
    Collapse,
    /// Keep every occurrence, one per mention.
    Keep,
}

/// Trials attached to one drug.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrialGroup {
    pub trial_ids: Vec<String>,
    /// Display tokens joined with `", "`, same order as `trial_ids`.
    pub display: String,
}

/// Groups in first-seen order.
#[derive(Debug, Clone)]
pub struct TrialGroups<K = String> {
    order: Vec<K>,
    groups: HashMap<K, TrialGroup>,
}

impl<K: Eq + Hash> TrialGroups<K> {
    pub fn get<Q>(&self, key: &Q) -> Option<&TrialGroup>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &TrialGroup)> {
        self.order
            .iter()
            .filter_map(|key| self.groups.get(key).map(|group| (key, group)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TrialAggregator {
    pub duplicates: DuplicateTrials,
    pub display: TrialDisplay,
}

impl TrialAggregator {
    pub fn new(duplicates: DuplicateTrials, display: TrialDisplay) -> Self {
        Self {
            duplicates,
            display,
        }
    }

    /// Groups `(key, trial)` pairs, keeping first-seen order of both keys
    /// and trials.
    pub fn aggregate<'a, K, I>(&self, entries: I) -> TrialGroups<K>
    where
        K: Eq + Hash + Clone,
        I: IntoIterator<Item = (K, &'a TrialRecord)>,
    {
        let mut order: Vec<K> = Vec::new();
        let mut tokens: HashMap<K, (Vec<String>, Vec<String>)> = HashMap::new();
        let mut seen: HashSet<(K, &str)> = HashSet::new();

        for (key, trial) in entries {
            if self.duplicates == DuplicateTrials::Collapse
                && !seen.insert((key.clone(), trial.trial_id.as_str()))
            {
                continue;
            }
            let (ids, display) = tokens.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                (Vec::new(), Vec::new())
            });
            ids.push(trial.trial_id.clone());
            display.push(trial.display_token(self.display));
        }

        let groups = tokens
            .into_iter()
            .map(|(key, (trial_ids, display))| {
                (
                    key,
                    TrialGroup {
                        trial_ids,
                        display: display.join(", "),
                    },
                )
            })
            .collect();
        TrialGroups { order, groups }
    }

    /// Groups mentions by their normalized key.
    pub fn aggregate_mentions<'m>(
        &self,
        mentions: &'m [DrugMention],
        records: &[TrialRecord],
    ) -> TrialGroups<&'m str> {
        self.aggregate(
            mentions
                .iter()
                .filter_map(|m| records.get(m.record).map(|r| (m.name.key.as_str(), r))),
        )
    }
}
