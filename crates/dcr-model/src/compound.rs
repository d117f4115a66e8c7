use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The authoritative record for one drug, keyed by `compound_name`.
///
/// Loaded from the curated roster. Only `trials`, `trial_display` and `status`
/// change during reconciliation; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalCompound {
    pub compound_name: String,
    pub clinical_names: Vec<String>,
    pub other_names: Vec<String>,
    pub status: Option<String>,
    /// Trial IDs attached by reconciliation, in first-seen order.
    #[serde(default)]
    pub trials: Vec<String>,
    /// Joined display string for `trials`.
    #[serde(default)]
    pub trial_display: Option<String>,
    /// Remaining roster columns in file order.
    #[serde(default)]
    pub attributes: Vec<(String, String)>,
}

impl CanonicalCompound {
    pub fn new(compound_name: impl Into<String>) -> Self {
        Self {
            compound_name: compound_name.into(),
            clinical_names: Vec::new(),
            other_names: Vec::new(),
            status: None,
            trials: Vec::new(),
            trial_display: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clinical_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clinical_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_other_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_names = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        let status = status.into();
        self.status = if status.trim().is_empty() {
            None
        } else {
            Some(status)
        };
        self
    }

    /// All names this compound answers to, its own name first.
    ///
    /// Deduplicated case-insensitively; blank names are dropped.
    pub fn synonyms(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        std::iter::once(self.compound_name.as_str())
            .chain(self.clinical_names.iter().map(String::as_str))
            .chain(self.other_names.iter().map(String::as_str))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.to_lowercase()))
            .collect()
    }

    pub fn has_trials(&self) -> bool {
        !self.trials.is_empty()
    }

    /// Looks up a pass-through roster column by name.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}
