use std::fmt;

use serde::{Deserialize, Serialize};

/// A name curators decided never to chase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredEntry {
    pub drug_name: String,
    pub reason: Option<String>,
}

impl IgnoredEntry {
    pub fn new(drug_name: impl Into<String>) -> Self {
        Self {
            drug_name: drug_name.into(),
            reason: None,
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Outcome of the identifier lookup for a missing name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LookupStatus {
    /// The service returned at least one identifier.
    Found,
    /// The service answered and knows no such compound.
    NotFound,
    /// The request never completed; the name should be retried.
    Failed(String),
    /// No lookup was attempted (offline run).
    #[default]
    Skipped,
}

impl LookupStatus {
    /// Stable label written to the missing-list.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
        }
    }

    /// Parses a label written by [`LookupStatus::label`].
    ///
    /// Lists written before the status column existed have no label; a
    /// missing label is read back as [`LookupStatus::Skipped`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "found" => Some(Self::Found),
            "not_found" => Some(Self::NotFound),
            "failed" => Some(Self::Failed(String::new())),
            "skipped" | "" => Some(Self::Skipped),
            _ => None,
        }
    }

    /// Whether the service gave a definitive answer for this name.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Found | Self::NotFound)
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) if !reason.is_empty() => write!(f, "failed: {reason}"),
            other => f.write_str(other.label()),
        }
    }
}

/// A trial drug with no canonical match that is not on the ignore-list.
///
/// Recomputed every run; curators promote entries into the roster or the
/// ignore-list by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingEntry {
    pub drug_name: String,
    /// Lowercase normalized name; the sort and dedupe key.
    pub key: String,
    pub suggested_ids: Vec<String>,
    pub lookup: LookupStatus,
    /// Trials mentioning this name, first-seen order.
    pub trials: Vec<String>,
}

impl MissingEntry {
    pub fn new(drug_name: impl Into<String>) -> Self {
        let drug_name = drug_name.into();
        let key = drug_name.to_lowercase();
        Self {
            drug_name,
            key,
            suggested_ids: Vec::new(),
            lookup: LookupStatus::Skipped,
            trials: Vec::new(),
        }
    }
}
