use serde::{Deserialize, Serialize};

/// How a trial is rendered in the joined display column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialDisplay {
    /// `<a href="URL">ID</a>` when a URL is known, the bare ID otherwise.
    #[default]
    Html,
    /// The bare trial ID.
    Id,
}

/// One row of the trial registry export.
///
/// `raw_drug_field` is the untouched drug column; it may name several drugs
/// joined by commas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_id: String,
    pub trial_url: Option<String>,
    pub raw_drug_field: String,
    pub trial_type: String,
    pub title: Option<String>,
    /// `Ctl` column: whether the trial has a control arm.
    pub controlled: Option<bool>,
    /// `MA` column: whether the record is a meta-analysis.
    pub meta_analysis: Option<bool>,
}

impl TrialRecord {
    pub fn new(trial_id: impl Into<String>, raw_drug_field: impl Into<String>) -> Self {
        Self {
            trial_id: trial_id.into(),
            trial_url: None,
            raw_drug_field: raw_drug_field.into(),
            trial_type: String::new(),
            title: None,
            controlled: None,
            meta_analysis: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.trial_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, trial_type: impl Into<String>) -> Self {
        self.trial_type = trial_type.into();
        self
    }

    /// Renders this trial for the joined display column.
    pub fn display_token(&self, style: TrialDisplay) -> String {
        match (style, self.trial_url.as_deref()) {
            (TrialDisplay::Html, Some(url)) => {
                format!("<a href=\"{url}\">{}</a>", self.trial_id)
            }
            _ => self.trial_id.clone(),
        }
    }
}
