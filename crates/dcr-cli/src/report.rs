//! Machine-readable run report.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use dcr_core::{ReconcileStats, ResolveStats};
use dcr_ingest::SkippedRecord;
use dcr_model::{MissingEntry, SynonymConflict};
use dcr_normalization::{CaseVariant, RejectedToken};

use crate::pipeline::{Inputs, RunOutcome};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: String,
    pub tool_version: &'static str,
    pub inputs: ReportInputs,
    pub stats: ReconcileStats,
    pub lookups: ResolveStats,
    pub skipped_trials: &'a [SkippedRecord],
    pub skipped_roster: &'a [SkippedRecord],
    pub conflicts: &'a [SynonymConflict],
    pub rejected: &'a [RejectedToken],
    pub case_variants: &'a [CaseVariant],
    pub missing: &'a [MissingEntry],
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportInputs {
    pub trials: String,
    pub roster: String,
    pub ignored_entries: usize,
    pub corrections: usize,
}

impl<'a> RunReport<'a> {
    pub fn new(inputs: &'a Inputs, outcome: &'a RunOutcome) -> Self {
        let reconciliation = &outcome.reconciliation;
        Self {
            generated_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION"),
            inputs: ReportInputs {
                trials: inputs.trials_path.display().to_string(),
                roster: inputs.roster_path.display().to_string(),
                ignored_entries: inputs.ignored.len(),
                corrections: inputs.normalizer.corrections().len(),
            },
            stats: reconciliation.stats,
            lookups: outcome.lookups,
            skipped_trials: &inputs.trials.skipped,
            skipped_roster: &inputs.roster.skipped,
            conflicts: &reconciliation.conflicts,
            rejected: &reconciliation.rejected,
            case_variants: &reconciliation.case_variants,
            missing: &reconciliation.missing,
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write run report {}", path.display()))
    }
}
