//! Merged output writer: one row per canonical compound.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dcr_model::CanonicalCompound;

use crate::columns;
use crate::error::Result;
use crate::roster::{RosterOptions, join_names};
use crate::table::{StagedFile, stage_delimited};

/// How to lay out the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergedOptions {
    pub delimiter: char,
    /// Roster columns left out of the output.
    pub dropped_columns: Vec<String>,
    /// Name of the appended trial display column.
    pub trials_column: String,
}

impl Default for MergedOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            dropped_columns: columns::ROSTER_DROPPED
                .iter()
                .map(|column| (*column).to_string())
                .collect(),
            trials_column: columns::MERGED_TRIALS.to_string(),
        }
    }
}

/// Builds the merged header and rows without touching the filesystem.
///
/// Roster columns keep their order. Alias columns are re-joined, the status
/// column carries the augmented status, and the trial display column is
/// appended last. A trial column already present in the roster (a merged
/// file fed back in) is replaced, not duplicated.
pub fn merged_rows(
    roster_headers: &[String],
    compounds: &[CanonicalCompound],
    roster: &RosterOptions,
    options: &MergedOptions,
) -> (Vec<String>, Vec<Vec<String>>) {
    let is_dropped = |header: &str| {
        header.eq_ignore_ascii_case(&options.trials_column)
            || options
                .dropped_columns
                .iter()
                .any(|dropped| dropped.eq_ignore_ascii_case(header))
    };
    let kept: Vec<&String> = roster_headers
        .iter()
        .filter(|header| !is_dropped(header))
        .collect();

    let mut headers: Vec<String> = kept.iter().map(|header| (*header).clone()).collect();
    headers.push(options.trials_column.clone());

    let rows = compounds
        .iter()
        .map(|compound| {
            let mut row: Vec<String> = kept
                .iter()
                .map(|header| field_value(compound, header, roster))
                .collect();
            row.push(compound.trial_display.clone().unwrap_or_default());
            row
        })
        .collect();
    (headers, rows)
}

fn field_value(compound: &CanonicalCompound, header: &str, roster: &RosterOptions) -> String {
    if header.eq_ignore_ascii_case(&roster.compound_column) {
        compound.compound_name.clone()
    } else if header.eq_ignore_ascii_case(&roster.clinical_names_column) {
        join_names(&compound.clinical_names)
    } else if header.eq_ignore_ascii_case(&roster.other_names_column) {
        join_names(&compound.other_names)
    } else if header.eq_ignore_ascii_case(&roster.status_column) {
        compound.status.clone().unwrap_or_default()
    } else {
        compound.attribute(header).unwrap_or_default().to_string()
    }
}

pub fn write_merged(
    path: &Path,
    roster_headers: &[String],
    compounds: &[CanonicalCompound],
    roster: &RosterOptions,
    options: &MergedOptions,
) -> Result<()> {
    stage_merged(path, roster_headers, compounds, roster, options)?.commit()
}

/// Stages the merged output; see [`StagedFile`].
pub fn stage_merged(
    path: &Path,
    roster_headers: &[String],
    compounds: &[CanonicalCompound],
    roster: &RosterOptions,
    options: &MergedOptions,
) -> Result<StagedFile> {
    let (headers, rows) = merged_rows(roster_headers, compounds, roster, options);
    let headers: Vec<&str> = headers.iter().map(String::as_str).collect();
    stage_delimited(path, options.delimiter, &headers, &rows)
}
