//! Trial registry export reader.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use dcr_model::TrialRecord;

use crate::columns;
use crate::error::Result;
use crate::table::{DelimitedTable, cell, optional_cell};

/// How to read the trial export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialSourceOptions {
    pub delimiter: char,
    /// The export mixes encodings in free-text titles; windows-1252 decodes
    /// every byte.
    pub encoding: String,
    pub id_column: String,
    pub drugs_column: String,
    pub type_column: String,
}

impl Default for TrialSourceOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            encoding: "windows-1252".to_string(),
            id_column: columns::TRIAL_ID.to_string(),
            drugs_column: columns::TRIAL_DRUGS.to_string(),
            type_column: columns::TRIAL_TYPE.to_string(),
        }
    }
}

/// A row excluded from the run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub line: u64,
    pub reason: String,
}

/// Parsed trial export.
#[derive(Debug, Clone, Default)]
pub struct TrialLoad {
    pub records: Vec<TrialRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// `<a href="URL">ID</a>` as exported by the registry.
static ANCHOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<a href="([^"]*)">([^<]*)</a>"#).expect("Invalid trial anchor regex")
});

/// Reads the trial export.
///
/// Missing identifier or drug columns abort the read. Individual rows that
/// cannot be parsed are skipped and listed in [`TrialLoad::skipped`].
pub fn read_trials(path: &Path, options: &TrialSourceOptions) -> Result<TrialLoad> {
    let table = DelimitedTable::read(path, options.delimiter, &options.encoding)?;
    let load = trials_from_table(&table, options)?;
    info!(
        path = %path.display(),
        records = load.records.len(),
        skipped = load.skipped.len(),
        "read trial export"
    );
    Ok(load)
}

pub fn trials_from_table(table: &DelimitedTable, options: &TrialSourceOptions) -> Result<TrialLoad> {
    let id_idx = table.require(&options.id_column)?;
    let drugs_idx = table.require(&options.drugs_column)?;
    let index = table.columns();
    let type_idx = index.get(&options.type_column);
    let title_idx = index.get(columns::TRIAL_TITLE);
    let controlled_idx = index.get(columns::TRIAL_CONTROLLED);
    let meta_idx = index.get(columns::TRIAL_META_ANALYSIS);

    let mut load = TrialLoad::default();
    for (line, row) in &table.rows {
        let Some(id_cell) = cell(row, id_idx) else {
            load.skip(*line, format!("row has no '{}' cell", options.id_column));
            continue;
        };
        let Some(drugs) = cell(row, drugs_idx) else {
            load.skip(*line, format!("row has no '{}' cell", options.drugs_column));
            continue;
        };
        let (trial_id, trial_url) = match parse_trial_id(id_cell) {
            Ok(parsed) => parsed,
            Err(reason) => {
                load.skip(*line, reason);
                continue;
            }
        };
        load.records.push(TrialRecord {
            trial_id,
            trial_url,
            raw_drug_field: drugs.to_string(),
            trial_type: optional_cell(row, type_idx).unwrap_or_default(),
            title: optional_cell(row, title_idx),
            controlled: optional_cell(row, controlled_idx).and_then(|v| parse_flag(&v)),
            meta_analysis: optional_cell(row, meta_idx).and_then(|v| parse_flag(&v)),
        });
    }
    Ok(load)
}

/// Splits an identifier cell into trial ID and URL.
///
/// The cell is either a bare ID or an anchor whose text is the ID. An anchor
/// that does not close, or that wraps no text, is malformed.
pub fn parse_trial_id(raw: &str) -> std::result::Result<(String, Option<String>), String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty trial identifier".to_string());
    }
    if !trimmed.starts_with("<a") {
        return Ok((trimmed.to_string(), None));
    }
    let captures = ANCHOR_REGEX
        .captures(trimmed)
        .ok_or_else(|| format!("malformed trial anchor '{trimmed}'"))?;
    let id = captures.get(2).map_or("", |m| m.as_str()).trim();
    if id.is_empty() {
        return Err(format!("trial anchor without identifier '{trimmed}'"));
    }
    let url = captures
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    Ok((id.to_string(), url))
}

/// Parses a `Y`/`N` flag column. Anything else reads as unknown.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => None,
    }
}

impl TrialLoad {
    fn skip(&mut self, line: u64, reason: String) {
        warn!(line, %reason, "skipping trial record");
        self.skipped.push(SkippedRecord { line, reason });
    }
}
