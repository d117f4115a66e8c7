//! Curation lists: ignored names, missing names, spelling corrections.
//!
//! All three are tab-separated UTF-8 files edited by hand between runs.

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use dcr_model::{IgnoredEntry, LookupStatus, MissingEntry};

use crate::columns;
use crate::error::Result;
use crate::roster::split_names;
use crate::table::{
    DelimitedTable, StagedFile, cell, optional_cell, stage_delimited, write_delimited,
};

const CURATION_DELIMITER: char = '\t';
const CURATION_ENCODING: &str = "utf-8";

/// Reads the ignore-list, keeping the first row for each drug name.
pub fn read_ignored(path: &Path) -> Result<Vec<IgnoredEntry>> {
    let table = DelimitedTable::read(path, CURATION_DELIMITER, CURATION_ENCODING)?;
    let drugs_idx = table.require(columns::CURATION_DRUGS)?;
    let reason_idx = table.columns().get(columns::IGNORED_REASON);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for (_, row) in &table.rows {
        let Some(name) = cell(row, drugs_idx).filter(|name| !name.is_empty()) else {
            continue;
        };
        if !seen.insert(name.to_string()) {
            continue;
        }
        entries.push(IgnoredEntry {
            drug_name: name.to_string(),
            reason: optional_cell(row, reason_idx),
        });
    }
    info!(path = %path.display(), entries = entries.len(), "read ignore-list");
    Ok(entries)
}

pub fn write_ignored(path: &Path, entries: &[IgnoredEntry]) -> Result<()> {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.drug_name.clone(),
                entry.reason.clone().unwrap_or_default(),
            ]
        })
        .collect();
    write_delimited(
        path,
        CURATION_DELIMITER,
        &[columns::CURATION_DRUGS, columns::IGNORED_REASON],
        &rows,
    )
}

/// Appends entries to an ignore-list, deduplicated by drug name.
///
/// Existing rows keep their position and reason. Returns the full list as
/// written. A missing file is created.
pub fn append_ignored(path: &Path, additions: &[IgnoredEntry]) -> Result<Vec<IgnoredEntry>> {
    let mut entries = if path.exists() {
        read_ignored(path)?
    } else {
        Vec::new()
    };
    let mut seen: HashSet<String> = entries.iter().map(|e| e.drug_name.clone()).collect();
    for entry in additions {
        if seen.insert(entry.drug_name.clone()) {
            entries.push(entry.clone());
        }
    }
    write_ignored(path, &entries)?;
    Ok(entries)
}

/// Writes the missing-list sorted by drug name.
///
/// The `Lookup` column keeps failed lookups apart from names the service
/// confirmed absent; both have an empty identifier cell.
pub fn write_missing(path: &Path, entries: &[MissingEntry]) -> Result<()> {
    stage_missing(path, entries)?.commit()
}

/// Stages the missing-list; see [`StagedFile`].
pub fn stage_missing(path: &Path, entries: &[MissingEntry]) -> Result<StagedFile> {
    let mut sorted: Vec<&MissingEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        a.drug_name
            .cmp(&b.drug_name)
            .then_with(|| a.key.cmp(&b.key))
    });
    let rows: Vec<Vec<String>> = sorted
        .into_iter()
        .map(|entry| {
            vec![
                entry.drug_name.clone(),
                entry.suggested_ids.join(","),
                entry.lookup.label().to_string(),
            ]
        })
        .collect();
    stage_delimited(
        path,
        CURATION_DELIMITER,
        &[
            columns::CURATION_DRUGS,
            columns::MISSING_IDS,
            columns::MISSING_LOOKUP,
        ],
        &rows,
    )
}

/// Reads a missing-list written by a previous run.
///
/// Lists predating the `Lookup` column are accepted: rows with identifiers
/// read back as found, rows without as skipped so they get queried again.
pub fn read_missing(path: &Path) -> Result<Vec<MissingEntry>> {
    let table = DelimitedTable::read(path, CURATION_DELIMITER, CURATION_ENCODING)?;
    let drugs_idx = table.require(columns::CURATION_DRUGS)?;
    let index = table.columns();
    let ids_idx = index.get(columns::MISSING_IDS);
    let lookup_idx = index.get(columns::MISSING_LOOKUP);
    let mut entries = Vec::new();
    for (line, row) in &table.rows {
        let Some(name) = cell(row, drugs_idx).filter(|name| !name.is_empty()) else {
            continue;
        };
        let mut entry = MissingEntry::new(name);
        entry.suggested_ids = optional_cell(row, ids_idx)
            .map_or_else(Vec::new, |ids| split_names(&ids));
        entry.lookup = match optional_cell(row, lookup_idx) {
            Some(label) => LookupStatus::from_label(&label).unwrap_or_else(|| {
                warn!(line, %label, "unknown lookup status, will query again");
                LookupStatus::Skipped
            }),
            None if !entry.suggested_ids.is_empty() => LookupStatus::Found,
            None => LookupStatus::Skipped,
        };
        entries.push(entry);
    }
    Ok(entries)
}

/// Reads a spelling-correction table (`From`, `To`).
pub fn read_corrections(path: &Path) -> Result<Vec<(String, String)>> {
    let table = DelimitedTable::read(path, CURATION_DELIMITER, CURATION_ENCODING)?;
    let from_idx = table.require(columns::CORRECTION_FROM)?;
    let to_idx = table.require(columns::CORRECTION_TO)?;
    let mut pairs = Vec::new();
    for (line, row) in &table.rows {
        match (
            cell(row, from_idx).filter(|v| !v.is_empty()),
            cell(row, to_idx).filter(|v| !v.is_empty()),
        ) {
            (Some(from), Some(to)) => pairs.push((from.to_string(), to.to_string())),
            _ => warn!(line, path = %path.display(), "incomplete correction row ignored"),
        }
    }
    info!(path = %path.display(), corrections = pairs.len(), "read correction table");
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_ignored_dedupes_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ignored.tsv");
        fs::write(
            &path,
            "Drugs\tReason\nSaline\tSupportive care\nOxygen\t\nSaline\tDuplicate\n",
        )
        .unwrap();
        let entries = read_ignored(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                IgnoredEntry::new("Saline").with_reason("Supportive care"),
                IgnoredEntry::new("Oxygen"),
            ]
        );
    }

    #[test]
    fn test_append_ignored_creates_and_extends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ignored.tsv");
        append_ignored(&path, &[IgnoredEntry::new("Saline")]).unwrap();
        let all = append_ignored(
            &path,
            &[
                IgnoredEntry::new("Saline").with_reason("again"),
                IgnoredEntry::new("Oxygen").with_reason("Supportive care"),
            ],
        )
        .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].reason, None);
        assert_eq!(read_ignored(&path).unwrap(), all);
    }

    #[test]
    fn test_read_missing_legacy_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.tsv");
        fs::write(&path, "Drugs\tPubchem\nAzithromycin\t447043,55185\nFoo\t\n").unwrap();
        let entries = read_missing(&path).unwrap();
        assert_eq!(entries[0].suggested_ids, vec!["447043", "55185"]);
        assert_eq!(entries[0].lookup, LookupStatus::Found);
        assert_eq!(entries[1].lookup, LookupStatus::Skipped);
    }

    #[test]
    fn test_read_corrections_skips_incomplete_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrections.tsv");
        fs::write(&path, "From\tTo\nTocilizumab \tTocilizumab\nHalf\t\n").unwrap();
        let pairs = read_corrections(&path).unwrap();
        assert_eq!(
            pairs,
            vec![("Tocilizumab".to_string(), "Tocilizumab".to_string())]
        );
    }
}
