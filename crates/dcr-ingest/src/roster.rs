//! Curated compound roster reader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use dcr_model::CanonicalCompound;

use crate::columns;
use crate::error::Result;
use crate::table::{DelimitedTable, cell, optional_cell};
use crate::trials::SkippedRecord;

/// How to read the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterOptions {
    pub delimiter: char,
    pub encoding: String,
    pub compound_column: String,
    pub clinical_names_column: String,
    pub other_names_column: String,
    pub status_column: String,
}

impl Default for RosterOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            encoding: "utf-8".to_string(),
            compound_column: columns::ROSTER_COMPOUND.to_string(),
            clinical_names_column: columns::ROSTER_CLINICAL_NAMES.to_string(),
            other_names_column: columns::ROSTER_OTHER_NAMES.to_string(),
            status_column: columns::ROSTER_STATUS.to_string(),
        }
    }
}

/// The roster as loaded: header order plus one compound per row.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub headers: Vec<String>,
    pub compounds: Vec<CanonicalCompound>,
    pub skipped: Vec<SkippedRecord>,
}

/// Splits a comma-joined alias cell, dropping blanks.
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins aliases back into a single cell.
pub fn join_names(names: &[String]) -> String {
    names.join(", ")
}

pub fn read_roster(path: &Path, options: &RosterOptions) -> Result<Roster> {
    let table = DelimitedTable::read(path, options.delimiter, &options.encoding)?;
    let roster = roster_from_table(&table, options)?;
    info!(
        path = %path.display(),
        compounds = roster.compounds.len(),
        skipped = roster.skipped.len(),
        "read roster"
    );
    Ok(roster)
}

/// Builds compounds from a roster table.
///
/// Rows without a compound name are spacer rows in the shared sheet; they are
/// skipped and counted.
pub fn roster_from_table(table: &DelimitedTable, options: &RosterOptions) -> Result<Roster> {
    let compound_idx = table.require(&options.compound_column)?;
    let index = table.columns();
    let clinical_idx = index.get(&options.clinical_names_column);
    let other_idx = index.get(&options.other_names_column);
    let status_idx = index.get(&options.status_column);
    let known: Vec<usize> = [Some(compound_idx), clinical_idx, other_idx, status_idx]
        .into_iter()
        .flatten()
        .collect();

    let mut roster = Roster {
        headers: table.headers.clone(),
        ..Roster::default()
    };
    for (line, row) in &table.rows {
        let name = cell(row, compound_idx).unwrap_or("");
        if name.is_empty() {
            roster.skipped.push(SkippedRecord {
                line: *line,
                reason: format!("row has no '{}'", options.compound_column),
            });
            continue;
        }
        let aliases = |idx| optional_cell(row, idx).map_or_else(Vec::new, |v| split_names(&v));
        let mut compound = CanonicalCompound::new(name)
            .with_clinical_names(aliases(clinical_idx))
            .with_other_names(aliases(other_idx));
        compound.status = optional_cell(row, status_idx);
        compound.attributes = table
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !known.contains(idx))
            .map(|(idx, header)| (header.clone(), cell(row, idx).unwrap_or("").to_string()))
            .collect();
        roster.compounds.push(compound);
    }
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Roster {
        let table = DelimitedTable::parse(Path::new("master.csv"), text, ',').unwrap();
        roster_from_table(&table, &RosterOptions::default()).unwrap()
    }

    #[test]
    fn test_split_names() {
        assert_eq!(split_names("A,  B ,,C"), vec!["A", "B", "C"]);
        assert!(split_names("  ").is_empty());
    }

    #[test]
    fn test_roster_rows() {
        let roster = parse(
            "Page,Compound Name,Clinical name,Other names,Drug Status,Pubchem\n\
             1,Lopinavir/ritonavir,ABT-378/r,\"Kaletra, Aluvia\",Approved,11979606\n\
             2,Ibuprofen,,,,3672\n",
        );
        assert_eq!(roster.compounds.len(), 2);
        let first = &roster.compounds[0];
        assert_eq!(first.compound_name, "Lopinavir/ritonavir");
        assert_eq!(first.clinical_names, vec!["ABT-378/r"]);
        assert_eq!(first.other_names, vec!["Kaletra", "Aluvia"]);
        assert_eq!(first.status.as_deref(), Some("Approved"));
        assert_eq!(first.attribute("Pubchem"), Some("11979606"));
        assert_eq!(first.attribute("Page"), Some("1"));
        assert_eq!(roster.compounds[1].status, None);
        assert!(roster.compounds[1].clinical_names.is_empty());
    }

    #[test]
    fn test_rows_without_name_are_skipped() {
        let roster = parse("Compound Name,Notes\n,spacer\nRemdesivir,\n");
        assert_eq!(roster.compounds.len(), 1);
        assert_eq!(roster.skipped.len(), 1);
        assert_eq!(roster.skipped[0].line, 2);
    }
}
