//! Flat-file ingestion for drug candidate reconciliation.
//!
//! Every input and output of a run is a delimited text file:
//!
//! - **Trial export**: tab-separated registry dump, legacy single-byte encoding
//! - **Roster**: the curated compound sheet, comma-separated UTF-8
//! - **Curation lists**: ignored names, missing names, spelling corrections
//! - **Merged output**: the roster with trial lists and augmented status
//!
//! Readers fail fast on file-level problems (unreadable file, bad encoding,
//! missing required column) and skip-and-count on row-level ones.

pub mod columns;
mod curation;
mod error;
mod merged;
mod roster;
mod table;
mod trials;

// === Error Types ===
pub use error::{IngestError, Result};

// === Delimited Text ===
pub use table::{
    ColumnIndex, DelimitedTable, StagedFile, read_decoded, stage_delimited, write_delimited,
};

// === Trial Export ===
pub use trials::{
    SkippedRecord, TrialLoad, TrialSourceOptions, parse_flag, parse_trial_id, read_trials,
    trials_from_table,
};

// === Roster ===
pub use roster::{Roster, RosterOptions, join_names, read_roster, roster_from_table, split_names};

// === Curation Lists ===
pub use curation::{
    append_ignored, read_corrections, read_ignored, read_missing, stage_missing, write_ignored,
    write_missing,
};

// === Merged Output ===
pub use merged::{MergedOptions, merged_rows, stage_merged, write_merged};
