//! Column names of the flat files exchanged with curators.

/// Trial export: identifier, optionally an HTML anchor.
pub const TRIAL_ID: &str = "ID";
/// Trial export: comma-joined drug names.
pub const TRIAL_DRUGS: &str = "Drugs";
/// Trial export: intervention category.
pub const TRIAL_TYPE: &str = "Type";
pub const TRIAL_TITLE: &str = "Title";
/// Trial export: control arm flag (`Y`/`N`).
pub const TRIAL_CONTROLLED: &str = "Ctl";
/// Trial export: meta-analysis flag (`Y`/`N`).
pub const TRIAL_META_ANALYSIS: &str = "MA";

pub const ROSTER_COMPOUND: &str = "Compound Name";
pub const ROSTER_CLINICAL_NAMES: &str = "Clinical name";
pub const ROSTER_OTHER_NAMES: &str = "Other names";
pub const ROSTER_STATUS: &str = "Drug Status";
/// Roster columns not carried into the merged output.
pub const ROSTER_DROPPED: &[&str] = &["Page"];

/// Curation lists: drug name column shared by ignored and missing lists.
pub const CURATION_DRUGS: &str = "Drugs";
pub const IGNORED_REASON: &str = "Reason";
pub const MISSING_IDS: &str = "Pubchem";
pub const MISSING_LOOKUP: &str = "Lookup";

pub const CORRECTION_FROM: &str = "From";
pub const CORRECTION_TO: &str = "To";

/// Merged output: joined trial display column.
pub const MERGED_TRIALS: &str = "trials_html";
