//! Data model for drug candidate reconciliation.
//!
//! Types here are shared by every stage of the pipeline: trial records read
//! from the registry export, canonical compounds from the curated roster, and
//! the curation lists (ignored and missing names) that close the feedback loop.

pub mod compound;
pub mod conflict;
pub mod curation;
pub mod name;
pub mod trial;

pub use compound::CanonicalCompound;
pub use conflict::{ConflictKind, SynonymConflict};
pub use curation::{IgnoredEntry, LookupStatus, MissingEntry};
pub use name::{DrugMention, NormalizedName};
pub use trial::{TrialDisplay, TrialRecord};
