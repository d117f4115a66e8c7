//! Reconciliation of trial drug mentions against the curated compound roster.
//!
//! Pipeline:
//! 1. [`SynonymIndex`] maps every compound name and alias to one compound
//! 2. [`NameNormalizer`](dcr_normalization::NameNormalizer) expands trial
//!    records into drug mentions
//! 3. [`reconcile`] partitions mentions into matched, ignored and missing,
//!    and [`TrialAggregator`] attaches matched trials to their compounds
//! 4. [`resolve_missing`] asks a [`CompoundLookup`] for identifiers of the
//!    names left over
//!
//! Everything but the lookup is a pure function of its inputs.

mod aggregate;
mod curation;
mod error;
mod lookup;
mod reconcile;
mod synonyms;

// Error type
pub use error::{ReconcileError, Result};

// Matching
pub use synonyms::{SynonymIndex, alias_key};

// Aggregation
pub use aggregate::{DuplicateTrials, TrialAggregator, TrialGroup, TrialGroups};

// Reconciliation
pub use reconcile::{
    DEFAULT_SENTINEL, ReconcileOptions, ReconcileStats, Reconciliation, apply_status, reconcile,
};

// Lookup seam
pub use lookup::{
    CompoundLookup, LookupCache, LookupError, ResolveStats, lookup_status, resolve_missing,
};

// Curation helpers
pub use curation::{
    DEFAULT_KEPT_TRIAL_TYPE, MentionCount, mention_counts, trial_types, unresolved_ignores,
};
