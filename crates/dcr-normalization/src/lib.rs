//! Drug name normalization.
//!
//! Trial registries spell the same drug many ways. This crate turns a raw
//! drug column into one [`NormalizedName`](dcr_model::NormalizedName) per
//! drug:
//!
//! 1. **Split**: combination fields (`"A, B"`) become independent tokens
//! 2. **Reject**: blank tokens and non-drug markers (`"ND: Placebo"`) are dropped
//! 3. **Correct**: known misspellings and casing variants map to one spelling
//! 4. **Key**: the corrected name gets a lowercase comparison key
//!
//! Every function here is pure; the correction table is plain data loaded by
//! the ingest layer.

mod corrections;
mod normalizer;
mod variants;

pub use corrections::{BUILTIN_CORRECTIONS, CorrectionTable};
pub use normalizer::{
    DEFAULT_NON_DRUG_PREFIXES, Expansion, NameNormalizer, RejectedToken, Rejection,
    split_combination,
};
pub use variants::{CaseVariant, case_variants};
