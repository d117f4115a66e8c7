use serde::{Deserialize, Serialize};

/// A drug name after normalization.
///
/// `display` keeps the corrected casing for output; `key` is the lowercase
/// form used for every comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedName {
    pub display: String,
    pub key: String,
}

impl NormalizedName {
    pub fn new(display: impl Into<String>) -> Self {
        let display = display.into();
        let key = display.to_lowercase();
        Self { display, key }
    }
}

/// One drug named by one trial record.
///
/// Trial records are expanded one-to-many into mentions; `record` is the index
/// of the originating [`crate::TrialRecord`] in the input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrugMention {
    pub record: usize,
    pub raw: String,
    pub name: NormalizedName,
}
