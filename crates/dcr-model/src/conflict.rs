use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of claim collided in the synonym index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Two roster rows share the same compound name.
    DuplicateCompound,
    /// An alias is listed under two different compounds.
    Alias,
}

/// An alias claimed by more than one compound.
///
/// The index keeps the first claim (`kept`); `rejected` names the compound
/// whose claim was shadowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymConflict {
    pub alias: String,
    pub kept: String,
    pub rejected: String,
    pub kind: ConflictKind,
}

impl fmt::Display for SynonymConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ConflictKind::DuplicateCompound => {
                write!(f, "compound '{}' appears more than once", self.alias)
            }
            ConflictKind::Alias => write!(
                f,
                "alias '{}' claimed by '{}' and '{}' (kept '{}')",
                self.alias, self.kept, self.rejected, self.kept
            ),
        }
    }
}
