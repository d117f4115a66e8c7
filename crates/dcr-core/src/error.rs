use thiserror::Error;

use dcr_model::SynonymConflict;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Raised only when strict synonym checking is enabled.
    #[error("{count} synonym conflict(s) in the roster, first: {first}")]
    SynonymConflicts {
        count: usize,
        first: SynonymConflict,
    },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
