//! Error types for flat-file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a read or write.
///
/// Row-level problems are not errors; they are reported as
/// [`SkippedRecord`](crate::SkippedRecord)s next to the rows that did parse.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Encoding Errors ===
    /// Encoding label not recognized.
    #[error("unknown encoding '{label}' for {path}")]
    UnknownEncoding { path: PathBuf, label: String },

    /// Bytes are not valid in the declared encoding.
    #[error("{path} is not valid {encoding}")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },

    // === Delimited Text Errors ===
    /// Delimiter must be a single ASCII character.
    #[error("invalid delimiter {delimiter:?}: must be a single ASCII character")]
    InvalidDelimiter { delimiter: char },

    /// Failed to parse delimited text.
    #[error("failed to parse {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed to write delimited text.
    #[error("failed to write {path}: {message}")]
    CsvWrite { path: PathBuf, message: String },

    /// File has no header row.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    /// Required column not found in header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether the error comes from undecodable input bytes.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::UnknownEncoding { .. } | Self::Decode { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
