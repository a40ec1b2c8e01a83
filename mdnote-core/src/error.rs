//! Error types for loading, parsing, and persisting annotated documents.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::store::AnnotationStore`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Reading or writing a file on disk failed.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored annotation record exists but cannot be trusted.
    ///
    /// Never downgraded to an empty record: discarding annotations silently
    /// would lose user work.
    #[error("annotation record {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The in-memory record could not be serialized.
    #[error("failed to serialize annotations for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The temporary file could not be renamed onto the canonical record path.
    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while turning source bytes into a document tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The markdown parser only accepts UTF-8 input.
    #[error("document is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
