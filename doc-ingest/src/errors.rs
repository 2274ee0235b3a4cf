//! Unified error type for the doc-ingest crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The source path is missing or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory traversal failed.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A PDF could not be parsed. Aborts the whole batch.
    #[error("failed to extract text from {path}: {reason}")]
    Pdf { path: PathBuf, reason: String },

    /// Splitter parameters are inconsistent.
    #[error("invalid splitter configuration: {0}")]
    InvalidSplitter(String),
}
