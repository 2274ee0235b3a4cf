//! Unified error types for the crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No index file under the configured directory.
    #[error("no index found at {0}; run the index builder first")]
    IndexNotFound(PathBuf),

    /// Index written by an incompatible version of this crate.
    #[error("unsupported index format version {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    /// Index was built with a different embedding model than the one configured.
    #[error("embedding model mismatch: index built with `{stored}`, configured `{configured}`")]
    ModelMismatch { stored: String, configured: String },

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Nothing to index.
    #[error("no chunks to index; the source directory has no extractable text")]
    EmptyCorpus,

    /// Embedding provider failure.
    #[error("embedding failed: {0}")]
    Embedding(#[from] AiLlmError),
}
