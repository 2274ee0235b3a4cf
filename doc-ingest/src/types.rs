//! Core data models for ingestion.

use serde::{Deserialize, Serialize};

/// Where a piece of text came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// PDF path as discovered under the source directory.
    pub source: String,
    /// 0-based page index within the PDF.
    pub page: usize,
}

/// Raw text of one PDF page.
#[derive(Clone, Debug)]
pub struct Document {
    pub text: String,
    pub metadata: DocumentMetadata,
}

/// Bounded slice of a document's text, ready for embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub metadata: DocumentMetadata,
    /// Position of this chunk within its page.
    pub chunk_index: usize,
}
