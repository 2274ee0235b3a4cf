//! Core data models used by the library.

use doc_ingest::{Chunk, DocumentMetadata};
use serde::{Deserialize, Serialize};

/// One embedded chunk as persisted in the index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub chunk_index: usize,
    pub vector: Vec<f32>,
}

impl IndexEntry {
    pub fn new(chunk: Chunk, vector: Vec<f32>) -> Self {
        let id = entry_id(&chunk);
        Self {
            id,
            text: chunk.text,
            metadata: chunk.metadata,
            chunk_index: chunk.chunk_index,
            vector,
        }
    }
}

/// A single retrieval hit with score, text and origin.
#[derive(Clone, Debug, PartialEq)]
pub struct RagHit {
    pub score: f32,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub chunk_index: usize,
}

/// Stable id derived from `source|page|chunk_index|text`.
pub fn entry_id(chunk: &Chunk) -> String {
    let mut h = blake3::Hasher::new();
    h.update(chunk.metadata.source.as_bytes());
    h.update(b"|");
    h.update(chunk.metadata.page.to_string().as_bytes());
    h.update(b"|");
    h.update(chunk.chunk_index.to_string().as_bytes());
    h.update(b"|");
    h.update(chunk.text.as_bytes());
    let hex = h.finalize().to_hex();
    format!("rec_{}", &hex.as_str()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, page: usize, idx: usize) -> Chunk {
        Chunk {
            text: text.into(),
            metadata: DocumentMetadata {
                source: "data/a.pdf".into(),
                page,
            },
            chunk_index: idx,
        }
    }

    #[test]
    fn ids_are_stable_and_position_sensitive() {
        let a = entry_id(&chunk("The sky is blue.", 0, 0));
        assert_eq!(a, entry_id(&chunk("The sky is blue.", 0, 0)));
        assert!(a.starts_with("rec_"));
        assert_eq!(a.len(), 20);
        assert_ne!(a, entry_id(&chunk("The sky is blue.", 1, 0)));
        assert_ne!(a, entry_id(&chunk("The sky is blue.", 0, 1)));
    }
}
