//! Top-k retriever over a loaded index.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::{
    embed::EmbeddingsProvider, errors::RagError, index::VectorIndex, record::RagHit,
};

/// Embeds questions and returns the closest chunks.
///
/// Holds a shared, immutable index; clone freely across request handlers.
#[derive(Clone)]
pub struct Retriever {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn EmbeddingsProvider>,
    top_k: usize,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("entries", &self.index.len())
            .field("model", &self.embedder.model_id())
            .field("top_k", &self.top_k)
            .finish()
    }
}

impl Retriever {
    /// # Errors
    /// [`RagError::ModelMismatch`] / [`RagError::VectorSizeMismatch`] if the
    /// index was built by a different embedding model.
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn EmbeddingsProvider>,
        top_k: usize,
    ) -> Result<Self, RagError> {
        index.ensure_compatible(embedder.model_id(), embedder.dimension())?;
        Ok(Self {
            index,
            embedder,
            top_k,
        })
    }

    /// Returns up to `top_k` chunks, most similar first.
    ///
    /// # Errors
    /// Embedding failures.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<RagHit>, RagError> {
        trace!(top_k = self.top_k, "Retriever::retrieve");
        if self.top_k == 0 {
            return Ok(Vec::new());
        }
        let qv = self.embedder.embed(question).await?;
        let hits = self.index.search(&qv, self.top_k)?;
        debug!(
            hits = hits.len(),
            best = hits.first().map(|h| h.score),
            "Retriever::retrieve: done"
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use doc_ingest::{Chunk, DocumentMetadata};

    use super::*;
    use crate::record::IndexEntry;
    use crate::test_support::KeywordEmbedder;

    fn index(texts: &[&str]) -> Arc<VectorIndex> {
        let entries = texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let chunk = Chunk {
                    text: t.to_string(),
                    metadata: DocumentMetadata {
                        source: "data/colors.pdf".into(),
                        page: 0,
                    },
                    chunk_index: i,
                };
                IndexEntry::new(chunk, KeywordEmbedder::vector(t))
            })
            .collect();
        Arc::new(VectorIndex::new("keyword-test", KeywordEmbedder::DIM, entries).unwrap())
    }

    #[tokio::test]
    async fn returns_top_three_relevant_first() {
        let idx = index(&[
            "Grass is green.",
            "The sky is blue.",
            "Snow is white.",
            "Green grass everywhere.",
        ]);
        let r = Retriever::new(idx, Arc::new(KeywordEmbedder), 3).unwrap();
        let hits = r.retrieve("What color is the sky?").await.unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].text, "The sky is blue.");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn small_index_returns_everything() {
        let idx = index(&["The sky is blue.", "Snow is white."]);
        let r = Retriever::new(idx, Arc::new(KeywordEmbedder), 3).unwrap();
        assert_eq!(r.retrieve("sky").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_queries_are_deterministic() {
        let idx = index(&["The sky is blue.", "Snow is white.", "Grass is green."]);
        let r = Retriever::new(idx, Arc::new(KeywordEmbedder), 3).unwrap();
        let a = r.retrieve("blue sky").await.unwrap();
        let b = r.retrieve("blue sky").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn zero_k_returns_nothing() {
        let idx = index(&["The sky is blue."]);
        let r = Retriever::new(idx, Arc::new(KeywordEmbedder), 0).unwrap();
        assert!(r.retrieve("sky").await.unwrap().is_empty());
    }

    #[test]
    fn index_from_another_model_is_refused() {
        let entries = vec![IndexEntry::new(
            Chunk {
                text: "x".into(),
                metadata: DocumentMetadata {
                    source: "a.pdf".into(),
                    page: 0,
                },
                chunk_index: 0,
            },
            vec![0.0; KeywordEmbedder::DIM],
        )];
        let idx = Arc::new(VectorIndex::new("other-model", KeywordEmbedder::DIM, entries).unwrap());
        let err = Retriever::new(idx, Arc::new(KeywordEmbedder), 3).unwrap_err();
        assert!(matches!(err, RagError::ModelMismatch { .. }));
    }
}
