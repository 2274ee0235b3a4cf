//! Index build: embed chunks and assemble a [`VectorIndex`].

use doc_ingest::Chunk;
use tracing::info;

use crate::{
    config::IndexConfig,
    embed::EmbeddingsProvider,
    embed_pool::embed_all,
    errors::RagError,
    index::VectorIndex,
    progress::Progress,
    record::IndexEntry,
};

/// Embeds every chunk with `provider` and returns an index in chunk order.
///
/// # Errors
/// [`RagError::EmptyCorpus`] if `chunks` is empty, or any embedding failure.
pub async fn build_index(
    chunks: Vec<Chunk>,
    provider: &dyn EmbeddingsProvider,
    cfg: &IndexConfig,
    progress: &dyn Progress,
) -> Result<VectorIndex, RagError> {
    if chunks.is_empty() {
        return Err(RagError::EmptyCorpus);
    }
    if provider.dimension() != cfg.dimension {
        return Err(RagError::VectorSizeMismatch {
            got: provider.dimension(),
            want: cfg.dimension,
        });
    }

    info!(
        chunks = chunks.len(),
        model = provider.model_id(),
        "ingest::build_index: embedding"
    );

    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let vectors = embed_all(&texts, provider, cfg.batch_size, cfg.concurrency, progress).await?;
    progress.finish("embedded");

    let entries: Vec<IndexEntry> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(chunk, vector)| IndexEntry::new(chunk, vector))
        .collect();

    VectorIndex::new(provider.model_id(), provider.dimension(), entries)
}
