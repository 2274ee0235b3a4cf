//! Embedding executor with bounded concurrency and dimension checks.

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::{
    embed::{EmbeddingsProvider, check_dim},
    errors::RagError,
    progress::Progress,
};

/// Embeds `texts` in batches of `batch_size`, running at most `concurrency`
/// batches at once. Returns one vector per text, in input order.
///
/// # Errors
/// The first provider failure, or [`RagError::VectorSizeMismatch`] if a
/// vector has the wrong length or a batch returns the wrong number of vectors.
pub async fn embed_all(
    texts: &[String],
    provider: &dyn EmbeddingsProvider,
    batch_size: usize,
    concurrency: usize,
    progress: &dyn Progress,
) -> Result<Vec<Vec<f32>>, RagError> {
    let batch_size = batch_size.max(1);
    info!(
        "embed_pool::embed_all: total={} batch={} concurrency={}",
        texts.len(),
        batch_size,
        concurrency
    );

    if texts.is_empty() {
        debug!("embed_pool::embed_all: nothing to embed");
        return Ok(Vec::new());
    }

    progress.set_total(texts.len() as u64);
    let want = provider.dimension();

    let mut batches: Vec<(usize, Vec<Vec<f32>>)> = stream::iter(texts.chunks(batch_size).enumerate())
        .map(|(i, batch)| async move {
            let vectors = embed_batch_checked(provider, batch, want).await?;
            progress.advance(batch.len() as u64);
            Ok::<(usize, Vec<Vec<f32>>), RagError>((i, vectors))
        })
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, RagError>>()?;

    batches.sort_by_key(|(i, _)| *i);
    let out: Vec<Vec<f32>> = batches.into_iter().flat_map(|(_, v)| v).collect();

    debug!("embed_pool::embed_all: embeddings filled");
    Ok(out)
}

async fn embed_batch_checked(
    provider: &dyn EmbeddingsProvider,
    batch: &[String],
    want: usize,
) -> Result<Vec<Vec<f32>>, RagError> {
    let vectors = provider.embed_batch(batch).await?;
    if vectors.len() != batch.len() {
        return Err(RagError::VectorSizeMismatch {
            got: vectors.len(),
            want: batch.len(),
        });
    }
    for v in &vectors {
        check_dim(v, want)?;
    }
    Ok(vectors)
}
