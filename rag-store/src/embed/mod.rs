use std::{future::Future, pin::Pin};

use crate::errors::RagError;

pub mod ollama;

/// Boxed future returned by [`EmbeddingsProvider`] methods.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RagError>> + Send + 'a>>;

/// Provider interface for embedding generation.
///
/// Async because real providers (Ollama, hosted APIs) perform HTTP requests.
/// The same provider must be used to build an index and to query it; the index
/// stores [`EmbeddingsProvider::model_id`] and [`EmbeddingsProvider::dimension`]
/// and refuses to serve queries from a different model.
pub trait EmbeddingsProvider: Send + Sync {
    /// Stable identifier of the embedding model.
    fn model_id(&self) -> &str;

    /// Length of every vector this provider returns.
    fn dimension(&self) -> usize;

    /// Embeds a single text.
    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>>;

    /// Embeds several texts, one vector per input, in order.
    ///
    /// The default implementation calls [`EmbeddingsProvider::embed`] sequentially.
    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            let mut out = Vec::with_capacity(texts.len());
            for t in texts {
                out.push(self.embed(t).await?);
            }
            Ok(out)
        })
    }
}

/// Checks that `v` has the expected length.
pub(crate) fn check_dim(v: &[f32], want: usize) -> Result<(), RagError> {
    if v.len() != want {
        return Err(RagError::VectorSizeMismatch { got: v.len(), want });
    }
    Ok(())
}
