//! Ollama embedding provider backed by the shared [`LlmServiceProfiles`].

use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use tracing::trace;

use crate::{
    EmbeddingsProvider, RagError,
    embed::{EmbedFuture, check_dim},
};

/// Ollama embedding provider (async).
#[derive(Clone)]
pub struct OllamaEmbedder {
    svc: Arc<LlmServiceProfiles>,
    model: String,
    dim: usize,
}

impl OllamaEmbedder {
    /// Wraps the shared service; the model id comes from its embedding profile.
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: usize) -> Self {
        let model = svc.profiles().1.model.clone();
        Self { svc, model, dim }
    }
}

impl EmbeddingsProvider for OllamaEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move {
            let mut out = self.svc.embed_batch(&[text]).await?;
            let v = out.pop().ok_or(RagError::VectorSizeMismatch {
                got: 0,
                want: self.dim,
            })?;
            check_dim(&v, self.dim)?;
            Ok(v)
        })
    }

    fn embed_batch<'a>(&'a self, texts: &'a [String]) -> EmbedFuture<'a, Vec<Vec<f32>>> {
        Box::pin(async move {
            trace!(model = %self.model, batch = texts.len(), "OllamaEmbedder::embed_batch");
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let out = self.svc.embed_batch(&refs).await?;
            for v in &out {
                check_dim(v, self.dim)?;
            }
            Ok(out)
        })
    }
}
