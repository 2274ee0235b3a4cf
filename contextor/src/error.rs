//! Typed error for the contextor crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextorError {
    /// Retrieval failed (embedding call or index search).
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// The chat model call failed.
    #[error("LLM error: {0}")]
    Llm(#[from] ai_llm_service::AiLlmError),
}

impl ContextorError {
    /// True when the failure came from a remote model service rather than local state.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ContextorError::Llm(_) | ContextorError::Rag(rag_store::RagError::Embedding(_))
        )
    }

    /// True when a remote call ran out of time.
    pub fn is_timeout(&self) -> bool {
        match self {
            ContextorError::Llm(e) | ContextorError::Rag(rag_store::RagError::Embedding(e)) => {
                e.is_timeout()
            }
            _ => false,
        }
    }
}
