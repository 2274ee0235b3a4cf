//! Retrieval-augmented answer generation.
//!
//! [`RagChain::ask`] retrieves the top-k chunks for a question, builds the
//! context/question prompt, calls the chat model once and returns its text
//! unchanged. No retries: failures surface as [`ContextorError`].

mod error;
pub mod llm;
pub mod prompt;

use std::sync::Arc;

use rag_store::{RagHit, Retriever};
use tracing::{debug, info, instrument};

pub use error::ContextorError;
pub use llm::{ChatFuture, ChatModel};

/// Model answer plus the chunks it was grounded on.
#[derive(Clone, Debug)]
pub struct QaAnswer {
    pub answer: String,
    pub context: Vec<RagHit>,
}

/// Retriever + chat model, shared by all requests.
#[derive(Clone)]
pub struct RagChain {
    retriever: Retriever,
    chat: Arc<dyn ChatModel>,
}

impl RagChain {
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatModel>) -> Self {
        Self { retriever, chat }
    }

    /// Answers `question` from the indexed documents.
    ///
    /// # Errors
    /// [`ContextorError::Rag`] when retrieval fails,
    /// [`ContextorError::Llm`] when the chat model call fails.
    #[instrument(skip_all, fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> Result<QaAnswer, ContextorError> {
        let context = self.retriever.retrieve(question).await?;
        debug!(
            hits = context.len(),
            sources = ?context
                .iter()
                .map(|h| (h.metadata.source.as_str(), h.metadata.page))
                .collect::<Vec<_>>(),
            "RagChain::ask: retrieved"
        );

        let user = prompt::build_user_prompt(question, &context);
        let answer = self.chat.complete(prompt::SYSTEM_PROMPT, &user).await?;

        info!(answer_len = answer.len(), "RagChain::ask: answered");
        Ok(QaAnswer { answer, context })
    }

    /// Same as [`RagChain::ask`], returning only the answer text.
    pub async fn answer(&self, question: &str) -> Result<String, ContextorError> {
        Ok(self.ask(question).await?.answer)
    }
}
