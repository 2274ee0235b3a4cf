//! Chat model seam.

use std::{future::Future, pin::Pin};

use ai_llm_service::{AiLlmError, LlmServiceProfiles};

/// Boxed future returned by [`ChatModel::complete`].
pub type ChatFuture<'a> = Pin<Box<dyn Future<Output = Result<String, AiLlmError>> + Send + 'a>>;

/// Anything that turns a `(system, user)` prompt pair into text.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> ChatFuture<'a>;
}

/// Routes through the chat profile (Gemini or Ollama).
impl ChatModel for LlmServiceProfiles {
    fn complete<'a>(&'a self, system: &'a str, user: &'a str) -> ChatFuture<'a> {
        Box::pin(self.generate(user, Some(system)))
    }
}
