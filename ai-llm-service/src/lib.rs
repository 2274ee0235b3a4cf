//! Shared LLM access for the chat service.
//!
//! - [`services::gemini_service`] talks to the hosted Gemini `generateContent` API.
//! - [`services::ollama_service`] talks to a local Ollama server (embeddings, optional chat).
//! - [`service_profiles::LlmServiceProfiles`] owns one `chat` and one `embedding` profile
//!   and routes calls to the right client.
//! - [`telemetry`] installs the process-wide tracing subscriber.

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError, ProviderError, ProviderErrorKind};
pub use service_profiles::LlmServiceProfiles;
