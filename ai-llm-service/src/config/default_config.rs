//! Default model configs resolved from environment variables.
//!
//! Two roles are defined:
//!
//! - **Chat**      → the hosted model that writes the answer (Gemini by default)
//! - **Embedding** → the sentence-embedding model used for index and queries
//!
//! # Environment variables
//!
//! Chat:
//! - `LLM_KIND`          = `gemini` (default) or `ollama`
//! - `CHAT_MODEL`        = model id (default `gemini-2.5-flash`, or `llama3.2` for Ollama)
//! - `CHAT_TEMPERATURE`  = sampling temperature (default `0.3`)
//! - `GOOGLE_API_KEY`    = Gemini credential (read as-is, not validated here)
//! - `GEMINI_URL`        = API base (default `https://generativelanguage.googleapis.com`)
//!
//! Embedding:
//! - `EMBEDDING_MODEL`   = Ollama model id (default `all-minilm`, i.e. all-MiniLM-L6-v2)
//!
//! Common:
//! - `OLLAMA_URL`        = Ollama base (default `http://localhost:11434`)
//! - `LLM_MAX_TOKENS`    = optional output cap
//! - `LLM_TIMEOUT_SECS`  = optional request timeout; unset means no timeout
//!
//! Every resolver has a `*_from` twin that takes a lookup function so tests can
//! feed values without touching the process environment.

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, parse_opt, validate_http_endpoint, validate_range_f32},
};

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_CHAT_MODEL: &str = "llama3.2";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.3;

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn ollama_endpoint<F>(lookup: &F) -> Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = non_empty(lookup, "OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    validate_http_endpoint("OLLAMA_URL", &url)?;
    Ok(url)
}

/// Constructs the **chat** profile from the process environment.
///
/// # Errors
/// See [`config_chat_from`].
pub fn config_chat() -> Result<LlmModelConfig, AiLlmError> {
    config_chat_from(process_env)
}

/// Constructs the **chat** profile from `lookup`.
///
/// # Defaults
/// - provider `gemini`, model `gemini-2.5-flash`, `temperature = 0.3`
/// - `timeout_secs = None`
///
/// # Errors
/// - `ConfigError::UnsupportedProvider` for an unknown `LLM_KIND`
/// - `ConfigError::InvalidNumber` / `ConfigError::OutOfRange` for bad numerics
/// - `ConfigError::InvalidFormat` for a non-HTTP endpoint
pub fn config_chat_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match non_empty(&lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Gemini,
    };

    let temperature = parse_opt::<f32>(
        "CHAT_TEMPERATURE",
        lookup("CHAT_TEMPERATURE"),
        "expected f32",
    )?
    .unwrap_or(DEFAULT_CHAT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    let max_tokens = parse_opt::<u32>("LLM_MAX_TOKENS", lookup("LLM_MAX_TOKENS"), "expected u32")?;
    let timeout_secs =
        parse_opt::<u64>("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), "expected u64")?;

    let (endpoint, model, api_key) = match provider {
        LlmProvider::Gemini => {
            let endpoint =
                non_empty(&lookup, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
            validate_http_endpoint("GEMINI_URL", &endpoint)?;
            let model = non_empty(&lookup, "CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
            (endpoint, model, non_empty(&lookup, "GOOGLE_API_KEY"))
        }
        LlmProvider::Ollama => {
            let model = non_empty(&lookup, "CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_OLLAMA_CHAT_MODEL.to_string());
            (ollama_endpoint(&lookup)?, model, None)
        }
    };

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key,
        max_tokens,
        temperature: Some(temperature),
        top_p: None,
        timeout_secs,
    })
}

/// Constructs the **embedding** profile from the process environment.
///
/// # Errors
/// See [`config_embedding_from`].
pub fn config_embedding() -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_from(process_env)
}

/// Constructs the **embedding** profile (always Ollama) from `lookup`.
///
/// # Defaults
/// - model `all-minilm`
/// - `temperature = Some(0.0)` (deterministic)
///
/// # Errors
/// - `ConfigError::InvalidFormat` if `OLLAMA_URL` is not an HTTP URL
/// - `ConfigError::InvalidNumber` if `LLM_TIMEOUT_SECS` does not parse
pub fn config_embedding_from<F>(lookup: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = ollama_endpoint(&lookup)?;
    let model = non_empty(&lookup, "EMBEDDING_MODEL")
        .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    let timeout_secs =
        parse_opt::<u64>("LLM_TIMEOUT_SECS", lookup("LLM_TIMEOUT_SECS"), "expected u64")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Ollama,
        model,
        endpoint,
        api_key: None,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs,
    })
}
