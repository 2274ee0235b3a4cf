use crate::config::llm_provider::LlmProvider;

/// Configuration for one model profile.
///
/// # Fields
///
/// - `provider`: which backend serves the model.
/// - `model`: model identifier (e.g. `"gemini-2.5-flash"`, `"all-minilm"`).
/// - `endpoint`: base URL of the API, without a trailing path.
/// - `api_key`: credential for hosted providers. It is not checked up front;
///   a missing key surfaces as an upstream authorization failure.
/// - `max_tokens`: output token cap, if any.
/// - `temperature`: sampling temperature.
/// - `top_p`: nucleus sampling cutoff.
/// - `timeout_secs`: request timeout; `None` means the request may wait indefinitely.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Gemini,
///     model: "gemini-2.5-flash".to_string(),
///     endpoint: "https://generativelanguage.googleapis.com".to_string(),
///     api_key: Some("key".to_string()),
///     max_tokens: None,
///     temperature: Some(0.3),
///     top_p: None,
///     timeout_secs: None,
/// };
/// assert_eq!(cfg.provider, LlmProvider::Gemini);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}
