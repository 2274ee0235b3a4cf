//! Lightweight Ollama service for embeddings and local chat.
//!
//! - `POST {endpoint}/api/embed` : batch embeddings (`input: [..]` → `embeddings: [[..]]`)
//! - `POST {endpoint}/api/chat` : non-streaming chat (`stream=false`)
//!
//! The default embedding model is `all-minilm`, Ollama's build of
//! `sentence-transformers/all-MiniLM-L6-v2` (384 dimensions).
//!
//! # Examples
//!
//! ```no_run
//! use ai_llm_service::{LlmModelConfig, LlmProvider};
//! use ai_llm_service::services::ollama_service::OllamaService;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = LlmModelConfig {
//!     provider: LlmProvider::Ollama,
//!     model: "all-minilm".into(),
//!     endpoint: "http://localhost:11434".into(),
//!     api_key: None,
//!     max_tokens: None,
//!     temperature: Some(0.0),
//!     top_p: None,
//!     timeout_secs: None,
//! };
//!
//! let svc = OllamaService::new(cfg)?;
//! let vectors = svc.embed_batch(&["The sky is blue."]).await?;
//! println!("dim = {}", vectors[0].len());
//! # Ok(()) }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for Ollama.
pub struct OllamaService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embed: String,
}

impl OllamaService {
    /// Creates a new [`OllamaService`] from the given config.
    ///
    /// # Errors
    /// - `InvalidProvider` if `cfg.provider` is not `Ollama`
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpClient`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(provider_err(ProviderErrorKind::InvalidProvider));
        }

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(provider_err(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_chat = format!("{base}/api/chat");
        let url_embed = format!("{base}/api/embed");

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_embed,
        })
    }

    /// Embeds every input in one request; returns one vector per input, in order.
    ///
    /// # Errors
    /// - `HttpStatus` (or `Unauthorized`/`RateLimited`) for non-2xx answers
    /// - `Timeout` / `Transport` for network failures
    /// - `Decode` if the response cannot be parsed or the count does not match
    #[instrument(skip_all, fields(model = %self.cfg.model, inputs = inputs.len()))]
    pub async fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = EmbedRequest {
            model: &self.cfg.model,
            input: inputs,
        };

        debug!("POST {}", self.url_embed);
        let resp = self
            .client
            .post(&self.url_embed)
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_err(ProviderErrorKind::from_transport(&e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_embed.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(provider_err(ProviderErrorKind::from_http(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            })));
        }

        let out: EmbedResponse = resp.json().await.map_err(|e| {
            provider_err(ProviderErrorKind::from_body(&e, "`{ embeddings: number[][] }`"))
        })?;

        if out.embeddings.len() != inputs.len() {
            return Err(provider_err(ProviderErrorKind::Decode(format!(
                "asked for {} embeddings, got {}",
                inputs.len(),
                out.embeddings.len()
            ))));
        }

        Ok(out.embeddings)
    }

    /// Sends a `(system, user)` pair to `/api/chat` and returns the assistant text.
    ///
    /// # Errors
    /// Same classification as [`OllamaService::embed_batch`]; an empty message
    /// yields `EmptyCandidates`.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn chat(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let body = ChatRequest::from_cfg(&self.cfg, prompt, system);

        debug!(prompt_len = prompt.len(), "POST {}", self.url_chat);
        let resp = self
            .client
            .post(&self.url_chat)
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_err(ProviderErrorKind::from_transport(&e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_chat.clone();
            let text = resp.text().await.unwrap_or_default();
            return Err(provider_err(ProviderErrorKind::from_http(HttpError {
                status,
                url,
                snippet: make_snippet(&text),
            })));
        }

        let out: ChatResponse = resp.json().await.map_err(|e| {
            provider_err(ProviderErrorKind::from_body(&e, "`message.content` with `stream=false`"))
        })?;

        out.message
            .map(|m| m.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| provider_err(ProviderErrorKind::EmptyCandidates))
    }
}

fn provider_err(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::Ollama, kind).into()
}

/* ==========================
HTTP payloads & options
========================== */

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

impl<'a> ChatRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage {
                role: "system",
                content: sys,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        Self {
            model: &cfg.model,
            messages,
            stream: false,
            options: Some(ChatOptions {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                num_predict: cfg.max_tokens,
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Subset of Ollama `options`.
#[derive(Debug, Default, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn cfg(endpoint: &str, model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: endpoint.into(),
            api_key: None,
            max_tokens: None,
            temperature: Some(0.0),
            top_p: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn embed_batch_keeps_input_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .and(body_partial_json(json!({
                "model": "all-minilm",
                "input": ["first", "second"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "all-minilm",
                "embeddings": [[1.0, 0.0], [0.0, 1.0]]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let svc = OllamaService::new(cfg(&server.uri(), "all-minilm")).unwrap();
        let out = svc.embed_batch(&["first", "second"]).await.unwrap();
        assert_eq!(out, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn embed_batch_of_nothing_skips_the_network() {
        let svc = OllamaService::new(cfg("http://127.0.0.1:9", "all-minilm")).unwrap();
        assert!(svc.embed_batch(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn embed_count_mismatch_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[1.0]] })),
            )
            .mount(&server)
            .await;

        let svc = OllamaService::new(cfg(&server.uri(), "all-minilm")).unwrap();
        let err = svc.embed_batch(&["a", "b"]).await.unwrap_err();
        assert!(matches!(err.provider_kind(), Some(ProviderErrorKind::Decode(_))));
    }

    #[tokio::test]
    async fn missing_model_is_reported_with_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("model \"all-minilm\" not found"),
            )
            .mount(&server)
            .await;

        let svc = OllamaService::new(cfg(&server.uri(), "all-minilm")).unwrap();
        let err = svc.embed_batch(&["a"]).await.unwrap_err();
        match err.provider_kind() {
            Some(ProviderErrorKind::HttpStatus(h)) => {
                assert_eq!(h.status.as_u16(), 404);
                assert!(h.snippet.contains("not found"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn chat_returns_assistant_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(json!({
                "model": "llama3.2",
                "stream": false,
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hello" }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": { "role": "assistant", "content": "hi there" },
                "done": true
            })))
            .mount(&server)
            .await;

        let svc = OllamaService::new(cfg(&server.uri(), "llama3.2")).unwrap();
        assert_eq!(svc.chat("hello", Some("sys")).await.unwrap(), "hi there");
    }

    #[tokio::test]
    async fn stalled_chat_body_is_a_timeout() {
        let endpoint = crate::services::stall::stalled_body_server().await;
        let mut c = cfg(&endpoint, "llama3.2");
        c.timeout_secs = Some(1);
        let svc = OllamaService::new(c).unwrap();
        let err = svc.chat("hello", None).await.unwrap_err();
        assert!(err.is_timeout(), "got {err}");
    }

    #[tokio::test]
    async fn stalled_embed_body_is_a_timeout() {
        let endpoint = crate::services::stall::stalled_body_server().await;
        let mut c = cfg(&endpoint, "all-minilm");
        c.timeout_secs = Some(1);
        let svc = OllamaService::new(c).unwrap();
        let err = svc.embed_batch(&["a"]).await.unwrap_err();
        assert!(err.is_timeout(), "got {err}");
    }
}
