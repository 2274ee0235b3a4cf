//! Google Gemini service for hosted chat completion.
//!
//! Minimal, non-streaming client around the Gemini REST API:
//! - POST {endpoint}/v1beta/models/{model}:generateContent
//!
//! Constructor validation:
//! - `cfg.provider` must be `LlmProvider::Gemini`
//! - `cfg.endpoint` must start with http:// or https://
//!
//! The API key is attached as `x-goog-api-key` when present. A missing key is
//! not rejected here; the upstream answers 401/403, which is reported as
//! [`ProviderErrorKind::Unauthorized`].

use std::time::Instant;

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the Gemini API.
///
/// Keeps a preconfigured `reqwest::Client` (default headers, optional timeout).
#[derive(Debug)]
pub struct GeminiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_generate: String,
}

impl GeminiService {
    /// Creates a new [`GeminiService`] from the given config.
    ///
    /// # Errors
    /// - [`ProviderErrorKind::InvalidProvider`] if `cfg.provider` is not Gemini
    /// - [`ProviderErrorKind::InvalidEndpoint`] if `cfg.endpoint` is not an HTTP URL
    /// - [`ProviderErrorKind::InvalidCredential`] if the key is not a valid header value
    /// - [`AiLlmError::HttpClient`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        if cfg.provider != LlmProvider::Gemini {
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

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = cfg.api_key.as_deref() {
            let value = header::HeaderValue::from_str(key).map_err(|e| {
                provider_err(ProviderErrorKind::InvalidCredential(format!(
                    "GOOGLE_API_KEY is not a valid header value: {e}"
                )))
            })?;
            headers.insert("x-goog-api-key", value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = cfg.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build()?;

        let base = endpoint.trim_end_matches('/');
        let url_generate = format!("{base}/v1beta/models/{}:generateContent", cfg.model);

        info!(
            provider = %cfg.provider,
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            has_api_key = cfg.api_key.is_some(),
            timeout_secs = ?cfg.timeout_secs,
            "GeminiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    /// Performs a **non-streaming** `generateContent` call.
    ///
    /// `system` becomes `systemInstruction`; `prompt` is the single user turn.
    /// Mapped options: `temperature`, `topP`, `maxOutputTokens`.
    ///
    /// Returns the concatenated text parts of the first candidate, unmodified.
    ///
    /// # Errors
    /// - `Unauthorized` / `RateLimited` / `HttpStatus` for non-2xx answers
    /// - `Timeout` / `Transport` for network failures
    /// - `Decode` if the JSON cannot be parsed (`Timeout` if the body stalls)
    /// - `EmptyCandidates` if no text came back
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, prompt, system);

        debug!(
            prompt_len = prompt.len(),
            has_system = system.is_some(),
            "POST {}", self.url_generate
        );

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| provider_err(ProviderErrorKind::from_transport(&e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let url = self.url_generate.clone();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "Gemini generateContent returned non-success status"
            );

            return Err(provider_err(ProviderErrorKind::from_http(HttpError {
                status,
                url,
                snippet,
            })));
        }

        let out: GenerateContentResponse = resp.json().await.map_err(|e| {
            error!(
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "failed to decode generateContent response"
            );
            provider_err(ProviderErrorKind::from_body(
                &e,
                "`candidates[0].content.parts[].text`",
            ))
        })?;

        let text = out
            .candidates
            .into_iter()
            .find_map(|c| {
                let parts = c.content?.parts;
                let joined: String = parts.into_iter().filter_map(|p| p.text).collect();
                (!joined.is_empty()).then_some(joined)
            })
            .ok_or_else(|| provider_err(ProviderErrorKind::EmptyCandidates))?;

        info!(
            latency_ms = started.elapsed().as_millis(),
            answer_len = text.len(),
            "generateContent completed"
        );

        Ok(text)
    }
}

fn provider_err(kind: ProviderErrorKind) -> AiLlmError {
    ProviderError::new(LlmProvider::Gemini, kind).into()
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &LlmModelConfig, prompt: &'a str, system: Option<&'a str>) -> Self {
        Self {
            system_instruction: system.map(|s| Content {
                role: None,
                parts: vec![Part { text: s }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: cfg.temperature,
                top_p: cfg.top_p,
                max_output_tokens: cfg.max_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
