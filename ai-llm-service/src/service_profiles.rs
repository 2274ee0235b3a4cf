//! Shared LLM service with two profiles: `chat` and `embedding`.
//!
//! - Construct once at startup, wrap in `Arc`, and pass clones to dependents.
//! - Caches underlying HTTP clients per config (provider+endpoint+model+key+options).
//! - `chat` may be Gemini (hosted) or Ollama; `embedding` must be Ollama.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::LlmServiceProfiles;
//! use ai_llm_service::config::default_config::{config_chat, config_embedding};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = Arc::new(LlmServiceProfiles::new(config_chat()?, config_embedding()?)?);
//!
//! let txt = svc.generate("What color is the sky?", Some("Answer briefly.")).await?;
//! println!("CHAT: {txt}");
//!
//! let emb = svc.embed_batch(&["Ferris"]).await?;
//! println!("Embedding dim = {}", emb[0].len());
//! # Ok(()) }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError},
    services::{gemini_service::GeminiService, ollama_service::OllamaService},
};

/// Shared service that manages the **chat** and **embedding** profiles.
pub struct LlmServiceProfiles {
    chat: LlmModelConfig,
    embedding: LlmModelConfig,

    gemini: RwLock<HashMap<ClientKey, Arc<GeminiService>>>,
    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service from the two profiles.
    ///
    /// # Errors
    /// [`ConfigError::UnsupportedProvider`] if the embedding profile is not Ollama.
    pub fn new(chat: LlmModelConfig, embedding: LlmModelConfig) -> Result<Self, AiLlmError> {
        if embedding.provider != LlmProvider::Ollama {
            return Err(ConfigError::UnsupportedProvider(format!(
                "{} cannot serve the embedding profile",
                embedding.provider
            ))
            .into());
        }

        Ok(Self {
            chat,
            embedding,
            gemini: RwLock::new(HashMap::new()),
            ollama: RwLock::new(HashMap::new()),
        })
    }

    /// Generates text using the **chat** profile.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if client construction or the upstream call fails.
    pub async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, AiLlmError> {
        match self.chat.provider {
            LlmProvider::Gemini => {
                let cli = self.get_or_init_gemini(&self.chat).await?;
                cli.generate(prompt, system).await
            }
            LlmProvider::Ollama => {
                let cli = self.get_or_init_ollama(&self.chat).await?;
                cli.chat(prompt, system).await
            }
        }
    }

    /// Computes embeddings using the **embedding** profile, one vector per input.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if embedding fails.
    pub async fn embed_batch(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>, AiLlmError> {
        let cli = self.get_or_init_ollama(&self.embedding).await?;
        cli.embed_batch(inputs).await
    }

    /// Returns references to the current profiles `(chat, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig) {
        (&self.chat, &self.embedding)
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init_gemini(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<GeminiService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.gemini.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.gemini.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating Gemini client");
        let cli = Arc::new(GeminiService::new(cfg.clone())?);
        w.insert(key, Arc::clone(&cli));
        Ok(cli)
    }

    async fn get_or_init_ollama(
        &self,
        cfg: &LlmModelConfig,
    ) -> Result<Arc<OllamaService>, AiLlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key).cloned() {
            return Ok(cli);
        }
        let mut w = self.ollama.write().await;
        if let Some(cli) = w.get(&key).cloned() {
            return Ok(cli);
        }
        debug!(model = %cfg.model, "creating Ollama client");
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        w.insert(key, Arc::clone(&cli));
        Ok(cli)
    }
}

/// Internal cache key to identify unique client configs.
///
/// Floats are keyed by their bit pattern.
#[derive(Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<u32>,
    top_p: Option<u32>,
    timeout: Option<u64>,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature.map(f32::to_bits),
            top_p: cfg.top_p.map(f32::to_bits),
            timeout: cfg.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn ollama(endpoint: &str, model: &str) -> LlmModelConfig {
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

    #[test]
    fn embedding_profile_must_be_ollama() {
        let mut emb = ollama("http://localhost:11434", "all-minilm");
        emb.provider = LlmProvider::Gemini;
        let chat = ollama("http://localhost:11434", "llama3.2");
        assert!(LlmServiceProfiles::new(chat, emb).is_err());
    }

    #[tokio::test]
    async fn routes_chat_to_gemini_and_embeddings_to_ollama() {
        let gemini = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "blue" }] } }]
            })))
            .expect(2)
            .mount(&gemini)
            .await;

        let ollama_srv = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "embeddings": [[0.5, 0.5]] })),
            )
            .expect(1)
            .mount(&ollama_srv)
            .await;

        let chat = LlmModelConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-2.5-flash".into(),
            endpoint: gemini.uri(),
            api_key: Some("k".into()),
            max_tokens: None,
            temperature: Some(0.3),
            top_p: None,
            timeout_secs: Some(5),
        };
        let svc = LlmServiceProfiles::new(chat, ollama(&ollama_srv.uri(), "all-minilm")).unwrap();

        assert_eq!(svc.generate("q", None).await.unwrap(), "blue");
        assert_eq!(svc.generate("q", None).await.unwrap(), "blue");
        assert_eq!(svc.embed_batch(&["x"]).await.unwrap(), vec![vec![0.5, 0.5]]);
        assert_eq!(svc.gemini.read().await.len(), 1);
    }
}
