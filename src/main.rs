use std::{error::Error, sync::Arc};

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_chat, config_embedding},
    telemetry,
};
use api::{AppState, api_address_from_env};
use contextor::RagChain;
use rag_store::{IndexConfig, OllamaEmbedder, Retriever, VectorIndex};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Optional .env; a missing file is fine, a malformed one is not.
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e.into()),
    };

    telemetry::init("info,tower_http=debug")?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let key_loaded = std::env::var("GOOGLE_API_KEY").is_ok_and(|k| !k.trim().is_empty());
    info!(google_api_key_loaded = key_loaded, "startup");

    let chat_cfg = config_chat()?;
    let emb_cfg = config_embedding()?;
    let index_cfg = IndexConfig::from_env()?;
    info!(
        provider = %chat_cfg.provider,
        model = %chat_cfg.model,
        embedding_model = %emb_cfg.model,
        top_k = index_cfg.top_k,
        "profiles ready"
    );

    let svc = Arc::new(LlmServiceProfiles::new(chat_cfg, emb_cfg)?);
    let embedder = Arc::new(OllamaEmbedder::new(Arc::clone(&svc), index_cfg.dimension));

    // Refuses an index built with a different embedding model.
    let index = Arc::new(VectorIndex::load(&index_cfg.index_dir).await?);
    let retriever = Retriever::new(index, embedder, index_cfg.top_k)?;

    let chain = RagChain::new(retriever, svc);
    api::start(AppState::new(chain), &api_address_from_env()).await?;

    Ok(())
}
