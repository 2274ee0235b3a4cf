//! Builds the vector index from every PDF in `DATA_PATH` and writes it to `INDEX_PATH`.

use std::{error::Error, sync::Arc};

use ai_llm_service::{
    LlmServiceProfiles,
    config::default_config::{config_chat, config_embedding},
    telemetry,
};
use doc_ingest::{Chunk, TextSplitter, load_pdf_dir};
use rag_store::{IndexConfig, IndicatifProgress, OllamaEmbedder, build_index};
use tracing::info;

const DEFAULT_DATA_PATH: &str = "data";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e.into()),
    };

    telemetry::init("info")?;
    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    let data_path = std::env::var("DATA_PATH")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_PATH.to_string());
    let index_cfg = IndexConfig::from_env()?;

    // 1) Load PDFs (blocking parser)
    let source = data_path.clone();
    let docs = tokio::task::spawn_blocking(move || load_pdf_dir(&source)).await??;

    // 2) Split
    let splitter = TextSplitter::default();
    let chunks: Vec<Chunk> = splitter.split_documents(&docs).collect();
    info!(
        data_path = %data_path,
        pages = docs.len(),
        chunks = chunks.len(),
        chunk_size = splitter.chunk_size(),
        chunk_overlap = splitter.chunk_overlap(),
        "documents split"
    );

    // 3) Embed + build
    let svc = Arc::new(LlmServiceProfiles::new(config_chat()?, config_embedding()?)?);
    let embedder = OllamaEmbedder::new(svc, index_cfg.dimension);
    let progress = IndicatifProgress::bar(chunks.len() as u64);
    let index = build_index(chunks, &embedder, &index_cfg, &progress).await?;

    // 4) Persist
    let path = index.save(&index_cfg.index_dir).await?;
    info!(
        path = %path.display(),
        entries = index.len(),
        model = %index.meta().embedding_model,
        "vector index stored"
    );

    Ok(())
}
