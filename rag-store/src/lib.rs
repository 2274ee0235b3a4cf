//! Vector index and retrieval for PDF chunks.
//!
//! This crate provides:
//! - [`build_index`]: embed chunks (bounded concurrency, ordered) into a [`VectorIndex`]
//! - [`VectorIndex`]: flat on-disk index with save/load and cosine search
//! - [`Retriever`]: embeds a question and returns the top-k closest chunks
//!
//! The index records the embedding model and dimension it was built with;
//! loading it under a different model is refused.

mod config;
mod embed;
mod embed_pool;
mod errors;
mod index;
mod ingest;
mod progress;
mod record;
mod retrieve;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{DistanceKind, IndexConfig};
pub use embed::{EmbedFuture, EmbeddingsProvider, ollama::OllamaEmbedder};
pub use embed_pool::embed_all;
pub use errors::RagError;
pub use index::{FORMAT_VERSION, INDEX_FILE, IndexMeta, VectorIndex};
pub use ingest::build_index;
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use record::{IndexEntry, RagHit, entry_id};
pub use retrieve::Retriever;
