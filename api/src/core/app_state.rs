use std::sync::Arc;

use contextor::RagChain;

pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8080";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Retriever + chat model; immutable after startup.
    pub chain: Arc<RagChain>,
}

impl AppState {
    pub fn new(chain: RagChain) -> Self {
        Self {
            chain: Arc::new(chain),
        }
    }
}

/// `API_ADDRESS`, or [`DEFAULT_API_ADDRESS`] when unset.
pub fn api_address_from_env() -> String {
    std::env::var("API_ADDRESS")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string())
}
