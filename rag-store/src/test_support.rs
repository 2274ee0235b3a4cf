//! Deterministic embedder for tests: one dimension per keyword.

use crate::embed::{EmbedFuture, EmbeddingsProvider};

const KEYWORDS: [&str; 6] = ["sky", "blue", "grass", "green", "snow", "white"];

pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub const DIM: usize = KEYWORDS.len() + 1;

    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut v: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
            .collect();
        // Bias so no vector is all zeros.
        v.push(0.1);
        v
    }
}

impl EmbeddingsProvider for KeywordEmbedder {
    fn model_id(&self) -> &str {
        "keyword-test"
    }

    fn dimension(&self) -> usize {
        Self::DIM
    }

    fn embed<'a>(&'a self, text: &'a str) -> EmbedFuture<'a, Vec<f32>> {
        Box::pin(async move { Ok(Self::vector(text)) })
    }
}
