//! Index and retrieval configuration.

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::RagError;

pub const DEFAULT_INDEX_PATH: &str = "vector_index";
pub const DEFAULT_EMBEDDING_DIM: usize = 384;
pub const DEFAULT_TOP_K: usize = 3;
pub const DEFAULT_EMBED_CONCURRENCY: usize = 4;
pub const DEFAULT_EMBED_BATCH: usize = 32;

/// Similarity function used for search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceKind {
    /// Cosine similarity (higher is closer).
    #[default]
    Cosine,
}

impl fmt::Display for DistanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceKind::Cosine => f.write_str("cosine"),
        }
    }
}

/// Configuration for building, loading and querying the index.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexConfig {
    /// Directory holding `index.json`.
    pub index_dir: PathBuf,
    /// Expected embedding dimension.
    pub dimension: usize,
    /// Results per query.
    pub top_k: usize,
    /// Concurrent embedding requests during a build.
    pub concurrency: usize,
    /// Texts per embedding request.
    pub batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from(DEFAULT_INDEX_PATH),
            dimension: DEFAULT_EMBEDDING_DIM,
            top_k: DEFAULT_TOP_K,
            concurrency: DEFAULT_EMBED_CONCURRENCY,
            batch_size: DEFAULT_EMBED_BATCH,
        }
    }
}

impl IndexConfig {
    /// Reads `INDEX_PATH`, `EMBEDDING_DIM`, `RAG_TOP_K`, `EMBEDDING_CONCURRENCY`
    /// and `EMBEDDING_BATCH` from the process environment.
    ///
    /// # Errors
    /// [`RagError::Config`] on unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, RagError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`IndexConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, RagError> {
        let d = Self::default();
        let cfg = Self {
            index_dir: lookup("INDEX_PATH")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(d.index_dir),
            dimension: parse_or(&lookup, "EMBEDDING_DIM", d.dimension)?,
            top_k: parse_or(&lookup, "RAG_TOP_K", d.top_k)?,
            concurrency: parse_or(&lookup, "EMBEDDING_CONCURRENCY", d.concurrency)?,
            batch_size: parse_or(&lookup, "EMBEDDING_BATCH", d.batch_size)?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.dimension == 0 {
            return Err(RagError::Config("EMBEDDING_DIM must be > 0".into()));
        }
        if self.concurrency == 0 {
            return Err(RagError::Config("EMBEDDING_CONCURRENCY must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(RagError::Config("EMBEDDING_BATCH must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: T,
) -> Result<T, RagError> {
    match lookup(var).map(|s| s.trim().to_string()) {
        None => Ok(default),
        Some(s) if s.is_empty() => Ok(default),
        Some(s) => s
            .parse()
            .map_err(|_| RagError::Config(format!("{var} is not a valid number: `{s}`"))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = IndexConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, IndexConfig::default());
        assert_eq!(cfg.top_k, 3);
        assert_eq!(cfg.dimension, 384);
    }

    #[test]
    fn reads_overrides() {
        let cfg = IndexConfig::from_lookup(lookup(&[
            ("INDEX_PATH", "/tmp/idx"),
            ("EMBEDDING_DIM", "768"),
            ("RAG_TOP_K", "0"),
        ]))
        .unwrap();
        assert_eq!(cfg.index_dir, PathBuf::from("/tmp/idx"));
        assert_eq!(cfg.dimension, 768);
        assert_eq!(cfg.top_k, 0);
    }

    #[test]
    fn rejects_garbage_and_zero_dimension() {
        assert!(IndexConfig::from_lookup(lookup(&[("RAG_TOP_K", "three")])).is_err());
        assert!(IndexConfig::from_lookup(lookup(&[("EMBEDDING_DIM", "0")])).is_err());
    }
}
