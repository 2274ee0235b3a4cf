//! Flat on-disk vector index.
//!
//! Layout: `<index_dir>/index.json` holding [`IndexMeta`] and every
//! [`IndexEntry`] (text, metadata, vector). Search is exhaustive cosine
//! similarity, which is exact and fast enough for a single PDF folder.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    config::DistanceKind,
    errors::RagError,
    record::{IndexEntry, RagHit},
};

pub const INDEX_FILE: &str = "index.json";
pub const FORMAT_VERSION: u32 = 1;

/// Header written alongside the entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    pub format_version: u32,
    pub embedding_model: String,
    pub dimension: usize,
    pub distance: DistanceKind,
    pub created_at: DateTime<Utc>,
    pub entries: usize,
}

#[derive(Serialize, Deserialize)]
struct IndexFile {
    meta: IndexMeta,
    entries: Vec<IndexEntry>,
}

/// Immutable in-memory index.
#[derive(Clone, Debug)]
pub struct VectorIndex {
    meta: IndexMeta,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Assembles an index from embedded entries.
    ///
    /// # Errors
    /// [`RagError::EmptyCorpus`] if `entries` is empty,
    /// [`RagError::VectorSizeMismatch`] if any vector is not `dimension` long.
    pub fn new(
        embedding_model: impl Into<String>,
        dimension: usize,
        entries: Vec<IndexEntry>,
    ) -> Result<Self, RagError> {
        if entries.is_empty() {
            return Err(RagError::EmptyCorpus);
        }
        check_vectors(&entries, dimension)?;

        Ok(Self {
            meta: IndexMeta {
                format_version: FORMAT_VERSION,
                embedding_model: embedding_model.into(),
                dimension,
                distance: DistanceKind::Cosine,
                created_at: Utc::now(),
                entries: entries.len(),
            },
            entries,
        })
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes `<dir>/index.json`, creating `dir` if needed. Any previous index
    /// is replaced atomically (write to a temp file, then rename).
    ///
    /// # Errors
    /// I/O or serialization failures.
    pub async fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf, RagError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;

        let path = dir.join(INDEX_FILE);
        let tmp = dir.join(format!("{INDEX_FILE}.tmp"));

        let file = IndexFileRef {
            meta: &self.meta,
            entries: &self.entries,
        };
        let data = serde_json::to_vec(&file)?;
        tokio::fs::write(&tmp, &data).await?;
        tokio::fs::rename(&tmp, &path).await?;

        info!(
            path = %path.display(),
            entries = self.entries.len(),
            bytes = data.len(),
            "VectorIndex::save: written"
        );
        Ok(path)
    }

    /// Reads `<dir>/index.json`.
    ///
    /// # Errors
    /// - [`RagError::IndexNotFound`] if the file does not exist
    /// - [`RagError::UnsupportedFormat`] for a different format version
    /// - [`RagError::VectorSizeMismatch`] if a stored vector disagrees with the header
    /// - I/O or parse failures
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self, RagError> {
        let path = dir.as_ref().join(INDEX_FILE);
        if !tokio::fs::try_exists(&path).await? {
            return Err(RagError::IndexNotFound(path));
        }

        let data = tokio::fs::read(&path).await?;
        let IndexFile { meta, entries } = serde_json::from_slice(&data)?;

        if meta.format_version != FORMAT_VERSION {
            return Err(RagError::UnsupportedFormat {
                found: meta.format_version,
                expected: FORMAT_VERSION,
            });
        }
        check_vectors(&entries, meta.dimension)?;

        info!(
            path = %path.display(),
            entries = entries.len(),
            model = %meta.embedding_model,
            dimension = meta.dimension,
            "VectorIndex::load: ready"
        );
        Ok(Self { meta, entries })
    }

    /// Fails unless the index was built by `model` with `dimension`-long vectors.
    ///
    /// # Errors
    /// [`RagError::ModelMismatch`] or [`RagError::VectorSizeMismatch`].
    pub fn ensure_compatible(&self, model: &str, dimension: usize) -> Result<(), RagError> {
        if self.meta.embedding_model != model {
            return Err(RagError::ModelMismatch {
                stored: self.meta.embedding_model.clone(),
                configured: model.to_string(),
            });
        }
        if self.meta.dimension != dimension {
            return Err(RagError::VectorSizeMismatch {
                got: self.meta.dimension,
                want: dimension,
            });
        }
        Ok(())
    }

    /// Returns the `min(k, len)` entries most similar to `query`, best first.
    /// Equal scores keep index insertion order.
    ///
    /// # Errors
    /// [`RagError::VectorSizeMismatch`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<RagHit>, RagError> {
        if query.len() != self.meta.dimension {
            return Err(RagError::VectorSizeMismatch {
                got: query.len(),
                want: self.meta.dimension,
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine_similarity(query, &e.vector)))
            .collect();
        // Stable sort: ties stay in insertion order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        let hits: Vec<RagHit> = scored
            .into_iter()
            .map(|(i, score)| {
                let e = &self.entries[i];
                RagHit {
                    score,
                    text: e.text.clone(),
                    metadata: e.metadata.clone(),
                    chunk_index: e.chunk_index,
                }
            })
            .collect();

        debug!(k, hits = hits.len(), "VectorIndex::search");
        Ok(hits)
    }
}

#[derive(Serialize)]
struct IndexFileRef<'a> {
    meta: &'a IndexMeta,
    entries: &'a [IndexEntry],
}

fn check_vectors(entries: &[IndexEntry], dimension: usize) -> Result<(), RagError> {
    match entries.iter().find(|e| e.vector.len() != dimension) {
        Some(e) => Err(RagError::VectorSizeMismatch {
            got: e.vector.len(),
            want: dimension,
        }),
        None => Ok(()),
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[cfg(test)]
mod tests {
    use doc_ingest::DocumentMetadata;
    use tempfile::TempDir;

    use super::*;

    fn entry(text: &str, vector: Vec<f32>) -> IndexEntry {
        IndexEntry {
            id: format!("rec_{text}"),
            text: text.into(),
            metadata: DocumentMetadata {
                source: "data/sky.pdf".into(),
                page: 0,
            },
            chunk_index: 0,
            vector,
        }
    }

    fn sample() -> VectorIndex {
        VectorIndex::new(
            "all-minilm",
            2,
            vec![
                entry("east", vec![1.0, 0.0]),
                entry("north", vec![0.0, 1.0]),
                entry("north-east", vec![1.0, 1.0]),
                entry("west", vec![-1.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = VectorIndex::new("all-minilm", 2, vec![]).unwrap_err();
        assert!(matches!(err, RagError::EmptyCorpus));
    }

    #[test]
    fn wrong_vector_length_is_rejected() {
        let err = VectorIndex::new("m", 3, vec![entry("a", vec![1.0])]).unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 1, want: 3 }));
    }

    #[test]
    fn search_returns_best_first() {
        let idx = sample();
        let hits = idx.search(&[1.0, 0.1], 3).unwrap();
        let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["east", "north-east", "north"]);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn search_caps_at_index_size_and_handles_zero() {
        let idx = sample();
        assert_eq!(idx.search(&[0.0, 1.0], 10).unwrap().len(), 4);
        assert!(idx.search(&[0.0, 1.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_insertion_order() {
        let idx = VectorIndex::new(
            "m",
            2,
            vec![
                entry("first", vec![1.0, 0.0]),
                entry("other", vec![0.0, 1.0]),
                entry("second", vec![2.0, 0.0]),
            ],
        )
        .unwrap();
        let hits = idx.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].text, "first");
        assert_eq!(hits[1].text, "second");
    }

    #[test]
    fn query_dimension_is_checked() {
        let err = sample().search(&[1.0, 0.0, 0.0], 3).unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 3, want: 2 }));
    }

    #[tokio::test]
    async fn save_then_load_preserves_search_results() {
        let dir = TempDir::new().unwrap();
        let idx = sample();
        let path = idx.save(dir.path().join("vector_index")).await.unwrap();
        assert!(path.ends_with(INDEX_FILE));

        let loaded = VectorIndex::load(dir.path().join("vector_index")).await.unwrap();
        assert_eq!(loaded.meta(), idx.meta());
        assert_eq!(loaded.entries(), idx.entries());

        let q = [0.3, 0.7];
        assert_eq!(loaded.search(&q, 3).unwrap(), idx.search(&q, 3).unwrap());
    }

    #[tokio::test]
    async fn rebuild_replaces_previous_index() {
        let dir = TempDir::new().unwrap();
        sample().save(dir.path()).await.unwrap();

        let small = VectorIndex::new("all-minilm", 2, vec![entry("only", vec![1.0, 0.0])]).unwrap();
        small.save(dir.path()).await.unwrap();

        let loaded = VectorIndex::load(dir.path()).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(!dir.path().join("index.json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_index_is_reported() {
        let dir = TempDir::new().unwrap();
        let err = VectorIndex::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::IndexNotFound(_)));
    }

    #[tokio::test]
    async fn future_format_version_is_refused() {
        let dir = TempDir::new().unwrap();
        let path = sample().save(dir.path()).await.unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, raw.replace("\"format_version\":1", "\"format_version\":99")).unwrap();

        let err = VectorIndex::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::UnsupportedFormat { found: 99, .. }));
    }

    #[test]
    fn incompatible_model_or_dimension_is_refused() {
        let idx = sample();
        assert!(idx.ensure_compatible("all-minilm", 2).is_ok());
        assert!(matches!(
            idx.ensure_compatible("nomic-embed-text", 2),
            Err(RagError::ModelMismatch { .. })
        ));
        assert!(matches!(
            idx.ensure_compatible("all-minilm", 384),
            Err(RagError::VectorSizeMismatch { .. })
        ));
    }
}
