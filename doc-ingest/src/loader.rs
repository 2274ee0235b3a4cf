//! PDF directory loader.
//!
//! Only files directly under the source directory whose extension is exactly
//! `pdf` are read; `*.PDF` is skipped and subdirectories are not descended. Files are
//! processed in sorted path order so repeated builds see the same sequence.

use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    errors::IngestError,
    types::{Document, DocumentMetadata},
};

/// Lists `*.pdf` files directly under `dir`, sorted by path.
///
/// # Errors
/// [`IngestError::NotADirectory`] if `dir` is missing, or a walk error.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::NotADirectory(dir.to_path_buf()));
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_pdf = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "pdf");
        if is_pdf {
            out.push(entry.into_path());
        }
    }
    out.sort();
    Ok(out)
}

/// Extracts one [`Document`] per page of a single PDF.
///
/// # Errors
/// [`IngestError::Pdf`] if the file cannot be parsed.
pub fn load_pdf(path: &Path) -> Result<Vec<Document>, IngestError> {
    let bytes = std::fs::read(path)?;

    // The extractor panics on some malformed inputs; surface those as errors.
    let pages = catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    }))
    .map_err(|_| IngestError::Pdf {
        path: path.to_path_buf(),
        reason: "parser panicked".into(),
    })?
    .map_err(|e| IngestError::Pdf {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let source = path.to_string_lossy().into_owned();
    let docs: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .map(|(page, text)| Document {
            text,
            metadata: DocumentMetadata {
                source: source.clone(),
                page,
            },
        })
        .collect();

    if docs.iter().all(|d| d.text.trim().is_empty()) {
        warn!(path = %path.display(), "load_pdf: no extractable text");
    }
    debug!(path = %path.display(), pages = docs.len(), "load_pdf: done");
    Ok(docs)
}

/// Loads every PDF directly under `dir`. Any unreadable PDF aborts the batch.
///
/// # Errors
/// See [`list_pdfs`] and [`load_pdf`].
pub fn load_pdf_dir(dir: impl AsRef<Path>) -> Result<Vec<Document>, IngestError> {
    let dir = dir.as_ref();
    let files = list_pdfs(dir)?;
    info!(dir = %dir.display(), files = files.len(), "load_pdf_dir: discovered");

    let mut docs = Vec::new();
    for path in &files {
        docs.extend(load_pdf(path)?);
    }

    info!(
        dir = %dir.display(),
        files = files.len(),
        pages = docs.len(),
        "load_pdf_dir: done"
    );
    Ok(docs)
}
