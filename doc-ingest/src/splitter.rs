//! Recursive character text splitter.
//!
//! Length is measured in Unicode scalar values. The splitter tries separators
//! in order (`"\n\n"`, `"\n"`, `" "`, `""`): it splits on the first one present,
//! greedily merges the small pieces back into windows of at most `chunk_size`,
//! and recurses with the remaining separators into any piece that is still too
//! long. Separators stay attached to the start of the piece that follows them.
//!
//! When a window is emitted, leading pieces are dropped until the retained tail
//! is no longer than `chunk_overlap`; that tail opens the next window.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    errors::IngestError,
    types::{Chunk, Document},
};

pub const CHUNK_SIZE: usize = 500;
pub const CHUNK_OVERLAP: usize = 50;
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Clone, Debug)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// # Errors
    /// [`IngestError::InvalidSplitter`] if `chunk_size` is zero or the overlap
    /// is not smaller than the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, IngestError> {
        if chunk_size == 0 {
            return Err(IngestError::InvalidSplitter("chunk_size must be > 0".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(IngestError::InvalidSplitter(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits documents lazily, preserving document order and metadata.
    pub fn split_documents<'a>(
        &'a self,
        docs: &'a [Document],
    ) -> impl Iterator<Item = Chunk> + 'a {
        docs.iter().flat_map(move |doc| {
            let parts = self.split_text(&doc.text);
            trace!(
                source = %doc.metadata.source,
                page = doc.metadata.page,
                chunks = parts.len(),
                "split_documents: page split"
            );
            parts
                .into_iter()
                .enumerate()
                .map(move |(chunk_index, text)| Chunk {
                    text,
                    metadata: doc.metadata.clone(),
                    chunk_index,
                })
        })
    }

    /// Splits one text into trimmed, non-empty chunks of at most `chunk_size` chars.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        let out = self.split_recursive(text, &DEFAULT_SEPARATORS);
        debug!(
            input_chars = text.chars().count(),
            chunks = out.len(),
            "split_text: done"
        );
        out
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, rest) = pick_separator(text, separators);
        let pieces = split_keep_separator(text, separator);

        let mut chunks = Vec::new();
        let mut good: Vec<&str> = Vec::new();

        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                good.push(piece);
                continue;
            }
            if !good.is_empty() {
                chunks.extend(self.merge(&good));
                good.clear();
            }
            if rest.is_empty() {
                push_trimmed(&mut chunks, piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, rest));
            }
        }
        if !good.is_empty() {
            chunks.extend(self.merge(&good));
        }
        chunks
    }

    /// Greedy merge of pieces shorter than `chunk_size` into windows with overlap.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut out, join(&window));
                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some((_, l)) => total -= l,
                        None => break,
                    }
                }
            }
            window.push_back((piece, len));
            total += len;
        }
        push_trimmed(&mut out, join(&window));
        out
    }
}

/// First separator present in `text` and the separators after it.
/// `""` always matches and ends recursion.
fn pick_separator<'s>(text: &str, separators: &'s [&'s str]) -> (&'s str, &'s [&'s str]) {
    for (i, &sep) in separators.iter().enumerate() {
        if sep.is_empty() {
            return (sep, &[]);
        }
        if text.contains(sep) {
            return (sep, &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Splits on `separator`, keeping each separator at the start of the next piece.
/// An empty separator splits into single characters. Empty pieces are dropped.
fn split_keep_separator<'t>(text: &'t str, separator: &str) -> Vec<&'t str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join(window: &VecDeque<(&str, usize)>) -> String {
    window.iter().map(|(p, _)| *p).collect()
}

fn push_trimmed(out: &mut Vec<String>, text: String) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
