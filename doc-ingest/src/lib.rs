//! Document ingestion: PDF directory loading and chunking.
//!
//! - [`load_pdf_dir`] reads every `*.pdf` directly under a directory into
//!   per-page [`Document`]s.
//! - [`TextSplitter`] cuts documents into overlapping [`Chunk`]s using a
//!   recursive separator strategy (paragraph → line → word → character).

pub mod errors;
pub mod loader;
pub mod splitter;
pub mod types;

pub use errors::IngestError;
pub use loader::{list_pdfs, load_pdf, load_pdf_dir};
pub use splitter::{CHUNK_OVERLAP, CHUNK_SIZE, DEFAULT_SEPARATORS, TextSplitter};
pub use types::{Chunk, Document, DocumentMetadata};
