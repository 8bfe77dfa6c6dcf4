//! Trial export ingestion.
//!
//! Loads a Mint Lesion XML export into an owned [`Document`] tree and
//! enumerates its cases. Loading is all-or-nothing: any malformed input
//! fails with an [`IngestError`] before case processing starts.

pub mod cases;
pub mod document;
pub mod error;

pub use cases::{CASE, TRIAL, TRIAL_ARM, enumerate_cases};
pub use document::{
    Descendants, Document, Node, load_document, parse_document, parse_document_bytes,
};
pub use error::{IngestError, Result};
