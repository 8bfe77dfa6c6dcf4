//! Error types for trial export loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run before any case is processed.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Export file not found.
    #[error("export file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === XML Errors ===
    /// The XML reader rejected the input.
    #[error("malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },

    /// An attribute could not be decoded.
    #[error("malformed attribute on <{element}> at byte {position}: {message}")]
    Attribute {
        element: String,
        position: u64,
        message: String,
    },

    /// The document ended while elements were still open.
    #[error("unexpected end of document: <{element}> is not closed")]
    UnclosedElement { element: String },

    /// The document contained no elements.
    #[error("document has no root element")]
    Empty,
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
