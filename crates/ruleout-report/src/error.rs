use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("table operation failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to flush output: {0}")]
    Flush(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
