use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("field allow-list is empty")]
    EmptyAllowList,
    #[error("field allow-list contains an empty key")]
    EmptyFieldKey,
    #[error("field allow-list contains duplicate key: {0}")]
    DuplicateFieldKey(String),
    #[error("field key {0} is reserved for the case identifier column")]
    ReservedFieldKey(String),
    #[error("invalid plausible range for {field}: min {min} is not below max {max}")]
    InvalidRange { field: String, min: i64, max: i64 },
}

/// Errors raised while loading a cohort definition file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read cohort definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse cohort definition {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid cohort definition {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
