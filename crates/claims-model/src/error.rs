//! Error types for schema configuration.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid schema '{name}': {reason}")]
    Invalid { name: String, reason: String },

    #[error("unknown schema variant '{0}' (expected camel, spaced or reduced)")]
    UnknownVariant(String),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
