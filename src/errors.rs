use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReviewRagError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Malformed record in {file} (row {row}): {reason}")]
    MalformedRecord {
        file: String,
        row: usize,
        reason: String,
    },

    #[error("No CSV input files found in {0}")]
    NoInputFiles(PathBuf),

    #[error("Collection '{0}' not found. Run `reviewrag index` first")]
    CollectionNotFound(String),

    #[error("Collection error: {0}")]
    CollectionError(String),

    #[error("{0}")]
    Custom(String),
}

pub type Result<T> = std::result::Result<T, ReviewRagError>;
