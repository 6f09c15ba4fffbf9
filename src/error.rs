use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistaliError {
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to parse tables: {0}")]
    TablesParse(#[from] toml::de::Error),

    #[error("invalid tables: {0}")]
    InvalidTables(String),

    #[error("invalid header pattern: {0}")]
    Pattern(#[from] regex::Error),
}
