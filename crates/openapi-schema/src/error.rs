//! Error types for schema loading and handling

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Schema error types
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to fetch schema from {url}: {message}")]
    FetchError { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpError { status: u16, url: String },

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Invalid schema document: {0}")]
    InvalidFormat(String),

    #[error("Invalid schema cache {path}: {message}")]
    InvalidCache { path: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
