//! Error types for explorer-core

use openapi_schema::SchemaError;
use thiserror::Error;

/// Result type alias for explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Explorer error types
///
/// Everything here is fatal for a run. Operator cancellation and values that
/// fail type coercion are not errors and never show up as variants.
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("{tool} not found - is it installed and on PATH?")]
    ToolNotFound { tool: String },

    #[error("{tool} failed: {message}")]
    ToolFailed { tool: String, message: String },

    #[error("Unknown environment: {0}")]
    UnknownEnvironment(String),

    #[error("Invalid URL in settings: {0}")]
    InvalidUrl(String),

    #[error("No endpoints found in schema")]
    NoEndpoints,

    #[error("Could not understand selection: {0}")]
    InvalidSelection(String),

    #[error("No rows found in table {0}")]
    NoRows(String),

    #[error("Unknown lookup table: {0}")]
    UnknownTable(String),

    #[error("No identifier lookup tables configured")]
    NoLookupTables,

    #[error("Edited body is not valid JSON: {0}")]
    InvalidBody(String),

    #[error("Could not determine {0} directory")]
    MissingDirectory(&'static str),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
