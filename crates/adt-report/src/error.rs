//! Error types for rendering.

use thiserror::Error;

/// Result type for render operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur during chart or dashboard rendering.
#[derive(Error, Debug)]
pub enum ReportError {
    /// JSON serialization error (embedded dashboard payload).
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Template rendering error.
    #[error("template error: {0}")]
    TemplateError(String),

    /// Chart requested over an empty table.
    #[error("cannot render chart '{0}' from an empty table")]
    EmptyTable(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
