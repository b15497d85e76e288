//! Catalog validation errors and semantic validation.

use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Catalog validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SemanticError(_) => 63,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a catalog file semantically.
///
/// Checks: supported schema version, non-empty event list, unique event IDs,
/// non-empty descriptions.
pub fn validate_catalog(file: &crate::catalog::CatalogFile) -> ValidationResult<()> {
    if file.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: file.schema_version.clone(),
        });
    }

    if file.events.is_empty() {
        return Err(ValidationError::SemanticError(
            "catalog must contain at least one event".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for (idx, entry) in file.events.iter().enumerate() {
        if !seen.insert(entry.event_id) {
            return Err(ValidationError::InvalidValue {
                field: format!("events[{}].event_id", idx),
                message: format!("duplicate event ID {}", entry.event_id),
            });
        }

        if entry.description.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("events[{}].description", idx),
                message: "must not be empty".to_string(),
            });
        }
    }

    Ok(())
}
