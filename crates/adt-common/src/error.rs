//! Error types for adthreat.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! Errors can be formatted for human consumption with headline, reason, and fix:
//! ```text
//! ✗ Input File Not Found
//!   Reason: input file not found: ./data/AD_logs.csv
//!   Fix: Check the path passed to --input. The file must exist before analysis starts.
//! ```
//!
//! # Machine-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 20,
//!   "category": "aggregation",
//!   "message": "no critical events found in 412 scanned records",
//!   "recoverable": true,
//!   "context": { "scanned": 412 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for adthreat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Input file errors (missing file, malformed rows).
    Input,
    /// Aggregation pipeline errors.
    Aggregation,
    /// Critical-event catalog errors.
    Catalog,
    /// Chart and dashboard rendering errors.
    Render,
    /// Dashboard server errors.
    Dashboard,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Aggregation => write!(f, "aggregation"),
            ErrorCategory::Catalog => write!(f, "catalog"),
            ErrorCategory::Render => write!(f, "render"),
            ErrorCategory::Dashboard => write!(f, "dashboard"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for adthreat.
///
/// Note: an unparseable timestamp is NOT an error. The row is retained with
/// a null timestamp and the run is reported as degraded.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("malformed input at line {line}: {reason}")]
    InputMalformed { line: u64, reason: String },

    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),

    // Aggregation errors (20-29)
    #[error("no critical events found in {scanned} scanned records")]
    NoCriticalEvents { scanned: usize },

    // Catalog errors (30-39)
    #[error("invalid event catalog: {0}")]
    CatalogInvalid(String),

    #[error("event catalog not found: {path}")]
    CatalogNotFound { path: PathBuf },

    // Render errors (40-49)
    #[error("render failed: {0}")]
    Render(String),

    // Dashboard errors (50-59)
    #[error("failed to bind dashboard server on {addr}: {reason}")]
    DashboardBind { addr: String, reason: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Input errors
    /// - 20-29: Aggregation errors
    /// - 30-39: Catalog errors
    /// - 40-49: Render errors
    /// - 50-59: Dashboard errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InputNotFound { .. } => 10,
            Error::InputMalformed { .. } => 11,
            Error::Csv(_) => 12,
            Error::NoCriticalEvents { .. } => 20,
            Error::CatalogInvalid(_) => 30,
            Error::CatalogNotFound { .. } => 31,
            Error::Render(_) => 40,
            Error::DashboardBind { .. } => 50,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InputNotFound { .. } | Error::InputMalformed { .. } | Error::Csv(_) => {
                ErrorCategory::Input
            }
            Error::NoCriticalEvents { .. } => ErrorCategory::Aggregation,
            Error::CatalogInvalid(_) | Error::CatalogNotFound { .. } => ErrorCategory::Catalog,
            Error::Render(_) => ErrorCategory::Render,
            Error::DashboardBind { .. } => ErrorCategory::Dashboard,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by user action.
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Input: user can fix the path or the export
            Error::InputNotFound { .. } => true,
            Error::InputMalformed { .. } => true,
            Error::Csv(_) => true,

            // Empty result: recoverable with a different input or catalog
            Error::NoCriticalEvents { .. } => true,

            // Catalog: fix or remove the catalog file
            Error::CatalogInvalid(_) => true,
            Error::CatalogNotFound { .. } => true,

            // Render failures indicate a bug
            Error::Render(_) => false,

            // Dashboard: pick another port
            Error::DashboardBind { .. } => true,

            // I/O: often transient
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => {
                "Check the path passed to --input. The file must exist before analysis starts."
            }
            Error::InputMalformed { .. } => {
                "The export must have TimeCreated, EventID, User, and Description columns with integer event IDs. Re-export the log or fix the named line."
            }
            Error::Csv(_) => {
                "The input could not be read as CSV. Check for truncation or a wrong delimiter."
            }
            Error::NoCriticalEvents { .. } => {
                "No record matched the critical-event catalog. Check the export covers the right time range, or supply a wider catalog with --catalog."
            }
            Error::CatalogInvalid(_) => {
                "Run 'adthreat check' to validate the catalog file, or remove it to fall back to the builtin catalog."
            }
            Error::CatalogNotFound { .. } => {
                "The path passed to --catalog does not exist. Fix the path or omit the flag to use the builtin catalog."
            }
            Error::Render(_) => {
                "Chart rendering failed on valid aggregation output. Please report this as a bug."
            }
            Error::DashboardBind { .. } => {
                "The address is already in use or not bindable. Choose another port with --port."
            }
            Error::Io(_) => {
                "Check disk space and permissions on the output directory, then retry."
            }
            Error::Json(_) => {
                "JSON serialization failed unexpectedly. Please report this as a bug."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => "Input File Not Found",
            Error::InputMalformed { .. } => "Malformed Input",
            Error::Csv(_) => "CSV Read Error",
            Error::NoCriticalEvents { .. } => "No Critical Events",
            Error::CatalogInvalid(_) => "Invalid Event Catalog",
            Error::CatalogNotFound { .. } => "Event Catalog Not Found",
            Error::Render(_) => "Render Failed",
            Error::DashboardBind { .. } => "Dashboard Bind Failed",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Additional structured context (e.g., path, line number).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InputNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::InputMalformed { line, .. } => {
                context.insert("line".to_string(), serde_json::json!(line));
            }
            Error::NoCriticalEvents { scanned } => {
                context.insert("scanned".to_string(), serde_json::json!(scanned));
            }
            Error::CatalogNotFound { path } => {
                context.insert("path".to_string(), serde_json::json!(path));
            }
            Error::DashboardBind { addr, .. } => {
                context.insert("addr".to_string(), serde_json::json!(addr));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
