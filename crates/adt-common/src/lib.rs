//! adthreat common types and errors.
//!
//! This crate provides foundational types shared across adthreat crates:
//! - Log record and critical-event types
//! - Aggregation summary tables
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod output;
pub mod record;
pub mod summary;

pub use error::{format_error_human, Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use record::{CriticalEvent, LogRecord, UserEventRow};
pub use summary::{AggregationResult, DateCount, EventCount, UserCount};

/// Schema version for JSON payloads (summary envelope, dashboard API).
pub const SCHEMA_VERSION: &str = "1.0.0";
