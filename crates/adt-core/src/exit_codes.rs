//! Exit codes for the adthreat CLI.
//!
//! Exit codes communicate operation outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-6: Success/operational outcomes
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use adt_common::Error;

/// Exit codes for adthreat operations.
///
/// These codes are a stable contract for automation. Changes require
/// a major version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Success / Operational Outcomes (0-6)
    // ========================================================================
    /// Success: full run, every timestamp parsed
    Clean = 0,

    /// Run succeeded but at least one timestamp failed to parse;
    /// those rows are excluded from the by-date table
    Degraded = 1,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Input file does not exist
    InputMissing = 11,

    /// Input file is not a valid log export
    InputMalformed = 12,

    /// Catalog file missing or invalid
    CatalogError = 13,

    /// No record matched the critical-event catalog
    NoCriticalEvents = 14,

    /// Dashboard server could not bind its address
    DashboardBindError = 15,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates success (codes 0-1).
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::Degraded)
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "clean",
            ExitCode::Degraded => "degraded",
            ExitCode::ArgsError => "args_error",
            ExitCode::InputMissing => "input_missing",
            ExitCode::InputMalformed => "input_malformed",
            ExitCode::CatalogError => "catalog_error",
            ExitCode::NoCriticalEvents => "no_critical_events",
            ExitCode::DashboardBindError => "dashboard_bind_error",
            ExitCode::InternalError => "internal_error",
            ExitCode::IoError => "io_error",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InputNotFound { .. } => ExitCode::InputMissing,
            Error::InputMalformed { .. } | Error::Csv(_) => ExitCode::InputMalformed,
            Error::NoCriticalEvents { .. } => ExitCode::NoCriticalEvents,
            Error::CatalogInvalid(_) | Error::CatalogNotFound { .. } => ExitCode::CatalogError,
            Error::Render(_) => ExitCode::InternalError,
            Error::DashboardBind { .. } => ExitCode::DashboardBindError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_code_values_are_stable() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::Degraded.as_i32(), 1);
        assert_eq!(ExitCode::InputMissing.as_i32(), 11);
        assert_eq!(ExitCode::NoCriticalEvents.as_i32(), 14);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
    }

    #[test]
    fn test_classification() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::Degraded.is_success());
        assert!(ExitCode::CatalogError.is_user_error());
        assert!(ExitCode::IoError.is_internal_error());
        assert!(!ExitCode::Degraded.is_user_error());
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            ExitCode::from(&Error::InputNotFound {
                path: PathBuf::from("x.csv")
            }),
            ExitCode::InputMissing
        );
        assert_eq!(
            ExitCode::from(&Error::NoCriticalEvents { scanned: 3 }),
            ExitCode::NoCriticalEvents
        );
        assert_eq!(
            ExitCode::from(&Error::CatalogInvalid("bad".into())),
            ExitCode::CatalogError
        );
    }
}
