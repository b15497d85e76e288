//! adthreat core library.
//!
//! The aggregation pipeline and its two consumers:
//! - batch analysis (`analyze`): summary CSVs, chart SVGs, stdout tables
//! - interactive dashboard (`dashboard`): embedded HTTP server
//!
//! Both entry points run the same pipeline: load → filter → aggregate.

pub mod aggregate;
pub mod dashboard;
pub mod exit_codes;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod output;

pub use aggregate::{aggregate, count_by, filter_critical, rows_for_user};
pub use exit_codes::ExitCode;
pub use ingest::{load_records, LoadOutcome};
