//! Chart and dashboard rendering for adthreat.
//!
//! Two render paths over the same aggregation tables:
//!
//! - **Batch charts**: standalone SVG documents (bar, bar, line) written next
//!   to the summary CSVs. Self-contained vector images, no external assets.
//! - **Dashboard page**: a single self-contained HTML page with three ECharts
//!   panels and a per-user drill-down table. The chart library is loaded from
//!   a pinned CDN version with an SRI hash; all user-controlled strings are
//!   escaped before they reach markup.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod svg;

pub use config::{CdnLibrary, ChartStyle, DashboardOptions};
pub use dashboard::render_dashboard;
pub use error::{ReportError, Result};
pub use svg::{render_bar_chart, render_line_chart};
