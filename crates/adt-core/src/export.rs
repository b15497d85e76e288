//! Batch artifact export.
//!
//! Writes the three summary CSVs and the three chart SVGs. Everything is
//! rendered to memory before the first byte hits disk, so a failed run
//! leaves no partial artifact set behind.

use adt_common::{AggregationResult, Error, Result};
use adt_report::config::ChartStyle;
use adt_report::{render_bar_chart, render_line_chart};
use std::path::{Path, PathBuf};
use tracing::info;

pub const EVENT_COUNTS_CSV: &str = "event_counts.csv";
pub const USER_EVENT_COUNTS_CSV: &str = "user_event_counts.csv";
pub const EVENTS_BY_DATE_CSV: &str = "events_by_date.csv";
pub const EVENT_COUNTS_SVG: &str = "event_counts.svg";
pub const USER_EVENT_COUNTS_SVG: &str = "user_event_counts.svg";
pub const EVENTS_BY_DATE_SVG: &str = "events_by_date.svg";

/// A rendered artifact waiting to be written.
struct Artifact {
    name: &'static str,
    bytes: Vec<u8>,
}

/// Export summary CSVs (and, unless disabled, chart SVGs) to `out_dir`.
///
/// Returns the written paths. All-or-nothing: rendering errors abort before
/// anything is written.
pub fn export_artifacts(
    result: &AggregationResult,
    out_dir: &Path,
    charts: bool,
) -> Result<Vec<PathBuf>> {
    let mut artifacts = vec![
        Artifact {
            name: EVENT_COUNTS_CSV,
            bytes: render_event_counts_csv(result)?,
        },
        Artifact {
            name: USER_EVENT_COUNTS_CSV,
            bytes: render_user_counts_csv(result)?,
        },
        Artifact {
            name: EVENTS_BY_DATE_CSV,
            bytes: render_date_counts_csv(result)?,
        },
    ];

    if charts {
        artifacts.push(Artifact {
            name: EVENT_COUNTS_SVG,
            bytes: render_event_chart(result)?.into_bytes(),
        });
        artifacts.push(Artifact {
            name: USER_EVENT_COUNTS_SVG,
            bytes: render_user_chart(result)?.into_bytes(),
        });
        artifacts.push(Artifact {
            name: EVENTS_BY_DATE_SVG,
            bytes: render_date_chart(result)?.into_bytes(),
        });
    }

    std::fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts.drain(..) {
        let path = out_dir.join(artifact.name);
        std::fs::write(&path, &artifact.bytes)?;
        written.push(path);
    }

    info!(
        out_dir = %out_dir.display(),
        artifacts = written.len(),
        "batch artifacts written"
    );

    Ok(written)
}

fn render_event_counts_csv(result: &AggregationResult) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["EventID", "Counts", "EventDescription"])?;
    for row in &result.by_event {
        wtr.write_record([
            row.event_id.to_string(),
            row.count.to_string(),
            row.description.clone(),
        ])?;
    }
    finish(wtr)
}

fn render_user_counts_csv(result: &AggregationResult) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["User", "Counts"])?;
    for row in &result.by_user {
        wtr.write_record([row.user.clone(), row.count.to_string()])?;
    }
    finish(wtr)
}

fn render_date_counts_csv(result: &AggregationResult) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Date", "Counts"])?;
    for row in &result.by_date {
        wtr.write_record([row.date.to_string(), row.count.to_string()])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    wtr.into_inner()
        .map_err(|e| Error::Render(format!("CSV buffer flush failed: {e}")))
}

fn render_event_chart(result: &AggregationResult) -> Result<String> {
    let data: Vec<(String, u64)> = result
        .by_event
        .iter()
        .map(|e| (e.event_id.to_string(), e.count))
        .collect();
    render_bar_chart(
        "Number of Critical Events by Event ID",
        "Event ID",
        "Number of Occurrences",
        &data,
        &ChartStyle::event_bars(),
    )
    .map_err(|e| Error::Render(e.to_string()))
}

fn render_user_chart(result: &AggregationResult) -> Result<String> {
    let data: Vec<(String, u64)> = result
        .by_user
        .iter()
        .map(|u| (u.user.clone(), u.count))
        .collect();
    render_bar_chart(
        "Number of Critical Events by User",
        "User",
        "Number of Occurrences",
        &data,
        &ChartStyle::user_bars(),
    )
    .map_err(|e| Error::Render(e.to_string()))
}

fn render_date_chart(result: &AggregationResult) -> Result<String> {
    let data: Vec<(String, u64)> = result
        .by_date
        .iter()
        .map(|d| (d.date.to_string(), d.count))
        .collect();
    // A fully undated input has an empty by-date table; the time-series
    // chart is skipped rather than failed.
    if data.is_empty() {
        return Ok(empty_date_chart_placeholder());
    }
    render_line_chart(
        "Number of Critical Events by Date",
        "Date",
        "Number of Occurrences",
        &data,
        &ChartStyle::date_line(),
    )
    .map_err(|e| Error::Render(e.to_string()))
}

fn empty_date_chart_placeholder() -> String {
    concat!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="600" viewBox="0 0 1000 600" font-family="sans-serif">"#,
        r##"<rect width="1000" height="600" fill="#ffffff"/>"##,
        r#"<text x="500" y="300" text-anchor="middle" font-size="16">No dated events to plot</text>"#,
        "</svg>\n"
    )
    .to_string()
}
