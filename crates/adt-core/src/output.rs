//! Stdout rendering for the analyze command.
//!
//! Stdout carries the command payload only; logs go to stderr. The JSON
//! envelope is schema-versioned so downstream tooling can detect drift.

use crate::exit_codes::ExitCode;
use adt_common::{AggregationResult, LogRecord, OutputFormat, Result, SCHEMA_VERSION};
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Everything the analyze command reports after the pipeline runs.
#[derive(Debug)]
pub struct RunReport<'a> {
    pub result: &'a AggregationResult,
    pub parse_failures: u64,
    pub artifacts: &'a [PathBuf],
    pub exit_code: ExitCode,
}

/// Render the run report in the requested format.
pub fn render_report(report: &RunReport<'_>, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => render_json(report),
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

/// The first `n` loaded rows, printed before the count tables in summary
/// mode.
pub fn render_preview(records: &[LogRecord], n: usize) -> String {
    let mut out = String::from("Preview of the data:\n");
    let _ = writeln!(out, "{:<20} {:>7}  {:<16} Description", "TimeCreated", "EventID", "User");
    for record in records.iter().take(n) {
        let time = record
            .time_created
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S").to_string());
        let _ = writeln!(
            out,
            "{:<20} {:>7}  {:<16} {}",
            time, record.event_id, record.user, record.description
        );
    }
    out
}

fn render_json(report: &RunReport<'_>) -> Result<String> {
    let envelope = json!({
        "schema_version": SCHEMA_VERSION,
        "status": report.exit_code.code_name(),
        "parse_failures": report.parse_failures,
        "artifacts": report.artifacts,
        "summary": report.result,
    });
    Ok(serde_json::to_string_pretty(&envelope)?)
}

fn render_markdown(report: &RunReport<'_>) -> String {
    let result = report.result;
    let mut out = String::new();

    let _ = writeln!(out, "# Critical Event Analysis\n");
    let _ = writeln!(
        out,
        "{} critical events ({} without a parseable timestamp).\n",
        result.total, result.undated
    );

    let _ = writeln!(out, "## Events by ID\n");
    let _ = writeln!(out, "| EventID | Counts | EventDescription |");
    let _ = writeln!(out, "|---------|--------|------------------|");
    for row in &result.by_event {
        let _ = writeln!(out, "| {} | {} | {} |", row.event_id, row.count, row.description);
    }

    let _ = writeln!(out, "\n## Events by User\n");
    let _ = writeln!(out, "| User | Counts |");
    let _ = writeln!(out, "|------|--------|");
    for row in &result.by_user {
        let _ = writeln!(out, "| {} | {} |", row.user, row.count);
    }

    let _ = writeln!(out, "\n## Events by Date\n");
    let _ = writeln!(out, "| Date | Counts |");
    let _ = writeln!(out, "|------|--------|");
    for row in &result.by_date {
        let _ = writeln!(out, "| {} | {} |", row.date, row.count);
    }

    if !report.artifacts.is_empty() {
        let _ = writeln!(out, "\n## Artifacts\n");
        for path in report.artifacts {
            let _ = writeln!(out, "- `{}`", path.display());
        }
    }

    out
}

fn render_summary(report: &RunReport<'_>) -> String {
    let result = report.result;
    let mut out = String::new();

    let _ = writeln!(out, "Critical events: {}", result.total);
    if result.undated > 0 {
        let _ = writeln!(out, "  (no timestamp: {})", result.undated);
    }

    let _ = writeln!(out, "\nBy event ID:");
    for row in &result.by_event {
        let _ = writeln!(out, "  {:>6}  {:>5}  {}", row.event_id, row.count, row.description);
    }

    let _ = writeln!(out, "\nBy user:");
    for row in &result.by_user {
        let _ = writeln!(out, "  {:<20} {:>5}", row.user, row.count);
    }

    let _ = writeln!(out, "\nBy date:");
    for row in &result.by_date {
        let _ = writeln!(out, "  {}  {:>5}", row.date, row.count);
    }

    if !report.artifacts.is_empty() {
        let _ = writeln!(out, "\nArtifacts written:");
        for path in report.artifacts {
            let _ = writeln!(out, "  {}", path.display());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use adt_common::{DateCount, EventCount, UserCount};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> AggregationResult {
        AggregationResult {
            by_event: vec![EventCount {
                event_id: 4720,
                description: "User Account Created".to_string(),
                count: 2,
            }],
            by_user: vec![UserCount {
                user: "alice".to_string(),
                count: 2,
            }],
            by_date: vec![DateCount {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                count: 2,
            }],
            total: 2,
            undated: 0,
        }
    }

    #[test]
    fn test_json_envelope_schema_versioned() {
        let result = sample();
        let report = RunReport {
            result: &result,
            parse_failures: 0,
            artifacts: &[],
            exit_code: ExitCode::Clean,
        };
        let text = render_report(&report, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["status"], "clean");
        assert_eq!(value["summary"]["total"], 2);
    }

    #[test]
    fn test_markdown_has_all_tables() {
        let result = sample();
        let report = RunReport {
            result: &result,
            parse_failures: 0,
            artifacts: &[],
            exit_code: ExitCode::Clean,
        };
        let text = render_report(&report, OutputFormat::Md).unwrap();
        assert!(text.contains("| EventID | Counts | EventDescription |"));
        assert!(text.contains("| 4720 | 2 | User Account Created |"));
        assert!(text.contains("| alice | 2 |"));
        assert!(text.contains("| 2024-03-15 | 2 |"));
    }

    #[test]
    fn test_summary_mentions_undated_only_when_present() {
        let mut result = sample();
        let report = RunReport {
            result: &result.clone(),
            parse_failures: 0,
            artifacts: &[],
            exit_code: ExitCode::Clean,
        };
        let text = render_report(&report, OutputFormat::Summary).unwrap();
        assert!(!text.contains("no timestamp"));

        result.undated = 1;
        let report = RunReport {
            result: &result,
            parse_failures: 1,
            artifacts: &[],
            exit_code: ExitCode::Degraded,
        };
        let text = render_report(&report, OutputFormat::Summary).unwrap();
        assert!(text.contains("no timestamp: 1"));
    }

    #[test]
    fn test_preview_lists_head_rows() {
        let records: Vec<LogRecord> = (0..10)
            .map(|i| LogRecord {
                time_created: Some(Utc.with_ymd_and_hms(2024, 3, 1 + i, 8, 0, 0).unwrap()),
                event_id: 4720,
                user: format!("user{i}"),
                description: String::new(),
            })
            .collect();

        let text = render_preview(&records, 5);
        assert!(text.starts_with("Preview of the data:"));
        assert!(text.contains("user0"));
        assert!(text.contains("user4"));
        assert!(!text.contains("user5"));
    }
}
