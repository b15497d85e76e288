//! Rendering invariant tests.
//!
//! These tests validate generated markup without requiring a browser:
//! - Dashboard: pinned CDN URL with SRI integrity, embedded schema-versioned
//!   payload, escaped user-controlled strings
//! - SVG charts: well-formed structure with expected element counts

use adt_common::{AggregationResult, DateCount, EventCount, UserCount};
use adt_report::config::{ChartStyle, DashboardOptions};
use adt_report::dashboard::render_dashboard;
use adt_report::svg::{render_bar_chart, render_line_chart};
use chrono::NaiveDate;

fn test_result() -> AggregationResult {
    AggregationResult {
        by_event: vec![
            EventCount {
                event_id: 4720,
                description: "User Account Created".to_string(),
                count: 5,
            },
            EventCount {
                event_id: 4732,
                description: "Security Group Member Added".to_string(),
                count: 2,
            },
        ],
        by_user: vec![
            UserCount {
                user: "alice".to_string(),
                count: 4,
            },
            UserCount {
                user: "bob & \"friends\"".to_string(),
                count: 3,
            },
        ],
        by_date: vec![
            DateCount {
                date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
                count: 3,
            },
            DateCount {
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                count: 4,
            },
        ],
        total: 7,
        undated: 0,
    }
}

#[test]
fn dashboard_pins_cdn_library_with_sri() {
    let opts = DashboardOptions::default();
    let html = render_dashboard(&test_result(), &opts).unwrap();

    let script_tag = html
        .lines()
        .find(|l| l.contains("echarts@"))
        .or_else(|| {
            // Minified release renders collapse to one line.
            if html.contains("echarts@") {
                Some(html.as_str())
            } else {
                None
            }
        })
        .expect("page must load echarts from CDN");

    assert!(script_tag.contains(&format!("echarts@{}", opts.echarts.version)));
    assert!(script_tag.contains("integrity=\"sha384-"));
    assert!(script_tag.contains("crossorigin=\"anonymous\""));
}

#[test]
fn dashboard_embeds_schema_versioned_payload() {
    let html = render_dashboard(&test_result(), &DashboardOptions::default()).unwrap();
    assert!(html.contains("dashboard-data"));
    assert!(html.contains("schema_version"));
    assert!(html.contains(adt_common::SCHEMA_VERSION));
}

#[test]
fn dashboard_escapes_user_controlled_strings() {
    let mut result = test_result();
    result.by_user.push(UserCount {
        user: "<script>alert('x')</script>".to_string(),
        count: 1,
    });

    let html = render_dashboard(&result, &DashboardOptions::default()).unwrap();
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;alert"));
    // Ampersands in legitimate names are escaped, not dropped.
    assert!(html.contains("bob &amp; &quot;friends&quot;"));
}

#[test]
fn dashboard_has_drilldown_table_columns() {
    let html = render_dashboard(&test_result(), &DashboardOptions::default()).unwrap();
    assert!(html.contains("TimeCreated"));
    assert!(html.contains("EventDescription"));
    assert!(html.contains("Description"));
    assert!(html.contains("/api/user-events"));
}

#[test]
fn bar_chart_structure_matches_table() {
    let result = test_result();
    let data: Vec<(String, u64)> = result
        .by_event
        .iter()
        .map(|e| (e.event_id.to_string(), e.count))
        .collect();

    let svg = render_bar_chart(
        "Number of Critical Events by Event ID",
        "Event ID",
        "Number of Occurrences",
        &data,
        &ChartStyle::event_bars(),
    )
    .unwrap();

    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("<rect class=\"bar\"").count(), data.len());
    // One x tick per bar, y ticks per style, two axis lines.
    assert_eq!(svg.matches("class=\"xtick\"").count(), data.len());
    assert_eq!(svg.matches("class=\"axis\"").count(), 2);
}

#[test]
fn line_chart_structure_matches_table() {
    let result = test_result();
    let data: Vec<(String, u64)> = result
        .by_date
        .iter()
        .map(|d| (d.date.to_string(), d.count))
        .collect();

    let svg = render_line_chart(
        "Number of Critical Events by Date",
        "Date",
        "Number of Occurrences",
        &data,
        &ChartStyle::date_line(),
    )
    .unwrap();

    assert_eq!(svg.matches("<polyline class=\"series\"").count(), 1);
    assert_eq!(svg.matches("<circle class=\"marker\"").count(), data.len());
    assert!(svg.contains("2024-03-14"));
    assert!(svg.contains("2024-03-15"));
}
