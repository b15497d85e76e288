//! End-to-end tests for the dashboard HTTP server.
//!
//! Starts the server in-process on a per-test port and talks to it over a
//! raw TCP stream.

use adt_common::LogRecord;
use adt_config::EventCatalog;
use adt_core::aggregate::{aggregate, filter_critical};
use adt_core::dashboard::{DashboardConfig, DashboardServer};
use adt_report::DashboardOptions;
use chrono::{TimeZone, Utc};
use std::io::{Read, Write};
use std::net::TcpStream;

fn sample_records() -> Vec<LogRecord> {
    vec![
        LogRecord {
            time_created: Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()),
            event_id: 4720,
            user: "alice".to_string(),
            description: "Account alice created".to_string(),
        },
        LogRecord {
            time_created: Some(Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap()),
            event_id: 4732,
            user: "bob".to_string(),
            description: "bob added to Admins".to_string(),
        },
        LogRecord {
            time_created: Some(Utc.with_ymd_and_hms(2024, 3, 16, 8, 0, 0).unwrap()),
            event_id: 4723,
            user: "alice".to_string(),
            description: "Password change for alice".to_string(),
        },
    ]
}

fn start_server(port: u16) -> Option<DashboardServer> {
    let records = sample_records();
    let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
    let result = aggregate(&critical);

    let config = DashboardConfig {
        bind: "127.0.0.1".to_string(),
        port,
    };

    match DashboardServer::start(&config, &result, critical, &DashboardOptions::default()) {
        Ok(server) => Some(server),
        Err(e) => {
            // Port may be in use in CI, skip gracefully
            eprintln!("skipping dashboard server test: {e}");
            None
        }
    }
}

fn get(server: &DashboardServer, path: &str) -> String {
    let mut stream = TcpStream::connect(server.addr()).expect("connect to dashboard");
    let request = format!("GET {path} HTTP/1.0\r\nHost: localhost\r\n\r\n");
    stream.write_all(request.as_bytes()).unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn body(response: &str) -> &str {
    response
        .split_once("\r\n\r\n")
        .map(|(_, b)| b)
        .unwrap_or("")
}

fn test_port(offset: u16) -> u16 {
    18050 + offset + (std::process::id() % 500) as u16
}

#[test]
fn test_index_serves_dashboard_page() {
    let Some(server) = start_server(test_port(0)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    let response = get(&server, "/");
    assert!(response.contains("200 OK"));
    assert!(response.contains("Active Directory Threat Dashboard"));
    assert!(response.contains("chart-events"));

    server.shutdown();
}

#[test]
fn test_summary_endpoint_returns_tables() {
    let Some(server) = start_server(test_port(1)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    let response = get(&server, "/api/summary");
    assert!(response.contains("200 OK"));

    let value: serde_json::Value = serde_json::from_str(body(&response)).unwrap();
    assert!(value["schema_version"].is_string());
    assert_eq!(value["summary"]["total"], 3);
    assert_eq!(value["summary"]["by_user"][0]["user"], "alice");

    server.shutdown();
}

#[test]
fn test_user_events_drill_down() {
    let Some(server) = start_server(test_port(2)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    let response = get(&server, "/api/user-events?user=alice");
    assert!(response.contains("200 OK"));

    let value: serde_json::Value = serde_json::from_str(body(&response)).unwrap();
    assert_eq!(value["user"], "alice");
    assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    assert_eq!(value["rows"][0]["event_description"], "User Account Created");

    // Unknown user: valid request, empty rows
    let response = get(&server, "/api/user-events?user=nobody");
    assert!(response.contains("200 OK"));
    let value: serde_json::Value = serde_json::from_str(body(&response)).unwrap();
    assert!(value["rows"].as_array().unwrap().is_empty());

    server.shutdown();
}

#[test]
fn test_user_events_requires_user_param() {
    let Some(server) = start_server(test_port(3)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    let response = get(&server, "/api/user-events");
    assert!(response.contains("400"));

    server.shutdown();
}

#[test]
fn test_health_and_unknown_paths() {
    let Some(server) = start_server(test_port(4)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    let response = get(&server, "/health");
    assert!(response.contains("200 OK"));

    let response = get(&server, "/unknown");
    assert!(response.contains("404"));

    server.shutdown();
}

#[test]
fn test_bind_conflict_is_reported() {
    let Some(server) = start_server(test_port(5)) else {
        return;
    };
    std::thread::sleep(std::time::Duration::from_millis(100));

    // Second server on the same port must fail with a bind error
    let records = sample_records();
    let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
    let result = aggregate(&critical);
    let config = DashboardConfig {
        bind: "127.0.0.1".to_string(),
        port: server.addr().port(),
    };
    let err = DashboardServer::start(&config, &result, critical, &DashboardOptions::default())
        .err()
        .expect("second bind should fail");
    assert!(matches!(err, adt_common::Error::DashboardBind { .. }));

    server.shutdown();
}
