//! CSV ingest for Active Directory log exports.
//!
//! Reads header-addressed rows into `LogRecord`s. The existence check runs
//! before any parsing so a missing path fails fast. A timestamp that fails
//! to parse degrades the row (kept with `time_created = None`) instead of
//! dropping it; a missing column or non-integer `EventID` is fatal.
//!
//! After loading, records are sorted chronologically with undated rows last,
//! original order preserved within ties.

use adt_common::record::{COL_DESCRIPTION, COL_EVENT_ID, COL_TIME_CREATED, COL_USER};
use adt_common::{Error, LogRecord, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Accepted timestamp shapes, tried in order after RFC 3339.
/// Naive timestamps are taken as UTC.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Result of loading an input file.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// All records, chronologically sorted, undated rows last.
    pub records: Vec<LogRecord>,

    /// Rows whose timestamp did not parse (kept with a null timestamp).
    pub parse_failures: u64,
}

/// Load records from a CSV export.
///
/// Fails with `Error::InputNotFound` before any parsing if the path does
/// not exist.
pub fn load_records(path: &Path) -> Result<LoadOutcome> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), "loading log export");
    let file = std::fs::File::open(path)?;
    read_records(file)
}

/// Read records from any CSV source.
///
/// Split out from `load_records` so tests and fuzzing can feed bytes
/// directly.
pub fn read_records<R: io::Read>(reader: R) -> Result<LoadOutcome> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::InputMalformed {
                line: 1,
                reason: format!("missing required column '{}'", name),
            })
    };

    let time_idx = col(COL_TIME_CREATED)?;
    let event_idx = col(COL_EVENT_ID)?;
    let user_idx = col(COL_USER)?;
    let desc_idx = col(COL_DESCRIPTION)?;

    let mut records = Vec::new();
    let mut parse_failures = 0u64;

    for row in rdr.records() {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());

        let field = |idx: usize| -> Result<&str> {
            row.get(idx).ok_or_else(|| Error::InputMalformed {
                line,
                reason: "row has fewer fields than the header".to_string(),
            })
        };

        let raw_event = field(event_idx)?.trim();
        let event_id: u32 = raw_event.parse().map_err(|_| Error::InputMalformed {
            line,
            reason: format!("EventID '{}' is not an integer", raw_event),
        })?;

        let raw_time = field(time_idx)?.trim();
        let time_created = parse_timestamp(raw_time);
        if time_created.is_none() {
            parse_failures += 1;
        }

        records.push(LogRecord {
            time_created,
            event_id,
            user: field(user_idx)?.to_string(),
            description: field(desc_idx)?.to_string(),
        });
    }

    // Stable sort: dated rows chronological, undated rows after them in
    // original order.
    records.sort_by(|a, b| match (a.time_created, b.time_created) {
        (Some(ta), Some(tb)) => ta.cmp(&tb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    if parse_failures > 0 {
        warn!(
            rows = parse_failures,
            "timestamps failed to parse; rows kept without dates"
        );
    }

    debug!(rows = records.len(), "log export loaded");

    Ok(LoadOutcome {
        records,
        parse_failures,
    })
}

/// Parse a timestamp string leniently over the fixed format list.
///
/// Returns `None` when nothing matches; the caller keeps the row.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }

    // Bare date: midnight UTC.
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    None
}
