//! Log record types for Active Directory security-event exports.
//!
//! One `LogRecord` per CSV row. The input schema is fixed: `TimeCreated`,
//! `EventID`, `User`, `Description`. Timestamps that fail to parse are kept
//! as `None` rather than dropping the row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Required column names in the input CSV.
pub const COL_TIME_CREATED: &str = "TimeCreated";
pub const COL_EVENT_ID: &str = "EventID";
pub const COL_USER: &str = "User";
pub const COL_DESCRIPTION: &str = "Description";

/// A single security-event log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Event timestamp; `None` if the source string did not parse.
    pub time_created: Option<DateTime<Utc>>,

    /// Windows security event ID (e.g. 4720).
    pub event_id: u32,

    /// Account name the event refers to.
    pub user: String,

    /// Free-text event description from the export.
    pub description: String,
}

impl LogRecord {
    /// Calendar date of the event (day truncation), if the timestamp parsed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.time_created.map(|t| t.date_naive())
    }
}

/// A log record that matched the critical-event catalog, with the catalog
/// label attached by the filter step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalEvent {
    #[serde(flatten)]
    pub record: LogRecord,

    /// Human-readable label from the catalog (e.g. "User Account Created").
    pub event_description: String,
}

impl CriticalEvent {
    pub fn event_id(&self) -> u32 {
        self.record.event_id
    }

    pub fn user(&self) -> &str {
        &self.record.user
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.record.date()
    }
}

/// One row of the per-user drill-down table shown by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEventRow {
    pub time_created: Option<DateTime<Utc>>,
    pub event_description: String,
    pub description: String,
}

impl From<&CriticalEvent> for UserEventRow {
    fn from(ev: &CriticalEvent) -> Self {
        UserEventRow {
            time_created: ev.record.time_created,
            event_description: ev.event_description.clone(),
            description: ev.record.description.clone(),
        }
    }
}
