//! Aggregation summary tables.
//!
//! The three derived tables produced by the aggregation pipeline, plus the
//! bookkeeping needed to state the count invariants: `by_event` and `by_user`
//! each sum to `total`; `by_date` sums to `total - undated` because rows
//! without a parseable timestamp are excluded from date grouping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counts per event ID, with the catalog label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCount {
    pub event_id: u32,
    pub description: String,
    pub count: u64,
}

/// Counts per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCount {
    pub user: String,
    pub count: u64,
}

/// Counts per calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// The complete aggregation output: immutable once computed.
///
/// `by_event` and `by_user` are ordered by descending count with ties in
/// first-seen order; `by_date` is chronological.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub by_event: Vec<EventCount>,
    pub by_user: Vec<UserCount>,
    pub by_date: Vec<DateCount>,

    /// Number of critical records after filtering.
    pub total: u64,

    /// Critical records with no parseable timestamp, excluded from `by_date`.
    pub undated: u64,
}

impl AggregationResult {
    /// Users in table order, for dashboard selector population.
    pub fn users(&self) -> Vec<&str> {
        self.by_user.iter().map(|u| u.user.as_str()).collect()
    }

    /// Check the count-conservation invariants.
    pub fn counts_consistent(&self) -> bool {
        let event_sum: u64 = self.by_event.iter().map(|e| e.count).sum();
        let user_sum: u64 = self.by_user.iter().map(|u| u.count).sum();
        let date_sum: u64 = self.by_date.iter().map(|d| d.count).sum();
        event_sum == self.total && user_sum == self.total && date_sum == self.total - self.undated
    }
}
