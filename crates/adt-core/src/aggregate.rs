//! The aggregation pipeline: filter, count, compose.
//!
//! One aggregator consumed by both entry points. Pure functions over
//! immutable inputs: deterministic given deterministic input ordering.
//!
//! Ordering contract: `count_by` orders by descending count with ties broken
//! by first-seen key order; the by-date table is re-sorted chronologically.
//! Rows without a parseable timestamp count toward `by_event` and `by_user`
//! but are excluded from `by_date` and surfaced as `undated`.

use adt_common::{
    AggregationResult, CriticalEvent, DateCount, Error, EventCount, LogRecord, Result, UserCount,
    UserEventRow,
};
use adt_config::EventCatalog;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::{debug, info};

/// Keep only records whose event ID is in the catalog, attaching the
/// catalog label to each retained record.
///
/// Fails with `Error::NoCriticalEvents` if nothing remains. This is a hard
/// stop, not a soft warning: downstream charting has no meaningful
/// empty-state rendering.
pub fn filter_critical(records: &[LogRecord], catalog: &EventCatalog) -> Result<Vec<CriticalEvent>> {
    let critical: Vec<CriticalEvent> = records
        .iter()
        .filter_map(|record| {
            catalog.get(record.event_id).map(|label| CriticalEvent {
                record: record.clone(),
                event_description: label.to_string(),
            })
        })
        .collect();

    if critical.is_empty() {
        return Err(Error::NoCriticalEvents {
            scanned: records.len(),
        });
    }

    info!(
        scanned = records.len(),
        critical = critical.len(),
        "filtered critical events"
    );

    Ok(critical)
}

/// Group items by `key_fn`, count occurrences per group, and order by
/// descending count with ties broken by first-seen key order.
pub fn count_by<T, K, F>(items: &[T], key_fn: F) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut counts: HashMap<K, (u64, usize)> = HashMap::new();
    for (idx, item) in items.iter().enumerate() {
        let entry = counts.entry(key_fn(item)).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut table: Vec<(K, u64, usize)> = counts
        .into_iter()
        .map(|(key, (count, first_seen))| (key, count, first_seen))
        .collect();
    table.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    table.into_iter().map(|(key, count, _)| (key, count)).collect()
}

/// Compose the three aggregation tables from the filtered record set.
///
/// Pure function of its input; no side effects.
pub fn aggregate(critical: &[CriticalEvent]) -> AggregationResult {
    let by_event = count_by(critical, |ev| {
        (ev.event_id(), ev.event_description.clone())
    })
    .into_iter()
    .map(|((event_id, description), count)| EventCount {
        event_id,
        description,
        count,
    })
    .collect();

    let by_user = count_by(critical, |ev| ev.user().to_string())
        .into_iter()
        .map(|(user, count)| UserCount { user, count })
        .collect();

    let dated: Vec<&CriticalEvent> = critical.iter().filter(|ev| ev.date().is_some()).collect();
    let undated = (critical.len() - dated.len()) as u64;

    let mut by_date: Vec<DateCount> = count_by(&dated, |ev| {
        ev.date().expect("dated subset has timestamps")
    })
    .into_iter()
    .map(|(date, count)| DateCount { date, count })
    .collect();
    by_date.sort_by_key(|d| d.date);

    let result = AggregationResult {
        by_event,
        by_user,
        by_date,
        total: critical.len() as u64,
        undated,
    };

    debug_assert!(result.counts_consistent());
    debug!(
        total = result.total,
        undated = result.undated,
        events = result.by_event.len(),
        users = result.by_user.len(),
        dates = result.by_date.len(),
        "aggregation complete"
    );

    result
}

/// The dashboard drill-down: rows for one user, in record order.
pub fn rows_for_user(critical: &[CriticalEvent], user: &str) -> Vec<UserEventRow> {
    critical
        .iter()
        .filter(|ev| ev.user() == user)
        .map(UserEventRow::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(day: u32, event_id: u32, user: &str) -> LogRecord {
        LogRecord {
            time_created: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            event_id,
            user: user.to_string(),
            description: format!("event {event_id} for {user}"),
        }
    }

    fn undated(event_id: u32, user: &str) -> LogRecord {
        LogRecord {
            time_created: None,
            event_id,
            user: user.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_spec_scenario() {
        // [(t1,4720,alice), (t2,4732,bob), (t3,4720,alice)]
        let records = vec![
            record(1, 4720, "alice"),
            record(2, 4732, "bob"),
            record(3, 4720, "alice"),
        ];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        let result = aggregate(&critical);

        assert_eq!(result.by_event.len(), 2);
        assert_eq!(result.by_event[0].event_id, 4720);
        assert_eq!(result.by_event[0].count, 2);
        assert_eq!(result.by_event[0].description, "User Account Created");
        assert_eq!(result.by_event[1].event_id, 4732);
        assert_eq!(result.by_event[1].count, 1);

        assert_eq!(result.by_user[0].user, "alice");
        assert_eq!(result.by_user[0].count, 2);
        assert_eq!(result.by_user[1].user, "bob");
        assert_eq!(result.by_user[1].count, 1);

        assert_eq!(result.total, 3);
        assert!(result.counts_consistent());
    }

    #[test]
    fn test_filter_attaches_catalog_label() {
        let records = vec![record(1, 4723, "carol")];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        assert_eq!(critical[0].event_description, "Password Change Attempt");
    }

    #[test]
    fn test_filter_drops_uncatalogued_events() {
        let records = vec![record(1, 4720, "alice"), record(2, 9999, "mallory")];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].user(), "alice");
    }

    #[test]
    fn test_empty_result_is_fatal() {
        let records = vec![record(1, 9999, "mallory")];
        let err = filter_critical(&records, &EventCatalog::builtin()).unwrap_err();
        match err {
            Error::NoCriticalEvents { scanned } => assert_eq!(scanned, 1),
            other => panic!("expected NoCriticalEvents, got {other:?}"),
        }
    }

    #[test]
    fn test_alternate_catalog_injected() {
        use adt_config::catalog::CatalogEntry;
        let catalog = EventCatalog::new(vec![CatalogEntry {
            event_id: 9999,
            description: "Custom Event".to_string(),
        }]);
        let records = vec![record(1, 9999, "mallory")];
        let critical = filter_critical(&records, &catalog).unwrap();
        assert_eq!(critical[0].event_description, "Custom Event");
    }

    #[test]
    fn test_count_by_descending_with_first_seen_ties() {
        let items = vec!["b", "a", "a", "c", "b", "d"];
        let counts = count_by(&items, |s| s.to_string());
        // a and b both have 2; b was seen first. c and d both have 1; c first.
        assert_eq!(
            counts,
            vec![
                ("b".to_string(), 2),
                ("a".to_string(), 2),
                ("c".to_string(), 1),
                ("d".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_count_by_sums_to_input_size() {
        let items = vec![1, 2, 2, 3, 3, 3];
        let counts = count_by(&items, |n| *n);
        let sum: u64 = counts.iter().map(|(_, c)| c).sum();
        assert_eq!(sum, items.len() as u64);
    }

    #[test]
    fn test_by_date_chronological() {
        let records = vec![
            record(20, 4720, "alice"),
            record(5, 4720, "alice"),
            record(20, 4732, "bob"),
        ];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        let result = aggregate(&critical);

        assert_eq!(result.by_date.len(), 2);
        assert!(result.by_date[0].date < result.by_date[1].date);
        assert_eq!(result.by_date[1].count, 2);
    }

    #[test]
    fn test_undated_rows_counted_but_not_dated() {
        let records = vec![
            record(1, 4720, "alice"),
            undated(4720, "alice"),
            undated(4732, "bob"),
        ];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        let result = aggregate(&critical);

        assert_eq!(result.total, 3);
        assert_eq!(result.undated, 2);
        let date_sum: u64 = result.by_date.iter().map(|d| d.count).sum();
        assert_eq!(date_sum, 1);
        // Undated rows still count toward event and user tables.
        assert_eq!(result.by_event[0].count, 2);
        assert!(result.counts_consistent());
    }

    #[test]
    fn test_aggregate_idempotent() {
        let records = vec![
            record(1, 4720, "alice"),
            record(2, 4732, "bob"),
            undated(4723, "carol"),
        ];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();
        assert_eq!(aggregate(&critical), aggregate(&critical));
    }

    #[test]
    fn test_rows_for_user() {
        let records = vec![
            record(1, 4720, "alice"),
            record(2, 4732, "bob"),
            record(3, 4723, "alice"),
        ];
        let critical = filter_critical(&records, &EventCatalog::builtin()).unwrap();

        let rows = rows_for_user(&critical, "alice");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].event_description, "User Account Created");
        assert_eq!(rows[1].event_description, "Password Change Attempt");

        assert!(rows_for_user(&critical, "nobody").is_empty());
    }
}
