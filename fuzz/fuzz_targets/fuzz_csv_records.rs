//! Fuzz target for CSV record ingestion.
//!
//! Malformed exports must surface as errors, never panics, and successful
//! loads must keep the dated-then-undated sort invariant.

#![no_main]

use adt_core::ingest::read_records;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(outcome) = read_records(data) {
        // Dated rows come first in chronological order
        let mut seen_undated = false;
        let mut last = None;
        for record in &outcome.records {
            match record.time_created {
                Some(t) => {
                    assert!(!seen_undated, "dated row after an undated row");
                    if let Some(prev) = last {
                        assert!(prev <= t, "records out of order");
                    }
                    last = Some(t);
                }
                None => seen_undated = true,
            }
        }
        assert!(outcome.parse_failures as usize <= outcome.records.len());
    }
});
