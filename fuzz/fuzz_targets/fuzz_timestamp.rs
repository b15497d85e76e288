//! Fuzz target for lenient timestamp parsing.
//!
//! The parser must return None on anything it cannot handle, never panic.

#![no_main]

use adt_core::ingest::parse_timestamp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = parse_timestamp(s);
    }
});
