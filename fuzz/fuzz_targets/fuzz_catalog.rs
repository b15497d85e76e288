//! Fuzz target for catalog.json parsing and validation.
//!
//! Arbitrary input must produce a catalog or a validation error, never a
//! panic.

#![no_main]

use adt_config::catalog::{CatalogFile, EventCatalog};
use adt_config::validate::validate_catalog;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(file) = CatalogFile::from_str(s) {
        let _ = validate_catalog(&file);
        let _ = EventCatalog::new(file.events);
    }
});
