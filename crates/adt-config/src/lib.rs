//! Critical-event catalog configuration for adthreat.
//!
//! The catalog maps Windows security event IDs to human-readable labels and
//! is the sole filter predicate for "critical". It is always passed by value
//! into the aggregation pipeline, never read from a global: the builtin
//! default lives here and an alternate catalog can be supplied from a JSON
//! file resolved in the standard order (CLI → env → config dir → XDG →
//! system → builtin).

pub mod catalog;
pub mod resolve;
pub mod validate;

pub use catalog::{CatalogEntry, CatalogFile, EventCatalog};
pub use resolve::{resolve_catalog, CatalogSource, ResolvedCatalog};
pub use validate::{validate_catalog, ValidationError, ValidationResult};

/// Supported catalog file schema version.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
