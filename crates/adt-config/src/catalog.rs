//! Critical-event catalog types.
//!
//! These types match the catalog.json file format:
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "events": [
//!     { "event_id": 4720, "description": "User Account Created" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One catalog entry: an event ID and its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub event_id: u32,
    pub description: String,
}

/// On-disk catalog file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub schema_version: String,

    #[serde(default)]
    pub description: Option<String>,

    pub events: Vec<CatalogEntry>,
}

impl CatalogFile {
    /// Load a catalog file from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Parse a catalog file from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }
}

/// The in-memory critical-event catalog.
///
/// Entry order is the file order (first-seen), which is preserved through
/// iteration so diagnostic output stays deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCatalog {
    entries: Vec<CatalogEntry>,
}

impl EventCatalog {
    /// Build a catalog from entries, keeping the first occurrence of each ID.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut deduped: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !deduped.iter().any(|e| e.event_id == entry.event_id) {
                deduped.push(entry);
            }
        }
        EventCatalog { entries: deduped }
    }

    /// The builtin default catalog: the three security-sensitive Active
    /// Directory actions this tool was built around.
    pub fn builtin() -> Self {
        EventCatalog {
            entries: vec![
                CatalogEntry {
                    event_id: 4720,
                    description: "User Account Created".to_string(),
                },
                CatalogEntry {
                    event_id: 4732,
                    description: "Security Group Member Added".to_string(),
                },
                CatalogEntry {
                    event_id: 4723,
                    description: "Password Change Attempt".to_string(),
                },
            ],
        }
    }

    /// Load and validate a catalog from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let file = CatalogFile::from_file(path)?;
        crate::validate::validate_catalog(&file)?;
        Ok(EventCatalog::new(file.events))
    }

    /// Label for an event ID, if it is in the catalog.
    pub fn get(&self, event_id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.event_id == event_id)
            .map(|e| e.description.as_str())
    }

    /// Whether an event ID is critical.
    pub fn contains(&self, event_id: u32) -> bool {
        self.get(event_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }
}

impl Default for EventCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
