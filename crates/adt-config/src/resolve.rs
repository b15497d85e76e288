//! Catalog resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path →
//! system path → builtin default.

use crate::catalog::EventCatalog;
use crate::validate::ValidationError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the catalog was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/adthreat/.
    SystemConfig,

    /// Using the builtin default catalog.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::CliArgument => write!(f, "CLI argument"),
            CatalogSource::Environment => write!(f, "environment variable"),
            CatalogSource::XdgConfig => write!(f, "XDG config"),
            CatalogSource::SystemConfig => write!(f, "system config"),
            CatalogSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
const ENV_CATALOG_PATH: &str = "ADTHREAT_CATALOG";
const ENV_CONFIG_DIR: &str = "ADTHREAT_CONFIG_DIR";

/// Standard catalog file name.
const CATALOG_FILENAME: &str = "catalog.json";

/// Application name for XDG directories.
const APP_NAME: &str = "adthreat";

/// A resolved catalog with its provenance.
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    pub catalog: EventCatalog,
    pub source: CatalogSource,
    pub path: Option<PathBuf>,
}

/// Resolve the catalog file path using the standard resolution order.
///
/// Resolution order:
/// 1. Explicit CLI path (if provided; missing is an error, not a fallthrough)
/// 2. ADTHREAT_CATALOG environment variable
/// 3. ADTHREAT_CONFIG_DIR environment variable + catalog.json
/// 4. XDG config directory (~/.config/adthreat/catalog.json)
/// 5. System config (/etc/adthreat/catalog.json)
/// 6. Builtin default (None)
pub fn resolve_catalog_path(cli_path: Option<&Path>) -> (Option<PathBuf>, CatalogSource) {
    // 1. CLI argument: explicit, so do not silently fall through when missing.
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), CatalogSource::CliArgument);
    }

    // 2. Environment variable (direct path)
    if let Ok(env_path) = std::env::var(ENV_CATALOG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), CatalogSource::Environment);
        }
    }

    // 3. Environment variable (config dir)
    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CATALOG_FILENAME);
        if path.exists() {
            return (Some(path), CatalogSource::Environment);
        }
    }

    // 4. XDG config directory
    if let Some(xdg_config) = dirs::config_dir() {
        let path = xdg_config.join(APP_NAME).join(CATALOG_FILENAME);
        if path.exists() {
            return (Some(path), CatalogSource::XdgConfig);
        }
    }

    // 5. System config
    let system_path = system_config_dir().join(CATALOG_FILENAME);
    if system_path.exists() {
        return (Some(system_path), CatalogSource::SystemConfig);
    }

    // 6. Builtin default
    (None, CatalogSource::BuiltinDefault)
}

/// Resolve and load the catalog.
///
/// A CLI-provided path that does not exist or does not validate is an error;
/// the discovered-path tiers load and validate their file; with nothing found
/// the builtin catalog is used.
pub fn resolve_catalog(cli_path: Option<&Path>) -> Result<ResolvedCatalog, ValidationError> {
    let (path, source) = resolve_catalog_path(cli_path);

    let catalog = match &path {
        Some(p) => {
            if !p.exists() {
                return Err(ValidationError::IoError(format!(
                    "catalog file does not exist: {}",
                    p.display()
                )));
            }
            debug!(path = %p.display(), source = %source, "loading event catalog");
            EventCatalog::from_file(p)?
        }
        None => {
            debug!("no catalog file found, using builtin default");
            EventCatalog::builtin()
        }
    };

    Ok(ResolvedCatalog {
        catalog,
        source,
        path,
    })
}

/// Get the XDG config directory for adthreat.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
