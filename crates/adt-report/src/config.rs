//! Render configuration types.

use serde::{Deserialize, Serialize};

/// CDN library configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdnLibrary {
    /// Pinned version number.
    pub version: String,
    /// Subresource integrity hash (SHA-384).
    pub sri: String,
    /// Path within npm package.
    #[serde(default)]
    pub path: Option<String>,
}

impl CdnLibrary {
    /// Create a new CDN library configuration.
    pub fn new(version: impl Into<String>, sri: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            sri: sri.into(),
            path: None,
        }
    }

    /// Set the path within the npm package.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get the full CDN URL for this library.
    pub fn url(&self, base_url: &str, package_name: &str) -> String {
        let path = self.path.as_deref().unwrap_or("dist/index.min.js");
        format!("{}/{}@{}/{}", base_url, package_name, self.version, path)
    }
}

/// Chart styling for the batch SVG variant.
///
/// The palette matches the original exports: sky-blue event bars, orange
/// user bars, steel-blue date line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartStyle {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Fill color for bars / stroke color for lines.
    pub color: String,
    /// Number of horizontal gridlines on the value axis.
    pub y_ticks: u32,
}

impl ChartStyle {
    /// Sky-blue bar style used for the by-event chart.
    pub fn event_bars() -> Self {
        Self {
            width: 800,
            height: 600,
            color: "#87ceeb".to_string(),
            y_ticks: 5,
        }
    }

    /// Orange bar style used for the by-user chart.
    pub fn user_bars() -> Self {
        Self {
            width: 800,
            height: 600,
            color: "#ffa500".to_string(),
            y_ticks: 5,
        }
    }

    /// Steel-blue line style used for the by-date chart.
    pub fn date_line() -> Self {
        Self {
            width: 1000,
            height: 600,
            color: "#4682b4".to_string(),
            y_ticks: 5,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::event_bars()
    }
}

fn default_cdn_base() -> String {
    "https://cdn.jsdelivr.net/npm".to_string()
}

fn default_echarts() -> CdnLibrary {
    CdnLibrary::new(
        "5.5.0",
        "sha384-FGLEKkFq1MZrC7PkPPA6QPDh8S4tFZ0Dy0y+7yE7+Z9E9e3y7R7r5QlR6v1W7zE3",
    )
    .with_path("dist/echarts.min.js")
}

/// Dashboard page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOptions {
    /// Page title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Subtitle line under the heading.
    #[serde(default = "default_subtitle")]
    pub subtitle: String,

    /// Base URL for CDN resources.
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,

    /// Pinned ECharts library.
    #[serde(default = "default_echarts")]
    pub echarts: CdnLibrary,
}

fn default_title() -> String {
    "Active Directory Threat Dashboard".to_string()
}

fn default_subtitle() -> String {
    "Analyze and visualize critical events in Active Directory logs.".to_string()
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: default_subtitle(),
            cdn_base: default_cdn_base(),
            echarts: default_echarts(),
        }
    }
}

impl DashboardOptions {
    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
