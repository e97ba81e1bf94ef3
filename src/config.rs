use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "Gridline";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Records per insert batch when loading into the record store.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Base URL of the AI field-extraction service.
pub const DEFAULT_AI_BASE_URL: &str = "http://localhost:3000";

/// AI extraction is slow; allow a full minute per artifact.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "gridline=info"
}

/// Get the application data directory
/// ~/Gridline/ on all platforms, falling back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite record store location.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("records.db")
}

// ═══════════════════════════════════════════════════════════
// Runtime settings
// ═══════════════════════════════════════════════════════════

/// Runtime settings for a pipeline run.
///
/// Every value has a default; `from_env` overlays `GRIDLINE_*` variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub batch_size: usize,
    pub ai_base_url: String,
    pub ai_timeout_secs: u64,
    pub database_path: PathBuf,
    pub table_rules: TableRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            ai_base_url: DEFAULT_AI_BASE_URL.to_string(),
            ai_timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
            database_path: default_database_path(),
            table_rules: TableRules::default(),
        }
    }
}

impl Settings {
    /// Defaults overlaid with `GRIDLINE_*` environment variables.
    ///
    /// Unparseable numeric overrides are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup("GRIDLINE_BATCH_SIZE") {
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => self.batch_size = size,
                _ => tracing::warn!(value = %raw, "Ignoring invalid GRIDLINE_BATCH_SIZE"),
            }
        }
        if let Some(url) = lookup("GRIDLINE_AI_BASE_URL") {
            if !url.trim().is_empty() {
                self.ai_base_url = url.trim().to_string();
            }
        }
        if let Some(raw) = lookup("GRIDLINE_AI_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.ai_timeout_secs = secs,
                _ => tracing::warn!(value = %raw, "Ignoring invalid GRIDLINE_AI_TIMEOUT_SECS"),
            }
        }
        if let Some(path) = lookup("GRIDLINE_DATABASE_PATH") {
            if !path.trim().is_empty() {
                self.database_path = PathBuf::from(path.trim());
            }
        }
        self
    }
}

/// Heuristics used by the table pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Leading rows scanned when looking for a header row.
    pub header_scan_rows: usize,
    /// A header matches a field only when its similarity is strictly above this.
    pub match_threshold: f64,
    /// Minimum fraction of schema fields a row must populate to be kept.
    pub coverage_ratio: f64,
    /// OCR artifact that does not count as header content.
    pub apostrophe_artifact: String,
    /// Record keys starting with this character are internal and never stored.
    pub private_key_prefix: char,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            header_scan_rows: 5,
            match_threshold: 0.5,
            coverage_ratio: 0.5,
            apostrophe_artifact: "'".to_string(),
            private_key_prefix: '_',
        }
    }
}

impl TableRules {
    /// Populated keys needed for a row to be kept: `ceil(ratio × field_count)`.
    pub fn min_populated(&self, field_count: usize) -> usize {
        (self.coverage_ratio * field_count as f64).ceil() as usize
    }
}
