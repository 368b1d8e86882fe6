// =============================================================================
// Application Configuration — JSON-backed settings with atomic save
// =============================================================================
//
// Every field carries `#[serde(default)]` so that adding new fields never
// breaks loading an older config file. Persistence uses a tmp + rename
// pattern to prevent corruption on crash.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:5001".to_string()
}

fn default_data_api_base() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_narrative_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_charts_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_max_sessions() -> usize {
    256
}

fn default_session_ttl_secs() -> u64 {
    3600
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration for the MarketScope report service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Base URL of the market-data provider (Yahoo Finance chart API).
    #[serde(default = "default_data_api_base")]
    pub data_api_base: String,

    /// Model name passed to the narrative service.
    #[serde(default = "default_narrative_model")]
    pub narrative_model: String,

    /// Directory where rendered HTML reports are persisted.
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Directory where the external chart renderer drops its artifacts,
    /// named `{symbol}_{chart}.png`.
    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,

    /// Maximum number of sessions retained in memory before the oldest are
    /// evicted on insert.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Age after which terminal sessions are swept out of the store.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Bounded timeout applied to every outbound HTTP call.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Merge a synthesized partial bar for today when the historical series
    /// ends before the current date.
    #[serde(default = "default_true")]
    pub include_intraday: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_api_base: default_data_api_base(),
            narrative_model: default_narrative_model(),
            reports_dir: default_reports_dir(),
            charts_dir: default_charts_dir(),
            max_sessions: default_max_sessions(),
            session_ttl_secs: default_session_ttl_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            include_intraday: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(path = %path.display(), bind = %config.bind_addr, "config loaded");
        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content =
            serde_json::to_string_pretty(self).context("failed to serialise config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "config saved (atomic)");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.bind_addr, "0.0.0.0:5001");
        assert_eq!(cfg.max_sessions, 256);
        assert_eq!(cfg.session_ttl_secs, 3600);
        assert_eq!(cfg.http_timeout_secs, 10);
        assert!(cfg.include_intraday);
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:5001");
        assert_eq!(cfg.narrative_model, "gemini-2.5-flash");
        assert!(cfg.include_intraday);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "bind_addr": "127.0.0.1:9000", "max_sessions": 8 }"#;
        let cfg: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.max_sessions, 8);
        assert_eq!(cfg.session_ttl_secs, 3600);
    }

    #[test]
    fn roundtrip_serialisation() {
        let cfg = AppConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.bind_addr, cfg2.bind_addr);
        assert_eq!(cfg.max_sessions, cfg2.max_sessions);
    }
}
