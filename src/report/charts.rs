// =============================================================================
// Chart artifacts — discovery and data-URI embedding
// =============================================================================
//
// The chart renderer drops a fixed set of PNGs named after the symbol into
// the charts directory. Each artifact is optional: a missing or unreadable
// file is simply omitted from the report. Found images are base64-encoded
// and inlined as data URIs so the report is a single self-contained file.
// =============================================================================

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::debug;

/// Data-URI payloads for the report's chart sections, in page order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartSet {
    pub main: Option<String>,
    pub advanced: Option<String>,
    pub fibonacci: Option<String>,
    pub heatmap: Option<String>,
}

impl ChartSet {
    /// Look for the symbol's chart artifacts under `charts_dir`.
    pub fn discover(charts_dir: &Path, symbol: &str) -> Self {
        Self {
            main: load_data_uri(charts_dir, symbol, "technical_analysis"),
            advanced: load_data_uri(charts_dir, symbol, "advanced_indicators"),
            fibonacci: load_data_uri(charts_dir, symbol, "fibonacci_sr"),
            heatmap: load_data_uri(charts_dir, symbol, "correlation_heatmap"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_none()
            && self.advanced.is_none()
            && self.fibonacci.is_none()
            && self.heatmap.is_none()
    }
}

fn load_data_uri(charts_dir: &Path, symbol: &str, suffix: &str) -> Option<String> {
    let path = charts_dir.join(format!("{symbol}_{suffix}.png"));
    match std::fs::read(&path) {
        Ok(bytes) => Some(format!(
            "data:image/png;base64,{}",
            STANDARD.encode(&bytes)
        )),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "chart artifact not embedded");
            None
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_yields_empty_set() {
        let set = ChartSet::discover(Path::new("/nonexistent/charts"), "AAPL");
        assert!(set.is_empty());
    }

    #[test]
    fn found_artifact_becomes_data_uri() {
        let dir = std::env::temp_dir().join(format!("marketscope-charts-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("TEST_technical_analysis.png"), b"not-a-real-png").unwrap();

        let set = ChartSet::discover(&dir, "TEST");
        let uri = set.main.unwrap();
        assert!(uri.starts_with("data:image/png;base64,"));
        assert!(set.advanced.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}
