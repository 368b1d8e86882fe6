// =============================================================================
// Central Application State — MarketScope analysis service
// =============================================================================
//
// Shared by the REST layer, the WebSocket handlers, and every background
// analysis worker via `Arc<AppState>`. The session store and progress bus
// manage their own interior mutability; AppState just ties the subsystems
// together.
// =============================================================================

use std::sync::Arc;

use crate::config::AppConfig;
use crate::progress::ProgressBus;
use crate::providers::{GeminiClient, YahooFinanceClient};
use crate::report::ReportSink;
use crate::session::{InMemorySessionStore, SessionStore};

pub struct AppState {
    pub config: AppConfig,

    // ── Run tracking ────────────────────────────────────────────────────
    pub sessions: Arc<dyn SessionStore>,
    pub progress: Arc<ProgressBus>,

    // ── External collaborators ──────────────────────────────────────────
    pub market_data: Arc<YahooFinanceClient>,
    pub narrative: Arc<GeminiClient>,
    pub sink: Arc<ReportSink>,

    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Construct the full service state from configuration. The Gemini key
    /// comes from the environment so it never lands in the config file.
    pub fn new(config: AppConfig, gemini_api_key: Option<String>) -> Self {
        let market_data = Arc::new(YahooFinanceClient::new(
            config.data_api_base.clone(),
            config.include_intraday,
            config.http_timeout_secs,
        ));
        let narrative = Arc::new(GeminiClient::new(
            gemini_api_key,
            config.narrative_model.clone(),
            config.http_timeout_secs,
        ));
        let sink = Arc::new(ReportSink::new(config.reports_dir.clone()));

        Self {
            sessions: InMemorySessionStore::new(config.max_sessions),
            progress: ProgressBus::new(),
            market_data,
            narrative,
            sink,
            config,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
