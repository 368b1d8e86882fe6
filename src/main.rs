// =============================================================================
// MarketScope — technical-analysis report service
// =============================================================================
//
// Boot sequence:
//   1. Load .env and initialise tracing.
//   2. Load marketscope.json (falling back to defaults) and apply env
//      overrides.
//   3. Create the reports/charts directories.
//   4. Spawn the session age sweeper.
//   5. Serve the REST + WebSocket API until ctrl-c.
// =============================================================================

mod analysis;
mod api;
mod app_state;
mod config;
mod error;
mod indicators;
mod pipeline;
mod progress;
mod providers;
mod report;
mod session;
mod types;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::AppConfig;

const CONFIG_PATH: &str = "marketscope.json";

/// How often the sweeper checks for stale terminal sessions.
const SWEEP_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Configuration ───────────────────────────────────────────────────
    let mut config = match AppConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "config file not loaded, writing defaults");
            let config = AppConfig::default();
            if let Err(e) = config.save(CONFIG_PATH) {
                warn!(error = %e, "default config could not be written");
            }
            config
        }
    };
    if let Ok(addr) = std::env::var("MARKETSCOPE_BIND_ADDR") {
        config.bind_addr = addr;
    }
    let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
    if gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, reports render without AI insights");
    }

    std::fs::create_dir_all(&config.reports_dir)
        .with_context(|| format!("creating reports dir {}", config.reports_dir.display()))?;
    std::fs::create_dir_all(&config.charts_dir)
        .with_context(|| format!("creating charts dir {}", config.charts_dir.display()))?;

    let bind_addr = config.bind_addr.clone();
    let session_ttl_secs = config.session_ttl_secs;
    let state = Arc::new(AppState::new(config, gemini_api_key));

    // ── Session age sweeper ─────────────────────────────────────────────
    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                let removed = state.sessions.evict_older_than(session_ttl_secs);
                if removed > 0 {
                    info!(removed, "stale sessions evicted");
                }
            }
        });
    }

    // ── Serve ───────────────────────────────────────────────────────────
    let router = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!(addr = %bind_addr, "MarketScope listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("server error")?;

    Ok(())
}
