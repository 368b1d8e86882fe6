// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. A request is validated synchronously
// and accepted with 202 + a session id; the analysis itself runs on a
// spawned worker and is observed via GET /session/:id, the WebSocket feed,
// and finally GET /report/:id.
//
// CORS is configured permissively for development; tighten `allowed_origins`
// in production.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::pipeline::{self, PipelineContext};
use crate::session::Session;

/// Default analysis window when the request omits dates.
const DEFAULT_LOOKBACK_DAYS: u64 = 365;
/// Cap on symbol-directory search results.
const MAX_SEARCH_RESULTS: usize = 20;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/analyze", post(start_analysis))
        .route("/api/v1/session/:id", get(session_status))
        .route("/api/v1/report/:id", get(report))
        .route("/api/v1/symbols/search", get(symbol_search))
        .route("/api/v1/ws", get(crate::api::ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_sessions: usize,
    timestamp: String,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        uptime_secs: state.uptime_secs(),
        active_sessions: state.sessions.len(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

// =============================================================================
// Analysis submission
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeRequest {
    symbol: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

#[derive(Serialize)]
struct AnalyzeAccepted {
    session_id: String,
    status: &'static str,
}

#[derive(Serialize)]
struct ApiError {
    error: String,
}

fn bad_request(message: impl Into<String>) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

/// POST /api/v1/analyze — validate, register the session, spawn the worker.
async fn start_analysis(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let symbol = request.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return bad_request("symbol is required");
    }

    let end_date = request.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start_date = request
        .start_date
        .unwrap_or_else(|| end_date - chrono::Days::new(DEFAULT_LOOKBACK_DAYS));
    if start_date >= end_date {
        return bad_request("start_date must be before end_date");
    }

    let session_id = Uuid::new_v4().to_string();
    state.sessions.insert(Session::new(
        session_id.clone(),
        symbol.clone(),
        start_date,
        end_date,
    ));
    state.progress.register(&session_id);

    let ctx = PipelineContext {
        sessions: state.sessions.clone(),
        progress: state.progress.clone(),
        sink: state.sink.clone(),
        charts_dir: state.config.charts_dir.clone(),
    };
    let market_data = state.market_data.clone();
    let narrative = state.narrative.clone();

    info!(session_id = %session_id, symbol = %symbol, "analysis accepted");
    tokio::spawn(pipeline::run_analysis(
        ctx,
        market_data,
        narrative,
        session_id.clone(),
        symbol,
        start_date,
        end_date,
    ));

    (
        StatusCode::ACCEPTED,
        Json(AnalyzeAccepted {
            session_id,
            status: "started",
        }),
    )
        .into_response()
}

// =============================================================================
// Session status
// =============================================================================

async fn session_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.sessions.get(&id) {
        Some(session) => Json(session).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("unknown session {id}"),
            }),
        )
            .into_response(),
    }
}

// =============================================================================
// Report retrieval
// =============================================================================

async fn report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Some(session) = state.sessions.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("unknown session {id}"),
            }),
        )
            .into_response();
    };

    if session.report_path.is_none() {
        return bad_request(format!(
            "session {id} has no report (status: {:?})",
            session.status
        ));
    }

    match state.sink.read(&id) {
        Ok(document) => Html(document).into_response(),
        Err(e) => {
            warn!(session_id = %id, error = %e, "report read failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "report could not be read".to_string(),
                }),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Symbol directory search
// =============================================================================

/// A small built-in directory for the UI's symbol autocomplete.
const SYMBOL_DIRECTORY: &[(&str, &str)] = &[
    ("AAPL", "Apple Inc."),
    ("MSFT", "Microsoft Corporation"),
    ("GOOGL", "Alphabet Inc."),
    ("AMZN", "Amazon.com Inc."),
    ("NVDA", "NVIDIA Corporation"),
    ("META", "Meta Platforms Inc."),
    ("TSLA", "Tesla Inc."),
    ("BRK-B", "Berkshire Hathaway Inc."),
    ("JPM", "JPMorgan Chase & Co."),
    ("V", "Visa Inc."),
    ("JNJ", "Johnson & Johnson"),
    ("WMT", "Walmart Inc."),
    ("PG", "Procter & Gamble Co."),
    ("XOM", "Exxon Mobil Corporation"),
    ("UNH", "UnitedHealth Group Inc."),
    ("HD", "The Home Depot Inc."),
    ("KO", "The Coca-Cola Company"),
    ("DIS", "The Walt Disney Company"),
    ("NFLX", "Netflix Inc."),
    ("AMD", "Advanced Micro Devices Inc."),
    ("INTC", "Intel Corporation"),
    ("BA", "The Boeing Company"),
    ("GS", "The Goldman Sachs Group Inc."),
    ("CAT", "Caterpillar Inc."),
    ("SPY", "SPDR S&P 500 ETF Trust"),
    ("QQQ", "Invesco QQQ Trust"),
];

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Serialize)]
struct SymbolMatch {
    symbol: &'static str,
    name: &'static str,
}

async fn symbol_search(Query(query): Query<SearchQuery>) -> impl IntoResponse {
    let needle = query.q.unwrap_or_default().trim().to_uppercase();
    if needle.is_empty() {
        return Json(Vec::<SymbolMatch>::new());
    }

    let matches: Vec<SymbolMatch> = SYMBOL_DIRECTORY
        .iter()
        .filter(|(symbol, name)| {
            symbol.contains(&needle) || name.to_uppercase().contains(&needle)
        })
        .take(MAX_SEARCH_RESULTS)
        .map(|&(symbol, name)| SymbolMatch { symbol, name })
        .collect();

    Json(matches)
}
