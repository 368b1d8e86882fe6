// =============================================================================
// Analysis pipeline — one background worker per accepted request
// =============================================================================
//
// Stages run strictly sequentially; each consumes the previous stage's
// output. Progress percentages are absolute and monotonically non-decreasing
// within a run. Degraded collaborators (charts, narrative) never fail the
// run; only a missing series or a persistence failure is terminal.
//
// The worker owns its session key: the terminal session-store update and the
// terminal progress event are always published, success or failure, and a
// worker failure never propagates beyond its own task.
// =============================================================================

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::analysis::{self, AnalysisResult};
use crate::error::AnalysisError;
use crate::progress::{ProgressBus, ProgressEvent};
use crate::providers::narrative::build_briefing_prompt;
use crate::providers::{NarrativeProvider, SeriesProvider};
use crate::report::{html, ChartSet, ReportSink};
use crate::session::SessionStore;

pub struct PipelineContext {
    pub sessions: Arc<dyn SessionStore>,
    pub progress: Arc<ProgressBus>,
    pub sink: Arc<ReportSink>,
    pub charts_dir: PathBuf,
}

/// Execute one analysis run end to end and record its terminal state.
pub async fn run_analysis<S, N>(
    ctx: PipelineContext,
    market_data: Arc<S>,
    narrative: Arc<N>,
    session_id: String,
    symbol: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
) where
    S: SeriesProvider,
    N: NarrativeProvider,
{
    let outcome = execute(
        &ctx,
        market_data.as_ref(),
        narrative.as_ref(),
        &session_id,
        &symbol,
        start_date,
        end_date,
    )
    .await;

    match outcome {
        Ok(report_path) => {
            ctx.sessions
                .complete(&session_id, report_path.display().to_string());
            ctx.progress.update(&session_id, 100, "Analysis complete", Some("Ready to view"));
            ctx.progress.publish(
                &session_id,
                ProgressEvent::Completed {
                    report_id: session_id.clone(),
                },
            );
            info!(session_id = %session_id, symbol = %symbol, "analysis run completed");
        }
        Err(e) => {
            let message = e.to_string();
            ctx.sessions.fail(&session_id, message.clone());
            ctx.progress
                .publish(&session_id, ProgressEvent::Error { error: message });
            error!(session_id = %session_id, symbol = %symbol, error = %e, "analysis run failed");
        }
    }
}

async fn execute<S, N>(
    ctx: &PipelineContext,
    market_data: &S,
    narrative: &N,
    session_id: &str,
    symbol: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<PathBuf, AnalysisError>
where
    S: SeriesProvider,
    N: NarrativeProvider,
{
    let progress = |pct: u8, status: &str, step: &str| {
        ctx.progress.update(session_id, pct, status, Some(step));
    };

    progress(5, "Initializing analyzer", "Setting up analysis run");

    progress(15, "Fetching market data", symbol);
    let series = market_data.fetch(symbol, start_date, end_date).await?;

    // The computation stages are CPU-cheap relative to the I/O around them,
    // but each gets its own progress tick so the client sees movement.
    progress(30, "Calculating trend indicators", "SMA, EMA, MACD, ADX");
    progress(40, "Calculating momentum indicators", "RSI, Stochastic");
    progress(50, "Calculating volatility indicators", "Bollinger Bands, ATR");
    progress(60, "Calculating volume indicators", "OBV, CMF, MFI");
    progress(70, "Calculating Fibonacci levels", "Retracement levels");
    progress(75, "Calculating support/resistance", "Pivot points");
    progress(80, "Generating predictions", "Price forecasting");
    progress(85, "Calculating risk metrics", "Sharpe ratio, drawdown");
    progress(90, "Generating trading signals", "Buy/Sell/Hold verdict");
    let result: AnalysisResult = analysis::analyze(&series, start_date, end_date);

    progress(92, "Collecting charts", "Embedding chart artifacts");
    let charts = ChartSet::discover(&ctx.charts_dir, symbol);
    if charts.is_empty() {
        warn!(session_id, symbol, "no chart artifacts found, report renders without charts");
    }

    progress(95, "Generating AI insights", "Consulting narrative service");
    let insights = match narrative.generate(&build_briefing_prompt(&result)).await {
        Ok(text) => text,
        Err(e) => {
            // Degraded mode: the report carries the error text instead.
            warn!(session_id, error = %e, "narrative generation failed, continuing degraded");
            format!("*AI insights unavailable: {e}*")
        }
    };

    progress(98, "Generating report", "Rendering HTML document");
    let document = html::render(&result, &charts, Some(&insights));
    ctx.sink.write(session_id, &document)
}
