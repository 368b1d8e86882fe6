// =============================================================================
// Run-level error taxonomy
// =============================================================================
//
// Only failures that terminate an analysis run live here. Insufficient
// history for an individual indicator is NOT an error — those fields carry
// `None` and are excluded from signal voting. Degraded external services
// (charts, narrative) are handled in-line by the pipeline and never surface
// through this type.

use thiserror::Error;

/// Terminal failure of an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider returned zero bars for the requested symbol and range.
    #[error("no market data found for symbol {symbol}")]
    DataUnavailable { symbol: String },

    /// An external provider failed (network, malformed response, missing
    /// credentials).
    #[error("provider error: {0}")]
    Provider(String),

    /// Writing or reading the rendered report failed.
    #[error("report persistence failed: {0}")]
    Persistence(#[from] std::io::Error),
}
