// =============================================================================
// Analysis layer — derived summaries over an OHLCV series
// =============================================================================
//
// Each submodule computes one category of derived values from a `Series`:
//
//   trend       SMAs, MACD, ADX, crossover flags
//   momentum    RSI, stochastic %K/%D, threshold labels
//   volatility  Bollinger Bands, ATR, band position, volatility level
//   volume      OBV, CMF, MFI, accumulation/distribution label
//   levels      Fibonacci retracements + pivot support/resistance
//   forecast    OLS trend projection + ATR price range
//   risk        return/volatility/Sharpe/drawdown statistics
//   signals     BUY/SELL/HOLD verdict from the computed summaries
//
// Every scalar is an Option: `None` means the series was too short (or the
// input degenerate) for that lookback. Unavailable values never contribute
// to the verdict and render as "N/A" in the report.

pub mod forecast;
pub mod levels;
pub mod momentum;
pub mod risk;
pub mod signals;
pub mod trend;
pub mod volatility;
pub mod volume;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::Series;

// ── shared qualitative labels ────────────────────────────────────────────────

/// Overbought/oversold reading for bounded oscillators (RSI, stochastic, MFI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeSignal {
    Overbought,
    Oversold,
    Neutral,
}

impl std::fmt::Display for RangeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeSignal::Overbought => write!(f, "Overbought"),
            RangeSignal::Oversold => write!(f, "Oversold"),
            RangeSignal::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Trend-strength label from ADX (> 25 reads as trending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendStrength {
    Strong,
    Weak,
}

impl std::fmt::Display for TrendStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendStrength::Strong => write!(f, "Strong Trend"),
            TrendStrength::Weak => write!(f, "Weak/No Trend"),
        }
    }
}

/// Where the latest close sits relative to the Bollinger Bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BandPosition {
    Upper,
    Middle,
    Lower,
}

impl std::fmt::Display for BandPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandPosition::Upper => write!(f, "Above Upper Band"),
            BandPosition::Middle => write!(f, "Within Bands"),
            BandPosition::Lower => write!(f, "Below Lower Band"),
        }
    }
}

/// Current Band Width relative to its own series mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolatilityLevel {
    High,
    Low,
}

impl std::fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolatilityLevel::High => write!(f, "High"),
            VolatilityLevel::Low => write!(f, "Low"),
        }
    }
}

/// Money-flow direction from CMF sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VolumeTrend {
    Accumulation,
    Distribution,
}

impl std::fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeTrend::Accumulation => write!(f, "Accumulation"),
            VolumeTrend::Distribution => write!(f, "Distribution"),
        }
    }
}

/// Fitted-trend direction label (zero slope reads as bullish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Bullish,
    Bearish,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Bullish => write!(f, "Bullish"),
            TrendDirection::Bearish => write!(f, "Bearish"),
        }
    }
}

// ── aggregate result ─────────────────────────────────────────────────────────

/// Complete output of one analysis run. Built once, never mutated after.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_close: Option<f64>,
    pub bar_count: usize,
    pub trend: trend::TrendSummary,
    pub momentum: momentum::MomentumSummary,
    pub volatility: volatility::VolatilitySummary,
    pub volume: volume::VolumeSummary,
    pub fibonacci: Option<levels::FibonacciLevels>,
    pub pivots: Option<levels::PivotLevels>,
    pub forecast: forecast::Forecast,
    pub risk: risk::RiskMetrics,
    pub verdict: signals::Verdict,
}

/// Run every analysis category over the series and aggregate the verdict.
///
/// Pure except for allocation: the series is only read. Individual categories
/// degrade to `None` fields on short histories rather than failing the run.
pub fn analyze(series: &Series, start_date: NaiveDate, end_date: NaiveDate) -> AnalysisResult {
    let trend = trend::compute(series);
    let momentum = momentum::compute(series);
    let volatility = volatility::compute(series);
    let volume = volume::compute(series);
    let fibonacci = levels::fibonacci(series);
    let pivots = levels::pivots(series);
    let forecast = forecast::compute(series, volatility.atr);
    let risk = risk::compute(&series.closes());
    let verdict = signals::aggregate(&trend, &momentum, &volume);

    AnalysisResult {
        symbol: series.symbol.clone(),
        start_date,
        end_date,
        last_close: series.last().map(|b| b.close),
        bar_count: series.len(),
        trend,
        momentum,
        volatility,
        volume,
        fibonacci,
        pivots,
        forecast,
        risk,
        verdict,
    }
}
