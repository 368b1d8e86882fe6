// =============================================================================
// Signal aggregation — BUY / SELL / HOLD verdict
// =============================================================================
//
// A fixed rule table over the already-computed summaries. Evaluation order
// only affects presentation order of the contributing observations, never
// the vote count. Unavailable fields never fire.
//
// Verdict: majority side wins; a tie with at least one vote is HOLD at 50%
// confidence; no votes at all is HOLD at 0% confidence.

use serde::Serialize;

use super::momentum::MomentumSummary;
use super::trend::TrendSummary;
use super::volume::VolumeSummary;
use super::{RangeSignal, VolumeTrend};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalDirection {
    Bullish,
    Bearish,
}

/// One contributing observation behind the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub direction: SignalDirection,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Buy => write!(f, "BUY"),
            Recommendation::Sell => write!(f, "SELL"),
            Recommendation::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub overall: Recommendation,
    /// Winning-side share of total votes, in [0, 100].
    pub confidence: f64,
    pub bullish: Vec<Signal>,
    pub bearish: Vec<Signal>,
}

pub fn aggregate(
    trend: &TrendSummary,
    momentum: &MomentumSummary,
    volume: &VolumeSummary,
) -> Verdict {
    let mut bullish = Vec::new();
    let mut bearish = Vec::new();

    if trend.golden_cross == Some(true) {
        bullish.push(signal(
            SignalDirection::Bullish,
            "Golden Cross (SMA50 > SMA200)",
        ));
    }
    if trend.price_above_sma200 == Some(true) {
        bullish.push(signal(SignalDirection::Bullish, "Price above SMA200"));
    }
    if trend.macd_bullish == Some(true) {
        bullish.push(signal(SignalDirection::Bullish, "MACD Bullish Crossover"));
    }

    match momentum.rsi_signal {
        Some(RangeSignal::Oversold) => bullish.push(signal(
            SignalDirection::Bullish,
            "RSI Oversold (potential reversal)",
        )),
        Some(RangeSignal::Overbought) => bearish.push(signal(
            SignalDirection::Bearish,
            "RSI Overbought (potential reversal)",
        )),
        _ => {}
    }

    match volume.volume_trend {
        Some(VolumeTrend::Accumulation) => bullish.push(signal(
            SignalDirection::Bullish,
            "Volume showing accumulation",
        )),
        Some(VolumeTrend::Distribution) => bearish.push(signal(
            SignalDirection::Bearish,
            "Volume showing distribution",
        )),
        None => {}
    }

    let bull_count = bullish.len();
    let bear_count = bearish.len();
    let total = bull_count + bear_count;

    let (overall, confidence) = if total == 0 {
        (Recommendation::Hold, 0.0)
    } else if bull_count > bear_count {
        (Recommendation::Buy, bull_count as f64 / total as f64 * 100.0)
    } else if bear_count > bull_count {
        (Recommendation::Sell, bear_count as f64 / total as f64 * 100.0)
    } else {
        (Recommendation::Hold, 50.0)
    };

    Verdict {
        overall,
        confidence,
        bullish,
        bearish,
    }
}

fn signal(direction: SignalDirection, description: &str) -> Signal {
    Signal {
        direction,
        description: description.to_string(),
    }
}
