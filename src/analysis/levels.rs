// =============================================================================
// Price levels — Fibonacci retracements and pivot points
// =============================================================================
//
// Fibonacci levels use the whole series' high/low extrema; pivot levels use
// only the most recent bar. The asymmetry is deliberate: retracements frame
// the full move under analysis while pivots are a next-session construct.

use serde::Serialize;

use crate::types::{Bar, Series};

/// Standard retracement ratios, shallow to deep. Price at ratio r is
/// `high - r * (high - low)`, so 0.0 maps to the swing high and 1.0 to the
/// swing low.
const FIB_RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FibonacciLevels {
    pub swing_high: f64,
    pub swing_low: f64,
    pub levels: Vec<FibLevel>,
    /// The level nearest to the latest close, shown as the active retracement.
    pub closest: Option<FibLevel>,
}

/// Retracement levels over the whole series' high/low range.
///
/// Returns `None` on an empty series or non-finite extrema. A flat series
/// (high == low) still produces levels; they all collapse to the same price.
pub fn fibonacci(series: &Series) -> Option<FibonacciLevels> {
    if series.is_empty() {
        return None;
    }

    let bars = series.bars();
    // The fold below would swallow a NaN high/low (f64::max keeps the
    // non-NaN operand), so reject non-finite fields first.
    if bars.iter().any(|b| !b.high.is_finite() || !b.low.is_finite()) {
        return None;
    }
    let swing_high = bars.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let swing_low = bars.iter().map(|b| b.low).fold(f64::MAX, f64::min);

    let diff = swing_high - swing_low;
    let levels: Vec<FibLevel> = FIB_RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: swing_high - ratio * diff,
        })
        .collect();

    let closest = series.last().map(|last| {
        let mut best = levels[0];
        for level in &levels[1..] {
            if (level.price - last.close).abs() < (best.price - last.close).abs() {
                best = *level;
            }
        }
        best
    });

    Some(FibonacciLevels {
        swing_high,
        swing_low,
        levels,
        closest,
    })
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PivotLevels {
    pub pivot: f64,
    pub resistance_1: f64,
    pub resistance_2: f64,
    pub support_1: f64,
    pub support_2: f64,
}

/// Classic floor-trader pivots from the latest bar only.
pub fn pivots(series: &Series) -> Option<PivotLevels> {
    series.last().map(pivots_from_bar)
}

fn pivots_from_bar(bar: &Bar) -> PivotLevels {
    let pivot = (bar.high + bar.low + bar.close) / 3.0;
    let range = bar.high - bar.low;
    PivotLevels {
        pivot,
        resistance_1: 2.0 * pivot - bar.low,
        resistance_2: pivot + range,
        support_1: 2.0 * pivot - bar.high,
        support_2: pivot - range,
    }
}
