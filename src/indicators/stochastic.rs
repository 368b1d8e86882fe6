// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
// %K = 100 * (close - lowest_low(k_period)) / (highest_high - lowest_low)
// %D = SMA(d_period) of %K
//
// Standard parameters: k_period = 14, d_period = 3. A window where the high
// equals the low (no range) yields no %K value for that bar.

use crate::indicators::moving_average::sma_series;
use crate::types::Bar;

/// Latest %K and %D readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StochResult {
    pub k: f64,
    pub d: f64,
}

/// Compute the %K series over `bars` with the given lookback.
///
/// Valid windows only: a zero-range window or one containing a non-finite
/// field yields no %K value for that bar, and later windows are unaffected.
pub fn percent_k_series(bars: &[Bar], k_period: usize) -> Vec<f64> {
    if k_period == 0 || bars.len() < k_period {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(bars.len() - k_period + 1);

    for window in bars.windows(k_period) {
        // f64::max/min would swallow a NaN high or low, so check the fields
        // before taking the extrema.
        let finite = window
            .iter()
            .all(|b| b.high.is_finite() && b.low.is_finite() && b.close.is_finite());
        if !finite {
            continue;
        }

        let highest = window.iter().map(|b| b.high).fold(f64::MIN, f64::max);
        let lowest = window.iter().map(|b| b.low).fold(f64::MAX, f64::min);
        let close = window[k_period - 1].close;

        let range = highest - lowest;
        if range == 0.0 {
            continue;
        }

        result.push(100.0 * (close - lowest) / range);
    }

    result
}

/// Most recent %K / %D pair with the standard 14/3 parameters.
///
/// Returns `None` when there is not enough history for both lines.
pub fn latest_stochastic(bars: &[Bar], k_period: usize, d_period: usize) -> Option<StochResult> {
    let k_values = percent_k_series(bars, k_period);
    let d_values = sma_series(&k_values, d_period);

    let k = *k_values.last()?;
    let d = *d_values.last()?;

    Some(StochResult { k, d })
}
