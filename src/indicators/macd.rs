// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
// MACD line   = EMA_12(close) - EMA_26(close)
// Signal line = EMA_9(MACD line)
// Histogram   = MACD line - signal line
//
// The MACD line exists from index 25 of the input onward (both EMAs must be
// seeded); the signal line needs a further 9 MACD values, so the full result
// requires at least 34 closes.

use crate::indicators::ema::ema_series;

/// Fast EMA period for the MACD line.
const FAST_PERIOD: usize = 12;
/// Slow EMA period for the MACD line.
const SLOW_PERIOD: usize = 26;
/// Signal-line smoothing period.
const SIGNAL_PERIOD: usize = 9;

/// Latest MACD values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdResult {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute the full MACD-line series (one value per close from index
/// `SLOW_PERIOD - 1` onward). Empty when the input is too short.
pub fn macd_line_series(closes: &[f64]) -> Vec<f64> {
    let fast = ema_series(closes, FAST_PERIOD);
    let slow = ema_series(closes, SLOW_PERIOD);
    if slow.is_empty() {
        return Vec::new();
    }

    // Both series end at the last close; align their tails.
    let overlap = fast.len().min(slow.len());
    let fast_tail = &fast[fast.len() - overlap..];
    let slow_tail = &slow[slow.len() - overlap..];

    fast_tail
        .iter()
        .zip(slow_tail.iter())
        .map(|(f, s)| f - s)
        .collect()
}

/// Most recent MACD line, signal line, and histogram.
///
/// Returns `None` when fewer than `SLOW_PERIOD + SIGNAL_PERIOD - 1` closes
/// are available or any value is non-finite.
pub fn latest_macd(closes: &[f64]) -> Option<MacdResult> {
    let macd_line = macd_line_series(closes);
    let signal_series = ema_series(&macd_line, SIGNAL_PERIOD);

    let macd = *macd_line.last()?;
    let signal = *signal_series.last()?;
    let histogram = macd - signal;

    if macd.is_finite() && signal.is_finite() {
        Some(MacdResult {
            macd,
            signal,
            histogram,
        })
    } else {
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macd_empty_input() {
        assert!(latest_macd(&[]).is_none());
    }

    #[test]
    fn macd_insufficient_data() {
        // 33 closes: MACD line has 8 values, not enough for the 9-period signal.
        let closes: Vec<f64> = (1..=33).map(|x| x as f64).collect();
        assert!(latest_macd(&closes).is_none());
    }

    #[test]
    fn macd_minimum_data() {
        // 34 closes is the exact minimum for a full result.
        let closes: Vec<f64> = (1..=34).map(|x| x as f64).collect();
        assert!(latest_macd(&closes).is_some());
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // Fast EMA sits above slow EMA when prices rise steadily.
        let closes: Vec<f64> = (1..=120).map(|x| x as f64).collect();
        let result = latest_macd(&closes).unwrap();
        assert!(result.macd > 0.0, "MACD should be positive, got {}", result.macd);
    }

    #[test]
    fn macd_negative_in_downtrend() {
        let closes: Vec<f64> = (1..=120).rev().map(|x| x as f64).collect();
        let result = latest_macd(&closes).unwrap();
        assert!(result.macd < 0.0, "MACD should be negative, got {}", result.macd);
    }

    #[test]
    fn macd_zero_on_flat_series() {
        let closes = vec![100.0; 120];
        let result = latest_macd(&closes).unwrap();
        assert!(result.macd.abs() < 1e-10);
        assert!(result.signal.abs() < 1e-10);
        assert!(result.histogram.abs() < 1e-10);
    }

    #[test]
    fn histogram_is_macd_minus_signal() {
        let closes: Vec<f64> = (0..200)
            .map(|i| 100.0 + (i as f64 * 0.2).sin() * 5.0)
            .collect();
        let result = latest_macd(&closes).unwrap();
        assert!((result.histogram - (result.macd - result.signal)).abs() < 1e-12);
    }
}
