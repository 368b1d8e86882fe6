// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = mean(close_{t-period+1} ..= close_t)
//
// The report uses SMA-20, SMA-50, and SMA-200; the 200-period average is the
// largest lookback in the whole engine, so short series commonly produce
// `None` here and the trend summary degrades gracefully.

/// Compute the rolling SMA series for the given `closes` and `period`.
///
/// The returned vector has one value per close starting at index
/// `period - 1`; it is empty when `period` is zero or the input is too short.
pub fn sma_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let period_f = period as f64;
    let mut result = Vec::with_capacity(closes.len() - period + 1);

    // Rolling sum; re-derive from scratch on non-finite input to avoid
    // poisoning the accumulator.
    let mut sum: f64 = closes[..period].iter().sum();
    if !sum.is_finite() {
        return Vec::new();
    }
    result.push(sum / period_f);

    for i in period..closes.len() {
        sum += closes[i] - closes[i - period];
        if !sum.is_finite() {
            break;
        }
        result.push(sum / period_f);
    }

    result
}

/// Most recent SMA value, or `None` when the series is too short.
pub fn latest_sma(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let mean = window.iter().sum::<f64>() / period as f64;

    if mean.is_finite() {
        Some(mean)
    } else {
        None
    }
}
