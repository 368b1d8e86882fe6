// =============================================================================
// Average True Range (ATR) — Wilder's Smoothing
// =============================================================================
//
// True Range per bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR_0 = SMA of the first `period` TR values
// ATR_t = (ATR_{t-1} * (period - 1) + TR_t) / period
//
// The forecast module turns the latest ATR into an expected next-day price
// range (close ± ATR).

use crate::types::Bar;

/// Compute the most recent ATR over `bars` with the given `period`.
///
/// Returns `None` when the period is zero, fewer than `period + 1` bars are
/// available (each TR needs a predecessor), or a non-finite value appears.
pub fn latest_atr(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let mut true_ranges = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        // f64::max returns the non-NaN operand, so a NaN field would leak
        // through the max chain as a finite (wrong) TR. Reject it up front.
        if !curr.high.is_finite() || !curr.low.is_finite() || !prev.close.is_finite() {
            return None;
        }
        let tr = (curr.high - curr.low)
            .max((curr.high - prev.close).abs())
            .max((curr.low - prev.close).abs());
        true_ranges.push(tr);
    }

    let period_f = period as f64;
    let mut atr = true_ranges[..period].iter().sum::<f64>() / period_f;
    if !atr.is_finite() {
        return None;
    }

    for &tr in &true_ranges[period..] {
        atr = (atr * (period_f - 1.0) + tr) / period_f;
        if !atr.is_finite() {
            return None;
        }
    }

    Some(atr)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            open,
            high,
            low,
            close,
            volume: 100.0,
        }
    }

    #[test]
    fn atr_period_zero() {
        let bars: Vec<Bar> = (0..20).map(|i| bar(i, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(latest_atr(&bars, 0).is_none());
    }

    #[test]
    fn atr_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 100.0, 105.0, 95.0, 102.0)).collect();
        assert!(latest_atr(&bars, 14).is_none());
    }

    #[test]
    fn atr_constant_range_converges() {
        // Constant H-L = 10 with closes at the midpoint => ATR near 10.
        let bars: Vec<Bar> = (0..30)
            .map(|i| {
                let base = 100.0 + i as f64 * 0.1;
                bar(i, base, base + 5.0, base - 5.0, base)
            })
            .collect();
        let atr = latest_atr(&bars, 14).unwrap();
        assert!((atr - 10.0).abs() < 1.0, "expected ATR near 10, got {atr}");
    }

    #[test]
    fn atr_gap_uses_prev_close() {
        // Gap up: |H - prevClose| dominates the plain H-L range.
        let bars = vec![
            bar(0, 100.0, 105.0, 95.0, 95.0),
            bar(1, 110.0, 115.0, 108.0, 112.0),
            bar(2, 112.0, 118.0, 110.0, 115.0),
            bar(3, 115.0, 120.0, 113.0, 118.0),
        ];
        let atr = latest_atr(&bars, 3).unwrap();
        assert!(atr > 7.0, "ATR should reflect the gap, got {atr}");
    }

    #[test]
    fn atr_is_positive() {
        let bars: Vec<Bar> = (0..50)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.5).sin() * 10.0;
                bar(i, base - 0.5, base + 2.0, base - 2.0, base + 0.5)
            })
            .collect();
        assert!(latest_atr(&bars, 14).unwrap() > 0.0);
    }

    #[test]
    fn atr_nan_returns_none() {
        let bars = vec![
            bar(0, 100.0, 105.0, 95.0, 100.0),
            bar(1, 100.0, f64::NAN, 95.0, 100.0),
            bar(2, 100.0, 105.0, 95.0, 100.0),
            bar(3, 100.0, 105.0, 95.0, 100.0),
        ];
        assert!(latest_atr(&bars, 3).is_none());
    }

    #[test]
    fn atr_nan_close_returns_none() {
        // A NaN close poisons the next bar's true range.
        let bars = vec![
            bar(0, 100.0, 105.0, 95.0, 100.0),
            bar(1, 100.0, 105.0, 95.0, f64::NAN),
            bar(2, 100.0, 105.0, 95.0, 100.0),
            bar(3, 100.0, 105.0, 95.0, 100.0),
        ];
        assert!(latest_atr(&bars, 3).is_none());
    }
}
