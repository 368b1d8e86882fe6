// =============================================================================
// Average Directional Index (ADX) — directional movement
// =============================================================================
//
// ADX quantifies trend strength regardless of direction:
//
//   1. +DM / -DM and True Range per bar-to-bar transition.
//   2. Wilder's smoothing of +DM, -DM, TR over `period`.
//   3. +DI = smoothed(+DM) / smoothed(TR) * 100, likewise -DI.
//   4. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   5. ADX = Wilder-smoothed average of DX over `period`.
//
// ADX > 25 reads as a trending market in the report's trend-strength label.

use crate::types::Bar;

/// Compute the most recent ADX value over `bars` with the given `period`.
///
/// Returns `None` when the period is zero, fewer than `2 * period + 1` bars
/// are available (one smoothing pass plus `period` DX values to seed the
/// average), or any intermediate value is non-finite.
pub fn latest_adx(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < 2 * period + 1 {
        return None;
    }

    let period_f = period as f64;
    let transitions = bars.len() - 1;

    let mut plus_dm = Vec::with_capacity(transitions);
    let mut minus_dm = Vec::with_capacity(transitions);
    let mut true_range = Vec::with_capacity(transitions);

    for pair in bars.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);

        let tr = (curr.high - curr.low)
            .max((curr.high - prev.close).abs())
            .max((curr.low - prev.close).abs());

        let up_move = curr.high - prev.high;
        let down_move = prev.low - curr.low;

        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
        true_range.push(tr);
    }

    // Initial Wilder sums over the first `period` transitions.
    let mut smooth_plus: f64 = plus_dm[..period].iter().sum();
    let mut smooth_minus: f64 = minus_dm[..period].iter().sum();
    let mut smooth_tr: f64 = true_range[..period].iter().sum();

    let mut dx_values = Vec::with_capacity(transitions - period + 1);
    dx_values.push(directional_index(smooth_plus, smooth_minus, smooth_tr)?);

    for i in period..transitions {
        smooth_plus = smooth_plus - smooth_plus / period_f + plus_dm[i];
        smooth_minus = smooth_minus - smooth_minus / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + true_range[i];

        dx_values.push(directional_index(smooth_plus, smooth_minus, smooth_tr)?);
    }

    if dx_values.len() < period {
        return None;
    }

    let mut adx = dx_values[..period].iter().sum::<f64>() / period_f;
    for &dx in &dx_values[period..] {
        adx = (adx * (period_f - 1.0) + dx) / period_f;
    }

    adx.is_finite().then_some(adx)
}

/// DX from smoothed directional movement and true range.
///
/// Zero smoothed TR means a degenerate market; zero DI sum means no
/// directional movement at all and reads as 0.
fn directional_index(smooth_plus: f64, smooth_minus: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = smooth_plus / smooth_tr * 100.0;
    let minus_di = smooth_minus / smooth_tr * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return Some(0.0);
    }

    let dx = (plus_di - minus_di).abs() / di_sum * 100.0;
    dx.is_finite().then_some(dx)
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
            volume: 1.0,
        }
    }

    #[test]
    fn adx_period_zero() {
        let bars: Vec<Bar> = (0..50).map(|i| bar(i, 1.0, 2.0, 0.5, 1.5)).collect();
        assert!(latest_adx(&bars, 0).is_none());
    }

    #[test]
    fn adx_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 1.0, 2.0, 0.5, 1.5)).collect();
        assert!(latest_adx(&bars, 14).is_none());
    }

    #[test]
    fn adx_strong_uptrend_reads_high() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                bar(i, base, base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();
        let adx = latest_adx(&bars, 14).unwrap();
        assert!(adx > 25.0, "expected ADX > 25 for strong trend, got {adx}");
    }

    #[test]
    fn adx_flat_market_reads_near_zero() {
        let bars: Vec<Bar> = (0..60).map(|i| bar(i, 100.0, 101.0, 99.0, 100.0)).collect();
        let adx = latest_adx(&bars, 14).unwrap();
        assert!(adx < 1.0, "expected ADX near 0 for flat market, got {adx}");
    }

    #[test]
    fn adx_in_range() {
        let bars: Vec<Bar> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                bar(i, base - 0.5, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        if let Some(adx) = latest_adx(&bars, 14) {
            assert!((0.0..=100.0).contains(&adx), "ADX {adx} out of range");
        }
    }

    #[test]
    fn adx_minimum_bars_exact() {
        let period = 5;
        let min = 2 * period + 1;
        let bars: Vec<Bar> = (0..min as u32)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(i, base, base + 1.0, base - 0.5, base + 0.5)
            })
            .collect();
        assert!(latest_adx(&bars, period).is_some());
        assert!(latest_adx(&bars[..min - 1], period).is_none());
    }
}
