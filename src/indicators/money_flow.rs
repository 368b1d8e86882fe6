// =============================================================================
// Volume-weighted money flow — Chaikin Money Flow (CMF) & Money Flow Index
// =============================================================================
//
// CMF over `period` bars:
//   MFM = ((C - L) - (H - C)) / (H - L)        (0 when H == L)
//   CMF = Σ(MFM * V) / Σ(V)
// CMF > 0 reads as accumulation, CMF <= 0 as distribution.
//
// MFI over `period` typical-price transitions:
//   TP = (H + L + C) / 3, raw flow = TP * V
//   MFI = 100 - 100 / (1 + positive_flow / negative_flow)
// Thresholds: MFI > 80 overbought, MFI < 20 oversold.

use crate::types::Bar;

/// Chaikin Money Flow over the trailing `period` bars.
///
/// Returns `None` when the history is too short, total volume is zero, or
/// the result is non-finite.
pub fn latest_cmf(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }

    let window = &bars[bars.len() - period..];

    let mut flow_volume = 0.0_f64;
    let mut total_volume = 0.0_f64;

    for bar in window {
        let range = bar.high - bar.low;
        let multiplier = if range == 0.0 {
            0.0
        } else {
            ((bar.close - bar.low) - (bar.high - bar.close)) / range
        };
        flow_volume += multiplier * bar.volume;
        total_volume += bar.volume;
    }

    if total_volume == 0.0 {
        return None;
    }

    let cmf = flow_volume / total_volume;
    cmf.is_finite().then_some(cmf)
}

/// Money Flow Index over the trailing `period` typical-price transitions.
///
/// Returns `None` when fewer than `period + 1` bars are available or the
/// result is non-finite. All-positive flow clamps to 100, all-negative to 0.
pub fn latest_mfi(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let typical: Vec<f64> = bars.iter().map(|b| (b.high + b.low + b.close) / 3.0).collect();

    let window_start = bars.len() - period;
    let mut positive_flow = 0.0_f64;
    let mut negative_flow = 0.0_f64;

    for i in window_start..bars.len() {
        let raw_flow = typical[i] * bars[i].volume;
        if typical[i] > typical[i - 1] {
            positive_flow += raw_flow;
        } else if typical[i] < typical[i - 1] {
            negative_flow += raw_flow;
        }
    }

    let mfi = if positive_flow == 0.0 && negative_flow == 0.0 {
        50.0
    } else if negative_flow == 0.0 {
        100.0
    } else {
        let ratio = positive_flow / negative_flow;
        100.0 - 100.0 / (1.0 + ratio)
    };

    mfi.is_finite().then_some(mfi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(i: u32, high: f64, low: f64, close: f64, volume: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            open: close,
            high,
            low,
            close,
            volume,
        }
    }

    // ---- CMF -------------------------------------------------------------

    #[test]
    fn cmf_insufficient_data() {
        let bars: Vec<Bar> = (0..10).map(|i| bar(i, 105.0, 95.0, 100.0, 1000.0)).collect();
        assert!(latest_cmf(&bars, 20).is_none());
    }

    #[test]
    fn cmf_close_at_high_is_positive() {
        let bars: Vec<Bar> = (0..25).map(|i| bar(i, 105.0, 95.0, 105.0, 1000.0)).collect();
        let cmf = latest_cmf(&bars, 20).unwrap();
        assert!((cmf - 1.0).abs() < 1e-9, "close at high => CMF = 1, got {cmf}");
    }

    #[test]
    fn cmf_close_at_low_is_negative() {
        let bars: Vec<Bar> = (0..25).map(|i| bar(i, 105.0, 95.0, 95.0, 1000.0)).collect();
        let cmf = latest_cmf(&bars, 20).unwrap();
        assert!((cmf + 1.0).abs() < 1e-9, "close at low => CMF = -1, got {cmf}");
    }

    #[test]
    fn cmf_zero_range_bars_contribute_nothing() {
        let mut bars: Vec<Bar> = (0..19).map(|i| bar(i, 105.0, 95.0, 105.0, 1000.0)).collect();
        bars.push(bar(19, 100.0, 100.0, 100.0, 1000.0));
        let cmf = latest_cmf(&bars, 20).unwrap();
        // 19 bars at MFM=1, one at MFM=0 => 19/20.
        assert!((cmf - 0.95).abs() < 1e-9, "got {cmf}");
    }

    #[test]
    fn cmf_zero_volume_is_none() {
        let bars: Vec<Bar> = (0..25).map(|i| bar(i, 105.0, 95.0, 100.0, 0.0)).collect();
        assert!(latest_cmf(&bars, 20).is_none());
    }

    // ---- MFI -------------------------------------------------------------

    #[test]
    fn mfi_insufficient_data() {
        let bars: Vec<Bar> = (0..14).map(|i| bar(i, 105.0, 95.0, 100.0, 1000.0)).collect();
        assert!(latest_mfi(&bars, 14).is_none());
    }

    #[test]
    fn mfi_rising_typical_price_reads_100() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let base = 100.0 + i as f64;
                bar(i, base + 5.0, base - 5.0, base, 1000.0)
            })
            .collect();
        let mfi = latest_mfi(&bars, 14).unwrap();
        assert!((mfi - 100.0).abs() < 1e-9, "got {mfi}");
    }

    #[test]
    fn mfi_falling_typical_price_reads_0() {
        let bars: Vec<Bar> = (0..20)
            .map(|i| {
                let base = 100.0 - i as f64;
                bar(i, base + 5.0, base - 5.0, base, 1000.0)
            })
            .collect();
        let mfi = latest_mfi(&bars, 14).unwrap();
        assert!(mfi.abs() < 1e-9, "got {mfi}");
    }

    #[test]
    fn mfi_flat_market_reads_50() {
        let bars: Vec<Bar> = (0..20).map(|i| bar(i, 105.0, 95.0, 100.0, 1000.0)).collect();
        let mfi = latest_mfi(&bars, 14).unwrap();
        assert!((mfi - 50.0).abs() < 1e-9, "got {mfi}");
    }

    #[test]
    fn mfi_in_range() {
        let bars: Vec<Bar> = (0..60)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.7).sin() * 10.0;
                bar(i, base + 2.0, base - 2.0, base + (i as f64).cos(), 1000.0 + i as f64)
            })
            .collect();
        let mfi = latest_mfi(&bars, 14).unwrap();
        assert!((0.0..=100.0).contains(&mfi), "MFI {mfi} out of range");
    }
}
