// =============================================================================
// Trend summary — moving averages, MACD, ADX
// =============================================================================
//
// Crossover flags feed the signal aggregator:
//   golden_cross        SMA50 > SMA200
//   price_above_sma200  latest close > SMA200
//   macd_bullish        MACD line > signal line
//
// A flag is `None` (and never votes) when either side of its comparison is
// unavailable for the series length.

use serde::Serialize;

use crate::indicators::directional::latest_adx;
use crate::indicators::macd::latest_macd;
use crate::indicators::moving_average::latest_sma;
use crate::types::Series;

use super::TrendStrength;

const ADX_PERIOD: usize = 14;
const ADX_TREND_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrendSummary {
    pub current_price: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_200: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub adx: Option<f64>,
    pub golden_cross: Option<bool>,
    pub price_above_sma200: Option<bool>,
    pub macd_bullish: Option<bool>,
    pub trend_strength: Option<TrendStrength>,
}

pub fn compute(series: &Series) -> TrendSummary {
    let closes = series.closes();
    let current_price = closes.last().copied();

    let sma_20 = latest_sma(&closes, 20);
    let sma_50 = latest_sma(&closes, 50);
    let sma_200 = latest_sma(&closes, 200);

    let macd_result = latest_macd(&closes);
    let adx = latest_adx(series.bars(), ADX_PERIOD);

    let golden_cross = sma_50.zip(sma_200).map(|(fast, slow)| fast > slow);
    let price_above_sma200 = current_price.zip(sma_200).map(|(price, sma)| price > sma);
    let macd_bullish = macd_result.map(|m| m.macd > m.signal);

    let trend_strength = adx.map(|v| {
        if v > ADX_TREND_THRESHOLD {
            TrendStrength::Strong
        } else {
            TrendStrength::Weak
        }
    });

    TrendSummary {
        current_price,
        sma_20,
        sma_50,
        sma_200,
        macd: macd_result.map(|m| m.macd),
        macd_signal: macd_result.map(|m| m.signal),
        macd_histogram: macd_result.map(|m| m.histogram),
        adx,
        golden_cross,
        price_above_sma200,
        macd_bullish,
        trend_strength,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::NaiveDate;

    fn uptrend_series(n: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.5;
                Bar {
                    timestamp: start + chrono::Days::new(i as u64),
                    open: close - 0.2,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect();
        Series::new("TEST", bars)
    }

    #[test]
    fn short_series_leaves_long_lookbacks_unavailable() {
        let summary = compute(&uptrend_series(30));
        assert!(summary.sma_20.is_some());
        assert!(summary.sma_200.is_none());
        assert!(summary.golden_cross.is_none());
        assert!(summary.price_above_sma200.is_none());
    }

    fn flat_base_then_rally(n_flat: usize, n_rally: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = (0..n_flat + n_rally)
            .map(|i| {
                let close = if i < n_flat {
                    100.0
                } else {
                    100.0 + (i - n_flat + 1) as f64
                };
                Bar {
                    timestamp: start + chrono::Days::new(i as u64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect();
        Series::new("TEST", bars)
    }

    #[test]
    fn recent_rally_sets_bullish_flags() {
        // A perfectly linear ramp leaves the MACD line and its signal
        // converged on the same constant, so the comparison is degenerate.
        // A rally off a flat base keeps the signal lagging well below.
        let summary = compute(&flat_base_then_rally(215, 35));
        assert_eq!(summary.golden_cross, Some(true));
        assert_eq!(summary.price_above_sma200, Some(true));
        assert_eq!(summary.macd_bullish, Some(true));
        assert_eq!(summary.trend_strength, Some(TrendStrength::Strong));
    }

    #[test]
    fn empty_series_is_all_unavailable() {
        let summary = compute(&Series::new("TEST", Vec::new()));
        assert!(summary.current_price.is_none());
        assert!(summary.sma_20.is_none());
        assert!(summary.macd.is_none());
        assert!(summary.adx.is_none());
        assert!(summary.trend_strength.is_none());
    }
}
