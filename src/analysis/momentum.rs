// =============================================================================
// Momentum summary — RSI and stochastic oscillator
// =============================================================================
//
// Thresholds:
//   RSI         > 70 overbought, < 30 oversold
//   Stochastic  > 80 overbought, < 20 oversold  (on %K)
//
// The RSI label feeds the signal aggregator; the stochastic label is
// report-only context.

use serde::Serialize;

use crate::indicators::rsi::latest_rsi;
use crate::indicators::stochastic::latest_stochastic;
use crate::types::Series;

use super::RangeSignal;

const RSI_PERIOD: usize = 14;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

const STOCH_K_PERIOD: usize = 14;
const STOCH_D_PERIOD: usize = 3;
const STOCH_OVERBOUGHT: f64 = 80.0;
const STOCH_OVERSOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MomentumSummary {
    pub rsi: Option<f64>,
    pub rsi_signal: Option<RangeSignal>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub stoch_signal: Option<RangeSignal>,
}

pub fn compute(series: &Series) -> MomentumSummary {
    let closes = series.closes();

    let rsi = latest_rsi(&closes, RSI_PERIOD);
    let rsi_signal = rsi.map(|v| classify(v, RSI_OVERBOUGHT, RSI_OVERSOLD));

    let stoch = latest_stochastic(series.bars(), STOCH_K_PERIOD, STOCH_D_PERIOD);
    let stoch_signal = stoch.map(|s| classify(s.k, STOCH_OVERBOUGHT, STOCH_OVERSOLD));

    MomentumSummary {
        rsi,
        rsi_signal,
        stoch_k: stoch.map(|s| s.k),
        stoch_d: stoch.map(|s| s.d),
        stoch_signal,
    }
}

fn classify(value: f64, overbought: f64, oversold: f64) -> RangeSignal {
    if value > overbought {
        RangeSignal::Overbought
    } else if value < oversold {
        RangeSignal::Oversold
    } else {
        RangeSignal::Neutral
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

    fn series_from_closes(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + chrono::Days::new(i as u64),
                open: close,
                high: close + 2.0,
                low: close - 2.0,
                close,
                volume: 1_000.0,
            })
            .collect();
        Series::new("TEST", bars)
    }

    #[test]
    fn straight_rally_reads_overbought() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 2.0).collect();
        let summary = compute(&series_from_closes(&closes));
        assert_eq!(summary.rsi_signal, Some(RangeSignal::Overbought));
        assert_eq!(summary.stoch_signal, Some(RangeSignal::Overbought));
    }

    #[test]
    fn straight_selloff_reads_oversold() {
        let closes: Vec<f64> = (0..40).map(|i| 200.0 - i as f64 * 2.0).collect();
        let summary = compute(&series_from_closes(&closes));
        assert_eq!(summary.rsi_signal, Some(RangeSignal::Oversold));
        assert_eq!(summary.stoch_signal, Some(RangeSignal::Oversold));
    }

    #[test]
    fn flat_market_reads_neutral() {
        let closes = vec![100.0; 40];
        let summary = compute(&series_from_closes(&closes));
        assert_eq!(summary.rsi_signal, Some(RangeSignal::Neutral));
    }

    #[test]
    fn short_series_is_unavailable() {
        let closes = vec![100.0, 101.0, 102.0];
        let summary = compute(&series_from_closes(&closes));
        assert!(summary.rsi.is_none());
        assert!(summary.rsi_signal.is_none());
        assert!(summary.stoch_k.is_none());
    }
}
