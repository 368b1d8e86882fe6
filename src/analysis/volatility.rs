// =============================================================================
// Volatility summary — Bollinger Bands and ATR
// =============================================================================
//
// Band position compares the latest close to the current band edges. The
// volatility level compares the latest Band Width to the mean width over the
// whole series, so a quiet stretch in a historically noisy name reads Low.

use serde::Serialize;

use crate::indicators::atr::latest_atr;
use crate::indicators::bollinger::{latest_bollinger, width_series};
use crate::types::Series;

use super::{BandPosition, VolatilityLevel};

const BB_PERIOD: usize = 20;
const BB_NUM_STD: f64 = 2.0;
const ATR_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolatilitySummary {
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_width: Option<f64>,
    pub atr: Option<f64>,
    pub bb_position: Option<BandPosition>,
    pub volatility_level: Option<VolatilityLevel>,
}

pub fn compute(series: &Series) -> VolatilitySummary {
    let closes = series.closes();

    let bands = latest_bollinger(&closes, BB_PERIOD, BB_NUM_STD);
    let atr = latest_atr(series.bars(), ATR_PERIOD);

    let bb_position = bands.zip(closes.last().copied()).map(|(b, price)| {
        if price > b.upper {
            BandPosition::Upper
        } else if price < b.lower {
            BandPosition::Lower
        } else {
            BandPosition::Middle
        }
    });

    let volatility_level = bands.and_then(|b| {
        let widths = width_series(&closes, BB_PERIOD, BB_NUM_STD);
        if widths.is_empty() {
            return None;
        }
        let mean_width = widths.iter().sum::<f64>() / widths.len() as f64;
        Some(if b.width > mean_width {
            VolatilityLevel::High
        } else {
            VolatilityLevel::Low
        })
    });

    VolatilitySummary {
        bb_upper: bands.map(|b| b.upper),
        bb_middle: bands.map(|b| b.middle),
        bb_lower: bands.map(|b| b.lower),
        bb_width: bands.map(|b| b.width),
        atr,
        bb_position,
        volatility_level,
    }
}
