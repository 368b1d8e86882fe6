// =============================================================================
// Volume summary — OBV, CMF, MFI
// =============================================================================
//
// The volume-trend label comes from the CMF sign (> 0 accumulation,
// otherwise distribution) and feeds the signal aggregator. MFI thresholds
// are 80/20, report-only context.

use serde::Serialize;

use crate::indicators::money_flow::{latest_cmf, latest_mfi};
use crate::indicators::obv::latest_obv;
use crate::types::Series;

use super::{RangeSignal, VolumeTrend};

const CMF_PERIOD: usize = 20;
const MFI_PERIOD: usize = 14;
const MFI_OVERBOUGHT: f64 = 80.0;
const MFI_OVERSOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VolumeSummary {
    pub obv: Option<f64>,
    pub cmf: Option<f64>,
    pub mfi: Option<f64>,
    pub volume_trend: Option<VolumeTrend>,
    pub mfi_signal: Option<RangeSignal>,
}

pub fn compute(series: &Series) -> VolumeSummary {
    let closes = series.closes();
    let volumes = series.volumes();

    let obv = latest_obv(&closes, &volumes);
    let cmf = latest_cmf(series.bars(), CMF_PERIOD);
    let mfi = latest_mfi(series.bars(), MFI_PERIOD);

    let volume_trend = cmf.map(|v| {
        if v > 0.0 {
            VolumeTrend::Accumulation
        } else {
            VolumeTrend::Distribution
        }
    });

    let mfi_signal = mfi.map(|v| {
        if v > MFI_OVERBOUGHT {
            RangeSignal::Overbought
        } else if v < MFI_OVERSOLD {
            RangeSignal::Oversold
        } else {
            RangeSignal::Neutral
        }
    });

    VolumeSummary {
        obv,
        cmf,
        mfi,
        volume_trend,
        mfi_signal,
    }
}
