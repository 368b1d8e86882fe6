// =============================================================================
// Forecast — linear trend projection and ATR price range
// =============================================================================
//
// Closes are regressed against a zero-based day index with ordinary least
// squares; the fitted line is extrapolated five sessions forward. A slope of
// exactly zero reads as Bullish. Expected next-session range is the latest
// close ± ATR.

use serde::Serialize;

use crate::types::Series;

use super::TrendDirection;

const PROJECTION_HORIZON: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub direction: Option<TrendDirection>,
    pub slope: Option<f64>,
    /// Fitted-line values at indices len..len+4, oldest first.
    pub projections: Vec<f64>,
    pub expected_high: Option<f64>,
    pub expected_low: Option<f64>,
}

impl Forecast {
    fn unavailable() -> Self {
        Self {
            direction: None,
            slope: None,
            projections: Vec::new(),
            expected_high: None,
            expected_low: None,
        }
    }
}

/// Fit and project. Needs at least two bars for the regression; the ATR range
/// additionally needs `atr` to be available.
pub fn compute(series: &Series, atr: Option<f64>) -> Forecast {
    let closes = series.closes();
    if closes.len() < 2 {
        return Forecast::unavailable();
    }

    let Some((slope, intercept)) = ols_fit(&closes) else {
        return Forecast::unavailable();
    };

    let direction = if slope >= 0.0 {
        TrendDirection::Bullish
    } else {
        TrendDirection::Bearish
    };

    let projections = (closes.len()..closes.len() + PROJECTION_HORIZON)
        .map(|i| intercept + slope * i as f64)
        .collect();

    let last_close = closes.last().copied();
    let expected_high = last_close.zip(atr).map(|(close, atr)| close + atr);
    let expected_low = last_close.zip(atr).map(|(close, atr)| close - atr);

    Forecast {
        direction: Some(direction),
        slope: Some(slope),
        projections,
        expected_high,
        expected_low,
    }
}

/// OLS over (index, value) pairs. Returns `(slope, intercept)`, or `None`
/// when the fit degenerates (non-finite input).
fn ols_fit(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len() as f64;
    let mean_x = (values.len() - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;

    let mut cov_xy = 0.0;
    let mut var_x = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        cov_xy += dx * (y - mean_y);
        var_x += dx * dx;
    }

    if var_x == 0.0 {
        return None;
    }

    let slope = cov_xy / var_x;
    let intercept = mean_y - slope * mean_x;
    (slope.is_finite() && intercept.is_finite()).then_some((slope, intercept))
}
