// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = SMA(period), upper/lower = middle ± num_std * σ over the same
// window. Band Width = (upper - lower) / middle * 100 — the volatility-level
// label compares the latest width to the mean width over the whole series.

/// Latest Bollinger Band values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

/// Compute the Bollinger Bands over the trailing `period` closes.
///
/// Returns `None` when there is not enough history, the middle band is zero
/// (degenerate input), or the width is non-finite.
pub fn latest_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerBands> {
    if period == 0 || closes.len() < period {
        return None;
    }
    bands_for_window(&closes[closes.len() - period..], num_std)
}

/// Rolling Band Width series, one value per close from index `period - 1`.
///
/// Used to classify the current volatility level against the series mean.
pub fn width_series(closes: &[f64], period: usize, num_std: f64) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    closes
        .windows(period)
        .map_while(|w| bands_for_window(w, num_std).map(|b| b.width))
        .collect()
}

fn bands_for_window(window: &[f64], num_std: f64) -> Option<BollingerBands> {
    let period_f = window.len() as f64;
    let middle = window.iter().sum::<f64>() / period_f;
    if middle == 0.0 || !middle.is_finite() {
        return None;
    }

    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period_f;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    let width = (upper - lower) / middle * 100.0;

    width.is_finite().then_some(BollingerBands {
        upper,
        middle,
        lower,
        width,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic_ordering() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bands = latest_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bands.upper > bands.middle);
        assert!(bands.lower < bands.middle);
        assert!(bands.width > 0.0);
    }

    #[test]
    fn bollinger_insufficient_data() {
        assert!(latest_bollinger(&[1.0, 2.0, 3.0], 20, 2.0).is_none());
    }

    #[test]
    fn bollinger_flat_series_zero_width() {
        let closes = vec![100.0; 20];
        let bands = latest_bollinger(&closes, 20, 2.0).unwrap();
        assert!(bands.width.abs() < 1e-10);
        assert!((bands.upper - bands.lower).abs() < 1e-10);
    }

    #[test]
    fn width_series_length() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let widths = width_series(&closes, 20, 2.0);
        assert_eq!(widths.len(), 11);
    }

    #[test]
    fn width_grows_with_volatility() {
        let calm: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let wild: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64 * 10.0).collect();
        let calm_width = latest_bollinger(&calm, 20, 2.0).unwrap().width;
        let wild_width = latest_bollinger(&wild, 20, 2.0).unwrap().width;
        assert!(wild_width > calm_width);
    }
}
