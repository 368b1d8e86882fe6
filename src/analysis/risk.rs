// =============================================================================
// Risk metrics — return, volatility, Sharpe, drawdown
// =============================================================================
//
// Works on simple per-bar percentage returns of the close, first bar dropped.
// Annualization uses 252 trading days. Sharpe is defined as 0 when the
// return standard deviation is exactly 0; the standard deviation of a
// single-element return series is taken as 0 (sample stdev needs n >= 2).

use serde::Serialize;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RiskMetrics {
    pub total_return_pct: Option<f64>,
    pub volatility_pct: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
    pub avg_daily_return_pct: Option<f64>,
    pub positive_days_pct: Option<f64>,
}

impl RiskMetrics {
    fn unavailable() -> Self {
        Self {
            total_return_pct: None,
            volatility_pct: None,
            sharpe_ratio: None,
            max_drawdown_pct: None,
            avg_daily_return_pct: None,
            positive_days_pct: None,
        }
    }
}

/// Compute all risk statistics from the close series. Needs at least two
/// closes (one return); otherwise every field is unavailable.
pub fn compute(closes: &[f64]) -> RiskMetrics {
    if closes.len() < 2 {
        return RiskMetrics::unavailable();
    }
    let (Some(&first), Some(&last)) = (closes.first(), closes.last()) else {
        return RiskMetrics::unavailable();
    };
    if first == 0.0 {
        return RiskMetrics::unavailable();
    }

    let returns: Vec<f64> = closes
        .windows(2)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect();
    if returns.iter().any(|r| !r.is_finite()) {
        return RiskMetrics::unavailable();
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let stdev = sample_stdev(&returns, mean);

    let total_return_pct = (last / first - 1.0) * 100.0;
    let volatility_pct = stdev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
    let sharpe_ratio = if stdev == 0.0 {
        0.0
    } else {
        mean / stdev * TRADING_DAYS_PER_YEAR.sqrt()
    };

    let mut running_max = f64::MIN;
    let mut max_drawdown = 0.0_f64;
    for &close in closes {
        running_max = running_max.max(close);
        if running_max > 0.0 {
            max_drawdown = max_drawdown.min(close / running_max - 1.0);
        }
    }

    let positive_days =
        returns.iter().filter(|&&r| r > 0.0).count() as f64 / returns.len() as f64;

    RiskMetrics {
        total_return_pct: Some(total_return_pct),
        volatility_pct: Some(volatility_pct),
        sharpe_ratio: Some(sharpe_ratio),
        max_drawdown_pct: Some(max_drawdown * 100.0),
        avg_daily_return_pct: Some(mean * 100.0),
        positive_days_pct: Some(positive_days * 100.0),
    }
}

fn sample_stdev(returns: &[f64], mean: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    variance.sqrt()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_close_is_unavailable() {
        assert!(compute(&[100.0]).total_return_pct.is_none());
    }

    #[test]
    fn total_return_matches_endpoints() {
        let metrics = compute(&[100.0, 105.0, 110.0]);
        assert!((metrics.total_return_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn identical_returns_give_zero_sharpe() {
        // Doubling closes: every daily return is exactly 1.0 (powers of two
        // are exact in f64), so the variance is exactly zero. A compounding
        // fixture like 1.01^i would leave 1-ulp differences between returns.
        let closes: Vec<f64> = (0..10).map(|i| 100.0 * 2.0_f64.powi(i)).collect();
        let metrics = compute(&closes);
        assert_eq!(metrics.sharpe_ratio, Some(0.0));
        assert_eq!(metrics.volatility_pct, Some(0.0));
    }

    #[test]
    fn two_closes_give_zero_sharpe() {
        // One return: stdev is taken as 0.
        let metrics = compute(&[100.0, 110.0]);
        assert_eq!(metrics.sharpe_ratio, Some(0.0));
        assert!((metrics.total_return_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn drawdown_from_peak() {
        // Peak 120, trough 90: drawdown = 90/120 - 1 = -25%.
        let metrics = compute(&[100.0, 120.0, 90.0, 110.0]);
        assert!((metrics.max_drawdown_pct.unwrap() + 25.0).abs() < 1e-9);
    }

    #[test]
    fn monotonic_rise_has_zero_drawdown() {
        let metrics = compute(&[100.0, 101.0, 102.0, 103.0]);
        assert_eq!(metrics.max_drawdown_pct, Some(0.0));
        assert_eq!(metrics.positive_days_pct, Some(100.0));
    }

    #[test]
    fn positive_days_fraction() {
        // Returns: up, down, flat, up => 2 of 4 positive.
        let metrics = compute(&[100.0, 101.0, 100.0, 100.0, 102.0]);
        assert!((metrics.positive_days_pct.unwrap() - 50.0).abs() < 1e-9);
    }
}
