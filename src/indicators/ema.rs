// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA weights recent prices more heavily than the SMA:
//
//   multiplier = 2 / (period + 1)
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first value is seeded with the SMA of the first `period` closes, so
// the output series starts at index `period - 1` of the input.

/// Compute the EMA series for the given `closes` and lookback `period`.
///
/// Returns an empty `Vec` when the period is zero or the input is too short.
/// A non-finite intermediate value truncates the series — downstream
/// consumers must not trust values past a numerical breakdown.
pub fn ema_series(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.len() < period {
        return Vec::new();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let seed: f64 = closes[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(closes.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &close in &closes[period..] {
        let ema = close * multiplier + prev * (1.0 - multiplier);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(ema_series(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(ema_series(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_insufficient_data() {
        assert!(ema_series(&[1.0, 2.0], 5).is_empty());
    }

    #[test]
    fn ema_seed_is_sma() {
        let closes = vec![2.0, 4.0, 6.0];
        let ema = ema_series(&closes, 3);
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of 1..=10: seed = 3.0, multiplier = 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = ema_series(&closes, 5);
        assert_eq!(ema.len(), 6);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        for (i, &c) in closes[5..].iter().enumerate() {
            expected = c * mult + expected * (1.0 - mult);
            assert!((ema[i + 1] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_leads_sma_when_prices_accelerate() {
        // On a straight line both averages settle on the same lag, so the
        // comparison degenerates to equality. A convex (accelerating) series
        // keeps the EMA strictly ahead of the SMA.
        let closes: Vec<f64> = (1..=100).map(|x| (x * x) as f64).collect();
        let ema = *ema_series(&closes, 12).last().unwrap();
        let sma = crate::indicators::moving_average::latest_sma(&closes, 12).unwrap();
        assert!(
            ema > sma + 1.0,
            "EMA {ema} should exceed SMA {sma} when prices accelerate"
        );
    }

    #[test]
    fn ema_nan_truncates() {
        let closes = vec![1.0, 2.0, 3.0, f64::NAN, 5.0];
        let ema = ema_series(&closes, 3);
        assert_eq!(ema.len(), 1);
    }
}
