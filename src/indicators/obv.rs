// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
// Running signed cumulative volume: add the bar's volume when the close rose
// against the previous close, subtract it when the close fell, carry the
// total unchanged on an equal close. OBV starts at 0 on the first bar.

/// Compute the latest OBV value from parallel `closes` / `volumes` slices.
///
/// Returns `None` on empty or mismatched input, or when the accumulation
/// turns non-finite.
pub fn latest_obv(closes: &[f64], volumes: &[f64]) -> Option<f64> {
    if closes.is_empty() || closes.len() != volumes.len() {
        return None;
    }

    let mut obv = 0.0_f64;
    for i in 1..closes.len() {
        if closes[i] > closes[i - 1] {
            obv += volumes[i];
        } else if closes[i] < closes[i - 1] {
            obv -= volumes[i];
        }
        if !obv.is_finite() {
            return None;
        }
    }

    Some(obv)
}
