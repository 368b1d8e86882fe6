// =============================================================================
// Shared price-series types used across the MarketScope analysis engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One OHLCV observation for one trading day.
///
/// Bars are immutable once recorded; a `Series` only ever appends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// An ordered sequence of daily bars for one instrument.
///
/// Invariant: timestamps are strictly increasing with no duplicates. The
/// invariant is enforced at the only mutation point, [`Series::push`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    pub symbol: String,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Self {
        Self {
            symbol: symbol.into(),
            bars,
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Closing prices in chronological order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Trade volumes in chronological order.
    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Append a bar, rejecting any timestamp that is not strictly after the
    /// current last bar. Returns `true` when the bar was accepted.
    pub fn push(&mut self, bar: Bar) -> bool {
        if let Some(last) = self.bars.last() {
            if bar.timestamp <= last.timestamp {
                return false;
            }
        }
        self.bars.push(bar);
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn push_accepts_increasing_timestamps() {
        let mut series = Series::new("TEST", vec![bar(1, 100.0)]);
        assert!(series.push(bar(2, 101.0)));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn push_rejects_duplicate_timestamp() {
        let mut series = Series::new("TEST", vec![bar(1, 100.0)]);
        assert!(!series.push(bar(1, 102.0)));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn push_rejects_out_of_order_timestamp() {
        let mut series = Series::new("TEST", vec![bar(5, 100.0)]);
        assert!(!series.push(bar(3, 99.0)));
    }

    #[test]
    fn closes_preserve_order() {
        let series = Series::new("TEST", vec![bar(1, 10.0), bar(2, 11.0), bar(3, 12.0)]);
        assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    }
}
