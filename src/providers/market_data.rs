// =============================================================================
// Market Data Provider — Yahoo Finance chart API
// =============================================================================
//
// Daily history comes from GET /v8/finance/chart/{symbol} with unix-second
// period bounds and interval=1d. Rows with any null field are skipped; an
// empty result maps to DataUnavailable.
//
// When the daily history ends before today, a same-day partial bar is
// synthesized from the 1-minute intraday feed (first open, max high, min
// low, last close, summed volume) and appended. Intraday failures are
// non-fatal: the daily series is returned as-is.
// =============================================================================

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use crate::error::AnalysisError;
use crate::types::{Bar, Series};

/// Fetches one instrument's OHLCV history for a date range.
pub trait SeriesProvider: Send + Sync {
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Series, AnalysisError>> + Send;
}

// =============================================================================
// Yahoo Finance client
// =============================================================================

#[derive(Clone)]
pub struct YahooFinanceClient {
    base_url: String,
    include_intraday: bool,
    client: reqwest::Client,
}

impl YahooFinanceClient {
    pub fn new(base_url: impl Into<String>, include_intraday: bool, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0 (compatible; marketscope/1.0)")
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            include_intraday,
            client,
        }
    }

    async fn get_chart(
        &self,
        symbol: &str,
        query: &str,
    ) -> Result<serde_json::Value, AnalysisError> {
        let url = format!("{}/v8/finance/chart/{}?{}", self.base_url, symbol, query);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AnalysisError::Provider(format!("chart request failed: {e}")))?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AnalysisError::Provider(format!("chart response unreadable: {e}")))?;

        if !status.is_success() {
            // Yahoo reports unknown symbols as a 404 with an error object.
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(AnalysisError::DataUnavailable {
                    symbol: symbol.to_string(),
                });
            }
            return Err(AnalysisError::Provider(format!(
                "chart endpoint returned {status}: {body}"
            )));
        }

        Ok(body)
    }

    /// Merge today's partial bar when the daily history is behind.
    async fn append_intraday(&self, series: &mut Series, symbol: &str) {
        let today = Utc::now().date_naive();
        let behind = series.last().map(|b| b.timestamp < today).unwrap_or(false);
        if !behind {
            return;
        }

        let body = match self.get_chart(symbol, "interval=1m&range=1d").await {
            Ok(body) => body,
            Err(e) => {
                warn!(symbol, error = %e, "intraday fetch failed, keeping daily series");
                return;
            }
        };

        match synthesize_intraday_bar(&body, today) {
            Some(bar) => {
                if series.push(bar) {
                    debug!(symbol, close = bar.close, "appended same-day partial bar");
                }
            }
            None => {
                debug!(symbol, "no usable intraday rows, keeping daily series");
            }
        }
    }
}

impl SeriesProvider for YahooFinanceClient {
    #[instrument(skip(self), name = "yahoo::fetch")]
    async fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Series, AnalysisError> {
        let period1 = unix_seconds(start);
        // End bound is exclusive at Yahoo; push it one day out to include `end`.
        let period2 = unix_seconds(end + chrono::Days::new(1));
        let query = format!("period1={period1}&period2={period2}&interval=1d");

        let body = self.get_chart(symbol, &query).await?;
        let bars = parse_daily_bars(&body);

        if bars.is_empty() {
            return Err(AnalysisError::DataUnavailable {
                symbol: symbol.to_string(),
            });
        }

        let mut series = Series::new(symbol, bars);
        debug!(symbol, bars = series.len(), "daily history fetched");

        if self.include_intraday {
            self.append_intraday(&mut series, symbol).await;
        }

        Ok(series)
    }
}

// =============================================================================
// Response parsing
// =============================================================================

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or(0)
}

/// Extract daily bars from a chart response, skipping rows with null fields
/// and rows that would break timestamp ordering.
fn parse_daily_bars(body: &serde_json::Value) -> Vec<Bar> {
    let result = &body["chart"]["result"][0];

    let timestamps = match result["timestamp"].as_array() {
        Some(ts) => ts,
        None => return Vec::new(),
    };
    let quote = &result["indicators"]["quote"][0];

    let field = |name: &str, i: usize| quote[name].get(i).and_then(|v| v.as_f64());

    let mut bars: Vec<Bar> = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(secs) = ts.as_i64() else { continue };
        let Some(timestamp) = DateTime::from_timestamp(secs, 0).map(|dt| dt.date_naive()) else {
            continue;
        };

        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field("open", i),
            field("high", i),
            field("low", i),
            field("close", i),
            field("volume", i),
        ) else {
            continue;
        };

        if bars.last().map(|b: &Bar| timestamp <= b.timestamp).unwrap_or(false) {
            continue;
        }

        bars.push(Bar {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        });
    }
    bars
}

/// Collapse the 1-minute rows into one partial daily bar.
fn synthesize_intraday_bar(body: &serde_json::Value, date: NaiveDate) -> Option<Bar> {
    let result = &body["chart"]["result"][0];
    let timestamps = result["timestamp"].as_array()?;
    let quote = &result["indicators"]["quote"][0];

    let field = |name: &str, i: usize| quote[name].get(i).and_then(|v| v.as_f64());

    let mut open = None;
    let mut high = f64::MIN;
    let mut low = f64::MAX;
    let mut close = None;
    let mut volume = 0.0;

    for i in 0..timestamps.len() {
        let (Some(o), Some(h), Some(l), Some(c)) = (
            field("open", i),
            field("high", i),
            field("low", i),
            field("close", i),
        ) else {
            continue;
        };

        if open.is_none() {
            open = Some(o);
        }
        high = high.max(h);
        low = low.min(l);
        close = Some(c);
        volume += field("volume", i).unwrap_or(0.0);
    }

    Some(Bar {
        timestamp: date,
        open: open?,
        high,
        low,
        close: close?,
        volume,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_body(timestamps: Vec<i64>, closes: Vec<serde_json::Value>) -> serde_json::Value {
        let n = timestamps.len();
        json!({
            "chart": {
                "result": [{
                    "timestamp": timestamps,
                    "indicators": {
                        "quote": [{
                            "open": vec![100.0; n],
                            "high": vec![105.0; n],
                            "low": vec![95.0; n],
                            "close": closes,
                            "volume": vec![1000.0; n],
                        }]
                    }
                }]
            }
        })
    }

    #[test]
    fn parse_skips_null_rows() {
        // 2024-01-02 .. 2024-01-04, middle close is null.
        let body = chart_body(
            vec![1704182400, 1704268800, 1704355200],
            vec![json!(101.0), json!(null), json!(103.0)],
        );
        let bars = parse_daily_bars(&body);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].close, 101.0);
        assert_eq!(bars[1].close, 103.0);
    }

    #[test]
    fn parse_empty_result() {
        let body = json!({ "chart": { "result": [null], "error": null } });
        assert!(parse_daily_bars(&body).is_empty());
    }

    #[test]
    fn parse_preserves_timestamp_order() {
        let body = chart_body(
            vec![1704182400, 1704268800, 1704268800],
            vec![json!(101.0), json!(102.0), json!(103.0)],
        );
        let bars = parse_daily_bars(&body);
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
    }

    #[test]
    fn intraday_bar_synthesis() {
        let n = 3;
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": vec![1, 2, 3],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.0, 102.0],
                            "high": [101.0, 104.0, 103.0],
                            "low": [99.0, 100.0, 98.0],
                            "close": [101.0, 102.0, 102.5],
                            "volume": vec![10.0; n],
                        }]
                    }
                }]
            }
        });
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let bar = synthesize_intraday_bar(&body, date).unwrap();
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.high, 104.0);
        assert_eq!(bar.low, 98.0);
        assert_eq!(bar.close, 102.5);
        assert_eq!(bar.volume, 30.0);
        assert_eq!(bar.timestamp, date);
    }

    #[test]
    fn intraday_all_null_yields_none() {
        let body = json!({
            "chart": {
                "result": [{
                    "timestamp": [1, 2],
                    "indicators": {
                        "quote": [{
                            "open": [null, null],
                            "high": [null, null],
                            "low": [null, null],
                            "close": [null, null],
                            "volume": [null, null],
                        }]
                    }
                }]
            }
        });
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(synthesize_intraday_bar(&body, date).is_none());
    }
}
