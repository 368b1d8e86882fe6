// =============================================================================
// Narrative Provider — Gemini generateContent
// =============================================================================
//
// Turns a finished analysis into a plain-text briefing prompt and sends it to
// the Gemini API. Failures here are degraded-mode, never fatal: the pipeline
// substitutes placeholder text and the report still renders.
// =============================================================================

use std::future::Future;

use serde_json::json;
use tracing::{debug, instrument};

use crate::analysis::AnalysisResult;
use crate::error::AnalysisError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Produces free-text prose for a finished analysis.
pub trait NarrativeProvider: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, AnalysisError>> + Send;
}

// =============================================================================
// Gemini client
// =============================================================================

#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            model: model.into(),
            client,
        }
    }
}

impl NarrativeProvider for GeminiClient {
    #[instrument(skip(self, prompt), name = "gemini::generate")]
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let Some(api_key) = &self.api_key else {
            return Err(AnalysisError::Provider(
                "narrative generation disabled: no API key configured".to_string(),
            ));
        };

        let url = format!(
            "{GEMINI_BASE_URL}/models/{}:generateContent?key={api_key}",
            self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::Provider(format!("narrative request failed: {e}")))?;

        let status = resp.status();
        let payload: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AnalysisError::Provider(format!("narrative response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(AnalysisError::Provider(format!(
                "narrative endpoint returned {status}: {payload}"
            )));
        }

        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| {
                AnalysisError::Provider("narrative response carried no text part".to_string())
            })?;

        debug!(chars = text.len(), "narrative generated");
        Ok(text.to_string())
    }
}

// =============================================================================
// Prompt construction
// =============================================================================

/// Serialize the analysis into the briefing prompt sent to the model.
pub fn build_briefing_prompt(result: &AnalysisResult) -> String {
    let fmt = |v: Option<f64>| match v {
        Some(x) => format!("{x:.2}"),
        None => "N/A".to_string(),
    };
    let label = |v: Option<String>| v.unwrap_or_else(|| "N/A".to_string());

    let mut prompt = String::with_capacity(2048);
    prompt.push_str(&format!(
        "You are a professional market analyst. Write a concise technical \
         briefing for {} covering {} to {}.\n\n",
        result.symbol, result.start_date, result.end_date
    ));

    prompt.push_str("Computed technical picture:\n");
    prompt.push_str(&format!(
        "- Last close: {} | SMA20: {} | SMA50: {} | SMA200: {}\n",
        fmt(result.last_close),
        fmt(result.trend.sma_20),
        fmt(result.trend.sma_50),
        fmt(result.trend.sma_200),
    ));
    prompt.push_str(&format!(
        "- MACD: {} (signal {}) | ADX: {} ({})\n",
        fmt(result.trend.macd),
        fmt(result.trend.macd_signal),
        fmt(result.trend.adx),
        label(result.trend.trend_strength.map(|s| s.to_string())),
    ));
    prompt.push_str(&format!(
        "- RSI: {} ({}) | Stochastic %K: {} %D: {}\n",
        fmt(result.momentum.rsi),
        label(result.momentum.rsi_signal.map(|s| s.to_string())),
        fmt(result.momentum.stoch_k),
        fmt(result.momentum.stoch_d),
    ));
    prompt.push_str(&format!(
        "- Bollinger: {} / {} / {} | ATR: {} | Volatility: {}\n",
        fmt(result.volatility.bb_upper),
        fmt(result.volatility.bb_middle),
        fmt(result.volatility.bb_lower),
        fmt(result.volatility.atr),
        label(result.volatility.volatility_level.map(|s| s.to_string())),
    ));
    prompt.push_str(&format!(
        "- OBV: {} | CMF: {} | MFI: {} | Volume trend: {}\n",
        fmt(result.volume.obv),
        fmt(result.volume.cmf),
        fmt(result.volume.mfi),
        label(result.volume.volume_trend.map(|s| s.to_string())),
    ));
    prompt.push_str(&format!(
        "- Risk: total return {}% | annualized volatility {}% | Sharpe {} | max drawdown {}%\n",
        fmt(result.risk.total_return_pct),
        fmt(result.risk.volatility_pct),
        fmt(result.risk.sharpe_ratio),
        fmt(result.risk.max_drawdown_pct),
    ));
    prompt.push_str(&format!(
        "- Trend fit: {} | 5-day projection endpoint: {}\n",
        label(result.forecast.direction.map(|d| d.to_string())),
        fmt(result.forecast.projections.last().copied()),
    ));
    prompt.push_str(&format!(
        "- Composite verdict: {} at {:.0}% confidence ({} bullish vs {} bearish observations)\n",
        result.verdict.overall,
        result.verdict.confidence,
        result.verdict.bullish.len(),
        result.verdict.bearish.len(),
    ));

    prompt.push_str(
        "\nInstructions:\n\
         1. Open with a one-paragraph overview of the current technical posture.\n\
         2. Discuss trend, momentum, volatility, and volume in that order, citing the numbers above.\n\
         3. Note the most relevant support/resistance context.\n\
         4. Comment on the risk profile (volatility, drawdown, Sharpe).\n\
         5. Close with a section titled 'Key Takeaway' summarizing the composite verdict.\n\
         6. Use markdown headings and keep the whole briefing under 600 words.\n\
         7. Do not give personalized financial advice; describe what the indicators show.\n",
    );

    prompt
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::types::{Bar, Series};
    use chrono::NaiveDate;

    // A flat base followed by a rally closing near the highs: golden cross,
    // price above SMA200, MACD crossover and accumulation all vote bullish,
    // so the composite verdict is BUY. A plain linear ramp would leave the
    // MACD comparison degenerate and CMF at exactly zero.
    fn sample_result() -> AnalysisResult {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = (0..250)
            .map(|i| {
                let (close, high, low) = if i < 215 {
                    (100.0, 101.0, 99.0)
                } else {
                    let close = 100.0 + (i - 214) as f64;
                    (close, close + 0.25, close - 2.0)
                };
                Bar {
                    timestamp: start + chrono::Days::new(i as u64),
                    open: close - 0.1,
                    high,
                    low,
                    close,
                    volume: 1_000.0,
                }
            })
            .collect();
        let series = Series::new("AAPL", bars);
        analyze(&series, start, start + chrono::Days::new(249))
    }

    #[test]
    fn prompt_carries_symbol_and_verdict() {
        let result = sample_result();
        let prompt = build_briefing_prompt(&result);
        assert!(prompt.contains("AAPL"));
        assert!(prompt.contains("Composite verdict: BUY"));
        assert!(prompt.contains("Key Takeaway"));
    }

    #[test]
    fn prompt_renders_unavailable_fields_as_na() {
        let series = Series::new(
            "XYZ",
            vec![
                Bar {
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    open: 10.0,
                    high: 11.0,
                    low: 9.0,
                    close: 10.5,
                    volume: 100.0,
                },
                Bar {
                    timestamp: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                    open: 10.5,
                    high: 11.5,
                    low: 10.0,
                    close: 11.0,
                    volume: 120.0,
                },
            ],
        );
        let result = analyze(
            &series,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        let prompt = build_briefing_prompt(&result);
        assert!(prompt.contains("SMA200: N/A"));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_provider_error() {
        let client = GeminiClient::new(None, "gemini-2.5-flash", 5);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Provider(_)));
    }
}
