// =============================================================================
// HTML report rendering
// =============================================================================
//
// Pure string assembly over a finished AnalysisResult plus the optional chart
// set and narrative text. The output is a single self-contained document:
// styles are inlined and charts are embedded as data URIs. Missing values
// render as "N/A" and missing charts/narrative simply drop their sections.
// =============================================================================

use chrono::Utc;

use crate::analysis::AnalysisResult;

use super::charts::ChartSet;
use super::format::{badge_class, currency, flag_class, percent, plain, range_signal_class, sign_class};
use super::markdown::markdown_to_html;

const STYLES: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', system-ui, -apple-system, sans-serif;
            background: #0f172a; color: #e2e8f0; line-height: 1.6;
        }
        .container { max-width: 1100px; margin: 0 auto; padding: 24px; }
        .header {
            text-align: center; padding: 36px 0; border-radius: 12px;
            background: linear-gradient(135deg, #1e293b, #0f172a);
            border: 1px solid #334155; margin-bottom: 28px;
        }
        .header h1 { font-size: 1.8em; margin-bottom: 8px; }
        .header .symbol { font-size: 2.4em; font-weight: 700; color: #38bdf8; }
        .header .meta { color: #94a3b8; margin-top: 8px; }
        .signal-box {
            text-align: center; padding: 28px; margin-bottom: 28px;
            background: #1e293b; border-radius: 12px; border: 1px solid #334155;
        }
        .signal-box .confidence { margin-top: 12px; color: #94a3b8; }
        .badge-buy, .badge-sell, .badge-hold {
            display: inline-block; padding: 10px 36px; border-radius: 999px;
            font-size: 1.6em; font-weight: 700; letter-spacing: 2px;
        }
        .badge-buy { background: #059669; color: #ecfdf5; }
        .badge-sell { background: #dc2626; color: #fef2f2; }
        .badge-hold { background: #d97706; color: #fffbeb; }
        .section { margin-bottom: 28px; }
        .section-title {
            font-size: 1.3em; margin-bottom: 16px; padding-bottom: 8px;
            border-bottom: 2px solid #334155;
        }
        .metrics-grid {
            display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr));
            gap: 16px;
        }
        .metric-card {
            background: #1e293b; border-radius: 10px; padding: 16px;
            border-left: 4px solid #38bdf8;
        }
        .metric-card .label { color: #94a3b8; font-size: 0.85em; text-transform: uppercase; }
        .metric-card .value { font-size: 1.4em; font-weight: 600; margin-top: 4px; }
        .metric-card .subtext { color: #94a3b8; font-size: 0.85em; margin-top: 2px; }
        .signals-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 20px; }
        .signals-list { background: #1e293b; border-radius: 10px; padding: 16px; }
        .signals-list h4 { margin-bottom: 10px; }
        .signals-list ul { list-style: none; }
        .signals-list li { padding: 6px 0; border-bottom: 1px solid #334155; }
        .signals-list li:last-child { border-bottom: none; }
        table { width: 100%; border-collapse: collapse; background: #1e293b; border-radius: 10px; }
        th, td { padding: 10px 14px; text-align: left; border-bottom: 1px solid #334155; }
        th { color: #94a3b8; text-transform: uppercase; font-size: 0.8em; }
        .chart-container { background: #1e293b; border-radius: 10px; padding: 16px; margin-bottom: 20px; }
        .chart-title { color: #94a3b8; margin-bottom: 10px; }
        .chart-container img { width: 100%; border-radius: 6px; }
        .ai-insights { background: #1e293b; border-radius: 10px; padding: 20px; border: 1px solid #334155; }
        .ai-insights h3 { color: #38bdf8; margin-bottom: 12px; }
        .ai-insights .content h1, .ai-insights .content h2,
        .ai-insights .content h3, .ai-insights .content h4 { margin: 14px 0 8px; }
        .ai-insights .content code { background: #0f172a; padding: 1px 6px; border-radius: 4px; }
        .disclaimer {
            background: #1e293b; border-left: 4px solid #d97706;
            border-radius: 10px; padding: 16px; color: #94a3b8; font-size: 0.9em;
        }
        .footer { text-align: center; color: #64748b; padding: 24px 0; font-size: 0.85em; }
        .text-success { color: #10b981; }
        .text-danger { color: #ef4444; }
        .text-warning { color: #f59e0b; }
        .text-muted { color: #94a3b8; }
"#;

/// Render the complete report document.
pub fn render(result: &AnalysisResult, charts: &ChartSet, narrative: Option<&str>) -> String {
    let mut html = String::with_capacity(32 * 1024);
    let generated = Utc::now().format("%B %d, %Y at %H:%M UTC");

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{} Technical Analysis Report</title>\n\
         <style>{STYLES}</style>\n</head>\n<body>\n<div class=\"container\">\n",
        result.symbol
    ));

    // ── header & verdict ────────────────────────────────────────────────
    html.push_str(&format!(
        "<div class=\"header\">\n\
         <h1>Technical Analysis Report</h1>\n\
         <div class=\"symbol\">{}</div>\n\
         <div class=\"meta\">Period: {} to {}<br>Generated: {}</div>\n\
         </div>\n",
        result.symbol, result.start_date, result.end_date, generated
    ));

    html.push_str(&format!(
        "<div class=\"signal-box\">\n\
         <div class=\"signal\"><span class=\"{}\">{}</span></div>\n\
         <div class=\"confidence\">Confidence: {}</div>\n\
         </div>\n",
        badge_class(result.verdict.overall),
        result.verdict.overall,
        percent(Some(result.verdict.confidence), 1),
    ));

    push_key_metrics(&mut html, result);
    push_signals(&mut html, result);
    push_trend(&mut html, result);
    push_momentum(&mut html, result);
    push_volatility_volume(&mut html, result);
    push_fibonacci(&mut html, result);
    push_pivots(&mut html, result);
    push_forecast(&mut html, result);

    if let Some(narrative) = narrative {
        html.push_str(&format!(
            "<section class=\"section\">\n<div class=\"ai-insights\">\n\
             <h3>AI Market Briefing</h3>\n<div class=\"content\">{}</div>\n\
             </div>\n</section>\n",
            markdown_to_html(narrative)
        ));
    }

    push_charts(&mut html, charts);

    html.push_str(
        "<div class=\"disclaimer\">\n<h4>Important Disclaimer</h4>\n\
         <p>This technical analysis report does not constitute financial advice, \
         investment recommendations, or an offer to buy or sell any securities. \
         Past performance is not indicative of future results. Always conduct your \
         own research and consult a qualified financial advisor before making \
         investment decisions.</p>\n</div>\n",
    );

    html.push_str(&format!(
        "<div class=\"footer\">\n<p><strong>MarketScope Technical Analysis</strong></p>\n\
         <p>Generated: {generated}</p>\n</div>\n</div>\n</body>\n</html>\n"
    ));

    html
}

fn metric_card(html: &mut String, label: &str, value_class: &str, value: &str, subtext: Option<&str>) {
    html.push_str(&format!(
        "<div class=\"metric-card\">\n<div class=\"label\">{label}</div>\n\
         <div class=\"value {value_class}\">{value}</div>\n"
    ));
    if let Some(sub) = subtext {
        html.push_str(&format!("<div class=\"subtext\">{sub}</div>\n"));
    }
    html.push_str("</div>\n");
}

fn opt_label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn push_key_metrics(html: &mut String, result: &AnalysisResult) {
    html.push_str(
        "<section class=\"section\">\n<h2 class=\"section-title\">Key Metrics</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    metric_card(html, "Current Price", "", &currency(result.trend.current_price, 2), None);
    metric_card(
        html,
        "RSI (14)",
        range_signal_class(result.momentum.rsi_signal),
        &plain(result.momentum.rsi, 2),
        Some(&opt_label(result.momentum.rsi_signal)),
    );
    metric_card(
        html,
        "Total Return",
        sign_class(result.risk.total_return_pct),
        &percent(result.risk.total_return_pct, 2),
        None,
    );
    metric_card(html, "Volatility (Annual)", "", &percent(result.risk.volatility_pct, 2), None);
    let sharpe_grade = result.risk.sharpe_ratio.map(|s| {
        if s > 2.0 {
            "Excellent"
        } else if s > 1.0 {
            "Good"
        } else {
            "Fair"
        }
    });
    metric_card(
        html,
        "Sharpe Ratio",
        "",
        &plain(result.risk.sharpe_ratio, 2),
        sharpe_grade,
    );
    metric_card(
        html,
        "Max Drawdown",
        "text-danger",
        &percent(result.risk.max_drawdown_pct, 2),
        None,
    );
    metric_card(
        html,
        "Avg Daily Return",
        sign_class(result.risk.avg_daily_return_pct),
        &percent(result.risk.avg_daily_return_pct, 3),
        None,
    );
    metric_card(html, "Positive Days", "", &percent(result.risk.positive_days_pct, 1), None);
    html.push_str("</div>\n</section>\n");
}

fn push_signals(html: &mut String, result: &AnalysisResult) {
    html.push_str(
        "<section class=\"section\">\n<h2 class=\"section-title\">Trading Signals</h2>\n\
         <div class=\"signals-grid\">\n",
    );

    html.push_str(&format!(
        "<div class=\"signals-list\">\n<h4>Bullish Signals ({})</h4>\n<ul>\n",
        result.verdict.bullish.len()
    ));
    if result.verdict.bullish.is_empty() {
        html.push_str("<li class=\"text-muted\">No bullish signals detected</li>\n");
    }
    for signal in &result.verdict.bullish {
        html.push_str(&format!("<li>{}</li>\n", signal.description));
    }
    html.push_str("</ul>\n</div>\n");

    html.push_str(&format!(
        "<div class=\"signals-list bearish\">\n<h4>Bearish Signals ({})</h4>\n<ul>\n",
        result.verdict.bearish.len()
    ));
    if result.verdict.bearish.is_empty() {
        html.push_str("<li class=\"text-muted\">No bearish signals detected</li>\n");
    }
    for signal in &result.verdict.bearish {
        html.push_str(&format!("<li>{}</li>\n", signal.description));
    }
    html.push_str("</ul>\n</div>\n</div>\n</section>\n");
}

fn push_trend(html: &mut String, result: &AnalysisResult) {
    let trend = &result.trend;
    html.push_str(
        "<section class=\"section\">\n<h2 class=\"section-title\">Trend Analysis</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    metric_card(html, "SMA 20", "", &currency(trend.sma_20, 2), None);
    metric_card(html, "SMA 50", "", &currency(trend.sma_50, 2), None);
    metric_card(html, "SMA 200", "", &currency(trend.sma_200, 2), None);
    metric_card(
        html,
        "Golden Cross",
        flag_class(trend.golden_cross),
        &opt_label(trend.golden_cross.map(|v| if v { "Yes" } else { "No" })),
        None,
    );
    metric_card(
        html,
        "MACD Status",
        flag_class(trend.macd_bullish),
        &opt_label(trend.macd_bullish.map(|v| if v { "Bullish" } else { "Bearish" })),
        Some(&plain(trend.macd, 4)),
    );
    metric_card(
        html,
        "ADX",
        "",
        &plain(trend.adx, 2),
        Some(&opt_label(trend.trend_strength)),
    );
    metric_card(
        html,
        "Price vs SMA 200",
        flag_class(trend.price_above_sma200),
        &opt_label(
            trend
                .price_above_sma200
                .map(|v| if v { "Above" } else { "Below" }),
        ),
        None,
    );
    html.push_str("</div>\n</section>\n");
}

fn push_momentum(html: &mut String, result: &AnalysisResult) {
    let momentum = &result.momentum;
    html.push_str(
        "<section class=\"section\">\n<h2 class=\"section-title\">Momentum</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    metric_card(
        html,
        "RSI (14)",
        range_signal_class(momentum.rsi_signal),
        &plain(momentum.rsi, 2),
        Some(&opt_label(momentum.rsi_signal)),
    );
    metric_card(
        html,
        "Stochastic %K",
        range_signal_class(momentum.stoch_signal),
        &plain(momentum.stoch_k, 2),
        Some(&opt_label(momentum.stoch_signal)),
    );
    metric_card(html, "Stochastic %D", "", &plain(momentum.stoch_d, 2), None);
    html.push_str("</div>\n</section>\n");
}

fn push_volatility_volume(html: &mut String, result: &AnalysisResult) {
    let volatility = &result.volatility;
    let volume = &result.volume;
    html.push_str(
        "<section class=\"section\">\n\
         <h2 class=\"section-title\">Volatility &amp; Volume Analysis</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    metric_card(
        html,
        "Bollinger Band Position",
        "",
        &opt_label(volatility.bb_position),
        None,
    );
    metric_card(html, "Bollinger Upper", "", &currency(volatility.bb_upper, 2), None);
    metric_card(html, "Bollinger Lower", "", &currency(volatility.bb_lower, 2), None);
    metric_card(html, "ATR", "", &currency(volatility.atr, 2), None);
    metric_card(
        html,
        "Volatility Level",
        "",
        &opt_label(volatility.volatility_level),
        None,
    );
    let volume_class = match volume.volume_trend {
        Some(crate::analysis::VolumeTrend::Accumulation) => "text-success",
        Some(crate::analysis::VolumeTrend::Distribution) => "text-danger",
        None => "text-muted",
    };
    metric_card(
        html,
        "Volume Trend",
        volume_class,
        &opt_label(volume.volume_trend),
        None,
    );
    metric_card(
        html,
        "MFI",
        "",
        &plain(volume.mfi, 2),
        Some(&opt_label(volume.mfi_signal)),
    );
    metric_card(html, "CMF", "", &plain(volume.cmf, 4), None);
    metric_card(html, "OBV", "", &plain(volume.obv, 0), None);
    html.push_str("</div>\n</section>\n");
}

fn push_fibonacci(html: &mut String, result: &AnalysisResult) {
    let Some(fib) = &result.fibonacci else { return };
    html.push_str(
        "<section class=\"section\">\n\
         <h2 class=\"section-title\">Fibonacci Retracement Levels</h2>\n\
         <table>\n<thead>\n<tr><th>Level</th><th>Price</th>\
         <th>Distance from Current</th></tr>\n</thead>\n<tbody>\n",
    );

    for level in &fib.levels {
        let distance = result
            .last_close
            .filter(|&close| close != 0.0)
            .map(|close| (level.price - close) / close * 100.0);
        let marker = if fib.closest.map(|c| c.ratio == level.ratio).unwrap_or(false) {
            " &larr; closest"
        } else {
            ""
        };
        html.push_str(&format!(
            "<tr><td><strong>Fib {:.3}</strong></td><td>{}</td>\
             <td class=\"{}\">{}{}</td></tr>\n",
            level.ratio,
            currency(Some(level.price), 2),
            sign_class(distance),
            percent(distance, 2),
            marker,
        ));
    }
    html.push_str("</tbody>\n</table>\n</section>\n");
}

fn push_pivots(html: &mut String, result: &AnalysisResult) {
    let Some(pivots) = &result.pivots else { return };
    html.push_str(
        "<section class=\"section\">\n\
         <h2 class=\"section-title\">Support &amp; Resistance Levels</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    metric_card(
        html,
        "Resistance 2",
        "text-danger",
        &currency(Some(pivots.resistance_2), 2),
        None,
    );
    metric_card(
        html,
        "Resistance 1",
        "text-warning",
        &currency(Some(pivots.resistance_1), 2),
        None,
    );
    metric_card(html, "Pivot Point", "", &currency(Some(pivots.pivot), 2), None);
    metric_card(
        html,
        "Support 1",
        "text-success",
        &currency(Some(pivots.support_1), 2),
        None,
    );
    metric_card(
        html,
        "Support 2",
        "text-success",
        &currency(Some(pivots.support_2), 2),
        None,
    );
    html.push_str("</div>\n</section>\n");
}

fn push_forecast(html: &mut String, result: &AnalysisResult) {
    let forecast = &result.forecast;
    html.push_str(
        "<section class=\"section\">\n<h2 class=\"section-title\">Trend Forecast</h2>\n\
         <div class=\"metrics-grid\">\n",
    );
    let direction_class = match forecast.direction {
        Some(crate::analysis::TrendDirection::Bullish) => "text-success",
        Some(crate::analysis::TrendDirection::Bearish) => "text-danger",
        None => "text-muted",
    };
    metric_card(
        html,
        "Fitted Trend",
        direction_class,
        &opt_label(forecast.direction),
        None,
    );
    metric_card(html, "Expected High (1d)", "", &currency(forecast.expected_high, 2), None);
    metric_card(html, "Expected Low (1d)", "", &currency(forecast.expected_low, 2), None);
    html.push_str("</div>\n");

    if !forecast.projections.is_empty() {
        html.push_str(
            "<table>\n<thead>\n<tr><th>Session</th><th>Projected Close</th></tr>\n\
             </thead>\n<tbody>\n",
        );
        for (i, projection) in forecast.projections.iter().enumerate() {
            html.push_str(&format!(
                "<tr><td>+{}</td><td>{}</td></tr>\n",
                i + 1,
                currency(Some(*projection), 2)
            ));
        }
        html.push_str("</tbody>\n</table>\n");
    }
    html.push_str("</section>\n");
}

fn push_charts(html: &mut String, charts: &ChartSet) {
    if charts.is_empty() {
        return;
    }

    html.push_str(
        "<section class=\"section\">\n\
         <h2 class=\"section-title\">Technical Analysis Charts</h2>\n",
    );
    let entries = [
        ("Main Technical Analysis", &charts.main),
        ("Advanced Indicators", &charts.advanced),
        ("Fibonacci Retracement &amp; Support/Resistance", &charts.fibonacci),
        ("Indicator Correlation Heatmap", &charts.heatmap),
    ];
    for (title, uri) in entries {
        if let Some(uri) = uri {
            html.push_str(&format!(
                "<div class=\"chart-container\">\n<div class=\"chart-title\">{title}</div>\n\
                 <img src=\"{uri}\" alt=\"{title}\">\n</div>\n"
            ));
        }
    }
    html.push_str("</section>\n");
}
