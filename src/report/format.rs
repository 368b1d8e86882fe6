// =============================================================================
// Display formatting — numbers, badges, value classes
// =============================================================================
//
// Numeric display rules: currency gets a dollar sign and thousands grouping,
// percentages get a trailing %, plain numbers get thousands grouping only.
// Unavailable values always render "N/A".

use crate::analysis::signals::Recommendation;
use crate::analysis::RangeSignal;

/// `$1,234.57` with the given decimal precision.
pub fn currency(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("${}", group_thousands(v, decimals)),
        None => "N/A".to_string(),
    }
}

/// `12.34%` with the given decimal precision.
pub fn percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}%"),
        None => "N/A".to_string(),
    }
}

/// `1,234.57` with thousands grouping.
pub fn plain(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => group_thousands(v, decimals),
        None => "N/A".to_string(),
    }
}

/// Insert `,` separators into the integer part of a fixed-precision render.
fn group_thousands(value: f64, decimals: usize) -> String {
    let rendered = format!("{value:.decimals$}");
    let (sign, rest) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// CSS badge class for the composite verdict.
pub fn badge_class(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::Buy => "badge-buy",
        Recommendation::Sell => "badge-sell",
        Recommendation::Hold => "badge-hold",
    }
}

/// CSS value class for an overbought/oversold reading.
pub fn range_signal_class(signal: Option<RangeSignal>) -> &'static str {
    match signal {
        Some(RangeSignal::Overbought) => "text-danger",
        Some(RangeSignal::Oversold) => "text-success",
        _ => "text-muted",
    }
}

/// `text-success` for positive, `text-danger` otherwise, `text-muted` when
/// unavailable.
pub fn sign_class(value: Option<f64>) -> &'static str {
    match value {
        Some(v) if v > 0.0 => "text-success",
        Some(_) => "text-danger",
        None => "text-muted",
    }
}

/// `text-success` / `text-danger` for a boolean flag, muted when unknown.
pub fn flag_class(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "text-success",
        Some(false) => "text-danger",
        None => "text-muted",
    }
}
