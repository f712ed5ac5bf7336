// 💵 Amount Parser - Free-form money text → exact integer cents
//
// "$1,234,567"      → 123_456_700
// "$1.2 million"    → 120_000_000
// "2.5 billion"     → 250_000_000_000
// "" / "garbage"    → 0   (absence of a valid amount is zero, not an error)
//
// Decimal math end-to-end: no f64 ever touches a money value.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Cents are always carried as a signed 64-bit integer
pub type Cents = i64;

static SCALED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?|\.\d+)(million|billion)").expect("scaled amount regex")
});

static PLAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d*)?|\.\d+)").expect("plain amount regex"));

/// Parse a monetary expression into cents.
///
/// Currency symbols, thousands separators and all whitespace are stripped first.
/// A scale word (`million`/`billion`, any case) multiplies the number right before it.
/// Without a scale word the leading decimal number is taken as dollars.
///
/// Rounding is half-away-from-zero on the exact decimal value. Unparseable input
/// (including signed values) yields `0`, so callers that must tell "zero" from
/// "unparsed" have to look at the raw text themselves.
pub fn parse_amount(text: &str) -> Cents {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect();

    if cleaned.is_empty() {
        return 0;
    }

    if let Some(caps) = SCALED.captures(&cleaned) {
        let scale = match caps[2].to_ascii_lowercase().as_str() {
            "billion" => Decimal::from(1_000_000_000_i64),
            _ => Decimal::from(1_000_000_i64),
        };
        return to_cents(&caps[1], scale);
    }

    match PLAIN.captures(&cleaned) {
        Some(caps) => to_cents(&caps[1], Decimal::ONE),
        None => 0,
    }
}

/// Dollars-and-cents rendering for console summaries
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, abs % 100)
}

fn to_cents(number: &str, scale: Decimal) -> Cents {
    // "12." is valid dollars but not a valid decimal literal
    let number = number.trim_end_matches('.');
    let Ok(value) = Decimal::from_str(number) else {
        return 0;
    };

    value
        .checked_mul(scale)
        .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .unwrap_or(0)
}

// ============================================================================
// TESTS
// ============================================================================
