//! Low-level parsing of currency- and percentage-formatted text fragments.
//!
//! The portal renders amounts with a currency marker (`₹`, `Rs.`, `INR`),
//! thousands separators in Indian or Western grouping, and at most two
//! decimal places. All functions here are pure and idempotent; they return
//! `None` when no parseable pattern is found. See [`crate::strategy`] for how
//! they compose into full record extraction.

use regex::Regex;

/// Numeric body of an amount: integer part with optional separators and at
/// most two decimals. Capping the decimals lets runs of concatenated amounts
/// (`"6,930.0077.00"`) split at the right place.
const AMOUNT: &str = r"[0-9][0-9,]*(?:\.[0-9]{1,2})?";

/// Parses the first currency-marked amount in `text`.
///
/// `parse_currency("₹1,31,670.00") == Some(131670.0)`. Thousands separators
/// are stripped; the currency marker is required (see [`parse_numeric_cell`]
/// for bare-number cells).
#[must_use]
pub fn parse_currency(text: &str) -> Option<f64> {
    all_currency_values(text).into_iter().next()
}

/// Returns every currency-marked amount in `text`, in document order.
///
/// Signed amounts are included; the free-text strategy relies on positions
/// within this sequence.
#[must_use]
pub fn all_currency_values(text: &str) -> Vec<f64> {
    let re = Regex::new(&format!(r"(?:₹|Rs\.?\s*|INR\s*)\s*({AMOUNT})")).expect("valid regex");
    re.captures_iter(text)
        .filter_map(|caps| parse_grouped(caps.get(1)?.as_str()))
        .collect()
}

/// Parses an explicitly signed currency amount such as `"+₹33,460.90"` or
/// `"-₹1,200"`. Used for profit/loss, where the sign is the signal.
#[must_use]
pub fn parse_signed_currency(text: &str) -> Option<f64> {
    let re = Regex::new(&format!(r"([+-])\s*(?:₹|Rs\.?\s*|INR\s*)\s*({AMOUNT})"))
        .expect("valid regex");
    let caps = re.captures(text)?;
    let value = parse_grouped(caps.get(2)?.as_str())?;
    match caps.get(1)?.as_str() {
        "-" => Some(-value),
        _ => Some(value),
    }
}

/// Parses the first bare percentage (`"34.07%"`) that is not inside
/// parentheses. Parenthesized percentages belong to day-change readouts and
/// are handled by [`parse_amount_with_percentage`].
///
/// A match immediately preceded by a digit, comma, or dot is skipped: in
/// flattened fragment text amounts run together (`"33,460.9034.07%"`) and
/// such a match cannot be split reliably. Callers fall back to derivation.
#[must_use]
pub fn parse_percentage(text: &str) -> Option<f64> {
    let re = Regex::new(r"([+-]?[0-9]+(?:\.[0-9]+)?)\s*%").expect("valid regex");
    for caps in re.captures_iter(text) {
        let m = caps.get(1)?;
        let preceding = &text[..m.start()];
        if preceding.trim_end().ends_with('(') {
            continue;
        }
        if preceding.ends_with(|c: char| c.is_ascii_digit() || c == ',' || c == '.') {
            continue;
        }
        return m.as_str().parse().ok();
    }
    None
}

/// Parses an `"amount (pct%)"` readout, the portal's day-change layout:
/// `parse_amount_with_percentage("77.00 (1.12%)") == Some((77.0, 1.12))`.
#[must_use]
pub fn parse_amount_with_percentage(text: &str) -> Option<(f64, f64)> {
    let re = Regex::new(&format!(
        r"([+-]?{AMOUNT})\s*\(\s*([+-]?[0-9]+(?:\.[0-9]+)?)\s*%\s*\)"
    ))
    .expect("valid regex");
    let caps = re.captures(text)?;
    let amount = parse_grouped(caps.get(1)?.as_str())?;
    let pct = caps.get(2)?.as_str().parse().ok()?;
    Some((amount, pct))
}

/// Parses a unit count: `"19 shares"`, `"1 share"`, `"2.5 units"`, `"19 qty"`.
#[must_use]
pub fn parse_units(text: &str) -> Option<f64> {
    let re = Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:shares?|units?|qty)\b")
        .expect("valid regex");
    let caps = re.captures(text)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Parses an average-buy-price label: `"Avg. ₹5,168.90"`, `"avg price 102"`.
#[must_use]
pub fn parse_average_price(text: &str) -> Option<f64> {
    let re = Regex::new(&format!(
        r"(?i)avg\.?\s*(?:price)?\s*(?:₹|rs\.?\s*|inr\s*)?\s*({AMOUNT})"
    ))
    .expect("valid regex");
    let caps = re.captures(text)?;
    parse_grouped(caps.get(1)?.as_str())
}

/// Parses one table cell known to hold a number: strips currency markers,
/// separators, percent signs, and whitespace, then converts. A leading `-`
/// or parenthesized body reads as negative.
#[must_use]
pub fn parse_numeric_cell(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    let negative = trimmed.starts_with('-') || (trimmed.starts_with('(') && trimmed.ends_with(')'));
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Strips thousands separators and parses. Grouping is not validated; both
/// `1,31,670.00` (Indian) and `131,670.00` (Western) collapse to the same
/// number.
fn parse_grouped(s: &str) -> Option<f64> {
    s.replace(',', "").parse().ok()
}

#[cfg(test)]
#[path = "numeric_test.rs"]
mod tests;
