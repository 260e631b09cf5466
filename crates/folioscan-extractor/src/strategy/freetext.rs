//! Free-text fallback for card/list markup that exposes no discrete cells.
//!
//! WARNING: the positional currency-token convention below (first token =
//! average price, second = current price, last two = current value then
//! invested value) encodes one known portal layout. It breaks the moment the
//! layout reorders, which is why it is confined to this module.

use folioscan_core::HoldingRecord;
use regex::Regex;

use super::RecordStrategy;
use crate::fragment::RawFragment;
use crate::numeric::{
    all_currency_values, parse_amount_with_percentage, parse_average_price, parse_percentage,
    parse_signed_currency, parse_units,
};

/// Pattern-matches a holding out of a fragment's flattened text.
pub(crate) struct FreeTextStrategy;

impl RecordStrategy for FreeTextStrategy {
    fn name(&self) -> &'static str {
        "free_text"
    }

    fn extract(&self, fragment: &RawFragment) -> Option<HoldingRecord> {
        let text = fragment.text.trim();

        let units = parse_units(text);
        let tokens = all_currency_values(text);
        let profit_loss = parse_signed_currency(text);

        // Nothing resembling a position in this text.
        if units.is_none() && tokens.is_empty() && profit_loss.is_none() {
            return None;
        }

        let mut record = HoldingRecord::empty();
        record.name = extract_name(text);
        record.units = units.unwrap_or(0.0);
        record.profit_loss = profit_loss.unwrap_or(0.0);

        record.average_buy_price = parse_average_price(text)
            .or_else(|| tokens.first().copied())
            .unwrap_or(0.0);
        if tokens.len() >= 2 {
            record.current_price = tokens[1];
        }
        if tokens.len() >= 4 {
            record.current_value = tokens[tokens.len() - 2];
            record.invested_value = tokens[tokens.len() - 1];
        }

        if let Some((_, pct)) = parse_amount_with_percentage(text) {
            record.day_change_percentage = pct;
        }
        // Often unsplittable from the surrounding amounts; derivation covers
        // the gap.
        record.profit_loss_percentage = parse_percentage(text).unwrap_or(0.0);

        Some(record)
    }
}

/// The instrument name is whatever leads the flattened text, up to the unit
/// count (`"Nuvama Wealth19 shares..."`) or the first labeled amount.
fn extract_name(text: &str) -> Option<String> {
    let units_re = Regex::new(r"[0-9]+(?:\.[0-9]+)?\s*(?:[Ss]hares?|[Uu]nits?)\b")
        .expect("valid regex");
    let boundary = units_re
        .find(text)
        .map(|m| m.start())
        .or_else(|| text.find(|c: char| c == '₹' || c.is_ascii_digit()));

    let mut name = match boundary {
        Some(idx) => text[..idx].trim(),
        None => text.trim(),
    };
    // The boundary may land on the amount after an "Avg." label; the label
    // is not part of the name.
    for label in ["Avg.", "Avg", "avg.", "avg"] {
        name = name.strip_suffix(label).unwrap_or(name).trim_end();
    }
    // Separator runs ("---", "……") are markup noise, not an identity.
    if name.chars().any(char::is_alphabetic) {
        Some(name.to_string())
    } else {
        None
    }
}
