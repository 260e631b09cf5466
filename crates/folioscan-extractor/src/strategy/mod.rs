//! Record-building strategies.
//!
//! Each fragment is offered to the strategies in priority order (structured
//! cells, then free text) and the first one to produce a valid record wins.
//! Positional cell mapping is less error-prone than free-text pattern
//! matching, so it goes first; the free-text layout convention is fragile by
//! nature and lives entirely inside [`freetext`] so it can be swapped without
//! touching the orchestrator.

mod freetext;
mod structured;

use folioscan_core::HoldingRecord;
use regex::Regex;

use crate::fragment::RawFragment;

pub(crate) use freetext::FreeTextStrategy;
pub(crate) use structured::StructuredCellStrategy;

/// One extraction strategy. `None` means "inapplicable to this fragment",
/// not an error.
pub(crate) trait RecordStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, fragment: &RawFragment) -> Option<HoldingRecord>;
}

/// Fragments shorter than this cannot describe a holding.
const MIN_FRAGMENT_TEXT_LEN: usize = 10;

/// Column-header vocabulary. A fragment made up of nothing but these labels
/// is a table header, not data.
const HEADER_VOCABULARY: &[&str] = &[
    "stock name",
    "company",
    "symbol",
    "quantity",
    "qty",
    "shares",
    "units",
    "avg. price",
    "avg price",
    "average price",
    "avg. buy price",
    "buy price",
    "current price",
    "market price",
    "ltp",
    "invested",
    "investment",
    "current value",
    "market value",
    "day change",
    "day's change",
    "1d change",
    "p&l",
    "p/l",
    "profit",
    "loss",
    "overall returns",
    "overall return",
    "returns",
    "holdings",
    "holding",
    "portfolio",
    "value",
    "price",
    "change",
    "actions",
];

/// Turns one fragment into a [`HoldingRecord`], or `None` when the fragment
/// is a header, too short, or no strategy can build a valid record from it.
///
/// Derivation rules (invested from units x avg price, P&L from values, P&L
/// percentage from P&L) are applied to every strategy's output before the
/// minimum-validity check.
#[must_use]
pub fn build_record(fragment: &RawFragment) -> Option<HoldingRecord> {
    if should_skip(fragment) {
        return None;
    }

    let strategies: [&dyn RecordStrategy; 2] = [&StructuredCellStrategy, &FreeTextStrategy];

    for strategy in strategies {
        if let Some(mut record) = strategy.extract(fragment) {
            if record.isin.is_none() {
                record.isin = extract_isin(&fragment.text);
            }
            record.apply_derivations();
            if record.is_valid() {
                tracing::debug!(
                    strategy = strategy.name(),
                    name = record.name.as_deref().unwrap_or(""),
                    "built holding record"
                );
                return Some(record);
            }
        }
    }

    None
}

/// Header labels and sub-minimal fragments are skipped outright; they are
/// not data and must not count as rejects either.
fn should_skip(fragment: &RawFragment) -> bool {
    let text = fragment.text.trim();
    if text.len() < MIN_FRAGMENT_TEXT_LEN {
        return true;
    }
    is_header_text(text)
}

/// True when `text` consists only of header vocabulary (plus punctuation
/// and whitespace). Any digit disqualifies immediately: headers carry no
/// numbers.
fn is_header_text(text: &str) -> bool {
    if text.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let mut remainder = text.to_lowercase();
    for label in HEADER_VOCABULARY {
        remainder = remainder.replace(label, " ");
    }
    !remainder.chars().any(char::is_alphanumeric)
}

/// Captures an ISIN (two-letter country code, nine alphanumerics, check
/// digit) anywhere in the fragment text.
fn extract_isin(text: &str) -> Option<String> {
    let re = Regex::new(r"\b([A-Z]{2}[A-Z0-9]{9}[0-9])\b").expect("valid regex");
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
#[path = "strategy_test.rs"]
mod tests;
