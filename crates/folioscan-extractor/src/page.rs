//! Page-level extraction: harvest candidate fragments from the live DOM,
//! dedup them by content, build records, and read the summary figures.

use folioscan_core::{PortfolioSnapshot, PortfolioSummary};
use serde::Deserialize;

use crate::browser::{CapabilityError, Page};
use crate::fragment::{make_fragment_key, RawFragment};
use crate::numeric::{
    parse_amount_with_percentage, parse_currency, parse_percentage, parse_signed_currency,
};
use crate::strategy::build_record;

/// Runs inside the page. Walks the structural patterns in priority order and
/// returns every candidate fragment (with per-cell text for tabular rows)
/// plus the texts of elements that look like summary tiles.
const COLLECT_SCRIPT: &str = r#"
(() => {
  const selectors = [
    "table tbody tr",
    "table tr",
    "[class*='holdingRow']",
    "[class*='holding-row']",
    "[class*='holding'] li",
    "[class*='holdings'] > div",
    "[class*='portfolio'] tr",
    "[class*='position'] [class*='row']",
    "[data-holding]",
  ];
  const fragments = [];
  for (const selector of selectors) {
    for (const el of document.querySelectorAll(selector)) {
      const text = (el.innerText || "").trim();
      if (!text) continue;
      const cells = Array.from(el.querySelectorAll("td, th, [role='cell']"))
        .map((c) => (c.innerText || "").trim());
      fragments.push({ cells, text, selector });
    }
  }
  const labels = /invested|investment|current value|total returns|overall return/i;
  const summary_texts = [];
  for (const el of document.querySelectorAll(
    "[class*='summary'] div, [class*='total'], [class*='overview'] div"
  )) {
    const text = (el.innerText || "").trim();
    if (text && text.length < 200 && labels.test(text)) summary_texts.push(text);
  }
  return { fragments, summary_texts };
})()
"#;

/// Runs inside the page. True when the current document carries
/// holdings-bearing markup (used by navigation to decide whether a candidate
/// URL is the holdings page).
pub(crate) const HOLDINGS_PROBE_SCRIPT: &str = r#"
(() => {
  if (document.querySelector(
    "[class*='holdingRow'], [class*='holding-row'], [data-holding]"
  )) return true;
  if (document.querySelector("table tbody tr") &&
      /invested|current value|avg\.|qty|shares/i.test(document.body.innerText || ""))
    return true;
  return /holdings/i.test(document.title || "");
})()
"#;

/// What [`COLLECT_SCRIPT`] returns, deserialized.
#[derive(Debug, Deserialize)]
pub(crate) struct PageHarvest {
    pub fragments: Vec<RawFragment>,
    #[serde(default)]
    pub summary_texts: Vec<String>,
}

/// Harvests the loaded page and assembles a [`PortfolioSnapshot`].
///
/// Zero valid records is not an error: the portfolio may genuinely be empty,
/// or the markup may have drifted past the selectors. Either way the empty
/// snapshot is returned and the ambiguity is the caller's to judge.
///
/// # Errors
///
/// Returns [`CapabilityError`] when in-page evaluation fails or returns a
/// shape the harvest cannot be read from.
pub async fn extract_snapshot(
    page: &dyn Page,
    source_url: &str,
) -> Result<PortfolioSnapshot, CapabilityError> {
    let raw = page.evaluate(COLLECT_SCRIPT).await?;
    let harvest: PageHarvest = serde_json::from_value(raw)
        .map_err(|e| CapabilityError::Evaluation(format!("malformed harvest payload: {e}")))?;
    Ok(assemble_snapshot(harvest, source_url))
}

/// Pure assembly step: dedup fragments by content key, build records, parse
/// summary tiles.
pub(crate) fn assemble_snapshot(harvest: PageHarvest, source_url: &str) -> PortfolioSnapshot {
    let mut seen = std::collections::HashSet::new();
    let mut holdings = Vec::new();
    let total_fragments = harvest.fragments.len();

    for fragment in &harvest.fragments {
        // Overlapping selectors match the same element more than once; only
        // the first occurrence of a given content key is considered.
        if !seen.insert(make_fragment_key(fragment)) {
            continue;
        }
        if let Some(record) = build_record(fragment) {
            holdings.push(record);
        }
    }

    let summary = parse_summary(&harvest.summary_texts);

    if holdings.is_empty() {
        tracing::warn!(
            source_url,
            total_fragments,
            "extraction produced zero holdings"
        );
    } else {
        tracing::debug!(
            source_url,
            total_fragments,
            holdings = holdings.len(),
            "assembled portfolio snapshot"
        );
    }

    PortfolioSnapshot {
        holdings,
        summary,
        extracted_at: chrono::Utc::now(),
        source_url: source_url.to_string(),
    }
}

/// Scans summary-tile texts against the invested/current/returns vocabulary.
/// First matching tile per field wins; unobserved fields stay `None`.
fn parse_summary(texts: &[String]) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for text in texts {
        let lower = text.to_lowercase();

        if summary.total_invested.is_none()
            && (lower.contains("invested") || lower.contains("investment"))
        {
            summary.total_invested = parse_currency(text);
        }
        if summary.current_value.is_none() && lower.contains("current value") {
            summary.current_value = parse_currency(text);
        }
        if summary.total_returns.is_none() && lower.contains("return") {
            // "Total Returns +₹33,460.90 (34.07%)" — amount-with-percentage
            // first, then the signed and unsigned forms.
            if let Some((amount, pct)) = parse_amount_with_percentage(text) {
                // The sign sits before the currency marker and is lost on the
                // amount capture; recover it from the signed form.
                summary.total_returns = Some(parse_signed_currency(text).unwrap_or(amount));
                summary.total_returns_percentage = Some(pct);
            } else {
                summary.total_returns =
                    parse_signed_currency(text).or_else(|| parse_currency(text));
                summary.total_returns_percentage = parse_percentage(text);
            }
        }
    }

    summary
}

#[cfg(test)]
#[path = "page_test.rs"]
mod tests;
