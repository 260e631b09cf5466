//! Holdings-page navigation.
//!
//! The post-login location of the holdings page is not fixed, so candidates
//! are tried in configured order: navigate, let the client-side render
//! settle, probe for holdings-bearing markup, stop at the first hit. The
//! failure case carries every URL that was tried.

use std::time::Duration;

use crate::browser::{CapabilityError, Page};
use crate::page::HOLDINGS_PROBE_SCRIPT;

/// Outcome of a navigation hunt.
#[derive(Debug)]
pub enum NavigationOutcome {
    /// A candidate (or the page we were already on) shows holdings markup.
    Found { url: String },
    /// Every candidate was tried without a hit.
    Exhausted { attempted_urls: Vec<String> },
}

/// Probes the current document for holdings markup.
///
/// # Errors
///
/// Returns [`CapabilityError`] when evaluation fails.
pub async fn page_has_holdings(page: &dyn Page) -> Result<bool, CapabilityError> {
    let value = page.evaluate(HOLDINGS_PROBE_SCRIPT).await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Finds the holdings page.
///
/// The page the user landed on after login is probed first — portals often
/// drop straight onto the dashboard that carries holdings. Then each
/// candidate URL is tried in order with a per-URL `navigation_timeout`.
/// Navigation failures on one candidate are logged and the hunt moves on;
/// only evaluation failures abort.
///
/// # Errors
///
/// Returns [`CapabilityError`] when a probe evaluation fails (not when a
/// candidate merely fails to load).
pub async fn find_holdings_page(
    page: &dyn Page,
    candidate_urls: &[String],
    navigation_timeout: Duration,
    render_settle: Duration,
) -> Result<NavigationOutcome, CapabilityError> {
    if page_has_holdings(page).await? {
        let url = page.current_url().await?;
        tracing::debug!(url, "landing page already shows holdings");
        return Ok(NavigationOutcome::Found { url });
    }

    let mut attempted_urls = Vec::with_capacity(candidate_urls.len());

    for url in candidate_urls {
        attempted_urls.push(url.clone());

        if let Err(e) = page.navigate(url, navigation_timeout).await {
            tracing::debug!(url, error = %e, "candidate holdings URL failed to load");
            continue;
        }
        tokio::time::sleep(render_settle).await;

        if page_has_holdings(page).await? {
            tracing::debug!(url, "holdings markup detected");
            return Ok(NavigationOutcome::Found { url: url.clone() });
        }
        tracing::debug!(url, "page loaded but shows no holdings markup");
    }

    tracing::warn!(
        attempted = attempted_urls.len(),
        "no candidate URL yielded a holdings page"
    );
    Ok(NavigationOutcome::Exhausted { attempted_urls })
}
