//! The extraction-session state machine.
//!
//! One `run_session` call is one end-to-end attempt: launch an isolated
//! browser, park on the login page until the user finishes authenticating,
//! hunt down the holdings page, extract, and hand the snapshot back. The
//! browser is released on every exit path, and the session's progress
//! registration never outlives the session.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use folioscan_core::{ExtractorConfig, PortfolioSnapshot, SessionPhase};

use crate::browser::{Browser, BrowserLauncher};
use crate::error::ExtractionError;
use crate::navigate::{find_holdings_page, NavigationOutcome};
use crate::page::extract_snapshot;
use crate::progress::{ProgressCallback, ProgressReporter};
use crate::session::wait_for_login;

/// Drives extraction sessions against the configured portal.
///
/// The orchestrator owns the progress registry; concurrent sessions with
/// distinct ids are independent and each acquires its own browser.
pub struct ExtractionOrchestrator {
    launcher: Arc<dyn BrowserLauncher>,
    config: ExtractorConfig,
    progress: ProgressReporter,
}

impl ExtractionOrchestrator {
    #[must_use]
    pub fn new(launcher: Arc<dyn BrowserLauncher>, config: ExtractorConfig) -> Self {
        Self {
            launcher,
            config,
            progress: ProgressReporter::new(),
        }
    }

    /// Runs exactly one extraction attempt for `session_id`.
    ///
    /// Progress updates (if a callback is given) are emitted in transition
    /// order with non-decreasing percentages, ending at 100 only on success.
    /// On any outcome the browser is closed and the progress registration is
    /// removed before this returns.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::CapabilityUnavailable`] — the automation
    ///   capability cannot launch or fails mid-session.
    /// - [`ExtractionError::LoginTimeout`] — the user did not complete the
    ///   interactive login in time.
    /// - [`ExtractionError::HoldingsPageUnreachable`] — every candidate
    ///   holdings URL was tried without finding holdings markup.
    pub async fn run_session(
        &self,
        session_id: &str,
        on_progress: Option<ProgressCallback>,
    ) -> Result<PortfolioSnapshot, ExtractionError> {
        if let Some(callback) = on_progress {
            self.progress.register(session_id, callback);
        }

        let result = self.run_with_browser(session_id).await;

        self.progress.remove(session_id);
        match &result {
            Ok(snapshot) => tracing::info!(
                session_id,
                holdings = snapshot.holdings.len(),
                "extraction session completed"
            ),
            Err(e) => tracing::warn!(session_id, error = %e, "extraction session failed"),
        }
        result
    }

    /// Acquires the browser, drives the session, and releases the browser
    /// regardless of how the drive ended.
    async fn run_with_browser(
        &self,
        session_id: &str,
    ) -> Result<PortfolioSnapshot, ExtractionError> {
        let gauge = ProgressGauge::new(&self.progress, session_id);
        gauge.phase(SessionPhase::Initializing);

        let browser = self
            .launcher
            .launch(self.config.headless)
            .await
            .map_err(|e| ExtractionError::CapabilityUnavailable {
                reason: e.to_string(),
            })?;

        let result = self.drive(browser.as_ref(), session_id, &gauge).await;

        // The real result is already determined; a failed release is an
        // observability event, not the session's outcome.
        if let Err(e) = browser.close().await {
            tracing::warn!(session_id, error = %e, "failed to release browser");
        }

        result
    }

    /// The phase sequence proper: login wait, navigation hunt, extraction.
    async fn drive(
        &self,
        browser: &dyn Browser,
        session_id: &str,
        gauge: &ProgressGauge<'_>,
    ) -> Result<PortfolioSnapshot, ExtractionError> {
        let config = &self.config;
        let page = browser
            .new_page()
            .await
            .map_err(|e| ExtractionError::capability("initializing", e))?;

        let navigation_timeout = Duration::from_secs(config.navigation_timeout_secs);
        page.navigate(&config.login_url(), navigation_timeout)
            .await
            .map_err(|e| ExtractionError::capability("opening login page", e))?;
        page.wait_for("body", navigation_timeout)
            .await
            .map_err(|e| ExtractionError::capability("opening login page", e))?;

        gauge.phase(SessionPhase::AwaitingLogin);
        tracing::info!(session_id, "waiting for interactive login");

        let login_budget = Duration::from_secs(config.login_timeout_secs);
        let poll_interval = Duration::from_secs(config.login_poll_interval_secs);
        let total_polls =
            u32::try_from((config.login_timeout_secs / config.login_poll_interval_secs).max(1))
                .unwrap_or(u32::MAX);

        let awaiting_floor = SessionPhase::AwaitingLogin.percentage_floor();
        let detected_floor = SessionPhase::SessionDetected.percentage_floor();
        let band = detected_floor - awaiting_floor - 1;
        let logged_in = wait_for_login(page.as_ref(), login_budget, poll_interval, |polls| {
            // Creep through the AwaitingLogin band as the wait goes on, never
            // touching the next phase's floor.
            let crept = u8::try_from((u64::from(polls) * u64::from(band)) / u64::from(total_polls))
                .unwrap_or(band)
                .min(band);
            gauge.emit(
                awaiting_floor + crept,
                SessionPhase::AwaitingLogin.message(),
            );
        })
        .await
        .map_err(|e| ExtractionError::capability("awaiting login", e))?;

        if !logged_in {
            return Err(ExtractionError::LoginTimeout {
                waited_secs: config.login_timeout_secs,
            });
        }
        gauge.phase(SessionPhase::SessionDetected);
        tracing::info!(session_id, "login detected");

        gauge.phase(SessionPhase::Navigating);
        let outcome = find_holdings_page(
            page.as_ref(),
            &config.holdings_urls(),
            navigation_timeout,
            Duration::from_millis(config.render_settle_ms),
        )
        .await
        .map_err(|e| ExtractionError::capability("navigating", e))?;

        let holdings_url = match outcome {
            NavigationOutcome::Found { url } => url,
            NavigationOutcome::Exhausted { attempted_urls } => {
                return Err(ExtractionError::HoldingsPageUnreachable { attempted_urls });
            }
        };

        gauge.phase(SessionPhase::Extracting);
        let snapshot = extract_snapshot(page.as_ref(), &holdings_url)
            .await
            .map_err(|e| ExtractionError::capability("extracting", e))?;

        gauge.emit(90, "Holdings read");
        gauge.phase(SessionPhase::Completed);
        Ok(snapshot)
    }
}

/// Emits progress for one session, clamping percentages to be
/// non-decreasing. Failures simply stop emitting; 100 is reached only via
/// [`SessionPhase::Completed`].
struct ProgressGauge<'a> {
    reporter: &'a ProgressReporter,
    session_id: &'a str,
    last: AtomicU8,
}

impl<'a> ProgressGauge<'a> {
    fn new(reporter: &'a ProgressReporter, session_id: &'a str) -> Self {
        Self {
            reporter,
            session_id,
            last: AtomicU8::new(0),
        }
    }

    fn phase(&self, phase: SessionPhase) {
        self.emit(phase.percentage_floor(), phase.message());
    }

    fn emit(&self, percentage: u8, message: &str) {
        let capped = percentage.min(100);
        let previous = self.last.fetch_max(capped, Ordering::SeqCst);
        self.reporter
            .emit(self.session_id, previous.max(capped), message);
    }
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
