//! Login-completion detection.
//!
//! The portal offers no login-completion event and no fixed post-login URL,
//! so the detector polls: login is considered complete when login-page
//! markers are gone AND authenticated-area markers are present. "Not logged
//! in yet" is a normal `false`, never an error; only capability failures
//! propagate.

use std::time::Duration;

use crate::browser::{CapabilityError, Page};

/// Runs inside the page. Mirrors the detector contract: absence of login
/// markers plus presence of authenticated markers.
const LOGIN_PROBE_SCRIPT: &str = r#"
(() => {
  const loginMarkers = [
    "input[type='password']",
    "input[name='otp']",
    "[class*='login-form']",
    "[class*='loginForm']",
    "form[action*='login']",
  ];
  for (const selector of loginMarkers) {
    if (document.querySelector(selector)) return false;
  }
  const authMarkers = [
    "[class*='profile']",
    "[class*='avatar']",
    "[class*='dashboard']",
    "[href*='logout']",
    "[class*='user-menu']",
    "[class*='userMenu']",
  ];
  return authMarkers.some((selector) => document.querySelector(selector) !== null);
})()
"#;

/// One probe: is the interactive login complete right now?
///
/// # Errors
///
/// Returns [`CapabilityError`] only when the in-page evaluation itself fails.
pub async fn is_logged_in(page: &dyn Page) -> Result<bool, CapabilityError> {
    let value = page.evaluate(LOGIN_PROBE_SCRIPT).await?;
    Ok(value.as_bool().unwrap_or(false))
}

/// Polls [`is_logged_in`] every `poll_interval` until it reports `true` or
/// `timeout` is spent. Returns `Ok(true)` on login, `Ok(false)` on timeout.
///
/// `on_poll` is invoked after each negative probe with the number of polls
/// completed so far (the orchestrator uses it to inch progress forward).
///
/// # Errors
///
/// Returns [`CapabilityError`] when a probe fails.
pub async fn wait_for_login(
    page: &dyn Page,
    timeout: Duration,
    poll_interval: Duration,
    mut on_poll: impl FnMut(u32) + Send,
) -> Result<bool, CapabilityError> {
    let deadline = tokio::time::Instant::now() + timeout;
    let mut polls = 0u32;

    loop {
        if is_logged_in(page).await? {
            return Ok(true);
        }

        polls += 1;
        on_poll(polls);

        if tokio::time::Instant::now() + poll_interval >= deadline {
            tracing::warn!(
                waited_secs = timeout.as_secs(),
                polls,
                "login was not completed before the deadline"
            );
            return Ok(false);
        }
        tokio::time::sleep(poll_interval).await;
    }
}
