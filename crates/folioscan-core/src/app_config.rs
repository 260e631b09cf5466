/// Configuration for the extraction engine, loaded from `FOLIOSCAN_*`
/// environment variables by [`crate::config::load_extractor_config`].
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Origin of the brokerage portal, e.g. `https://portal.example.com`.
    /// No trailing slash.
    pub portal_base_url: String,
    /// Path of the login page, joined to `portal_base_url`.
    pub login_path: String,
    /// Candidate holdings-page paths, tried in order after login.
    pub holdings_paths: Vec<String>,
    /// Interactive login needs a visible browser; headless is for tests.
    pub headless: bool,
    /// Upper bound on waiting for the user to complete login.
    pub login_timeout_secs: u64,
    /// Interval between login-state probes.
    pub login_poll_interval_secs: u64,
    /// Per-URL navigation timeout while hunting for the holdings page.
    pub navigation_timeout_secs: u64,
    /// Settle time after a navigation before probing the page, for
    /// client-side rendering to finish.
    pub render_settle_ms: u64,
}

impl ExtractorConfig {
    /// Full URL of the login page.
    #[must_use]
    pub fn login_url(&self) -> String {
        join_url(&self.portal_base_url, &self.login_path)
    }

    /// Full URLs of the holdings-page candidates, in configured order.
    #[must_use]
    pub fn holdings_urls(&self) -> Vec<String> {
        self.holdings_paths
            .iter()
            .map(|path| join_url(&self.portal_base_url, path))
            .collect()
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
