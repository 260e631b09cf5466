use thiserror::Error;

/// Terminal failure reasons for an extraction session.
///
/// Every variant carries a display message suitable for showing to the user
/// directly; no raw automation-capability error crosses this boundary.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The browser-automation capability is missing, misconfigured, or
    /// failed mid-session. Fatal; retrying without operator intervention
    /// will not help.
    #[error("browser automation unavailable: {reason}")]
    CapabilityUnavailable { reason: String },

    /// The user did not complete the interactive login within the configured
    /// window. The caller may offer a retry.
    #[error("login was not completed within {waited_secs}s")]
    LoginTimeout { waited_secs: u64 },

    /// Every candidate holdings URL was tried and none yielded
    /// holdings-bearing markup. Retryable; may indicate a site change.
    #[error("could not reach a holdings page (tried {})", attempted_urls.join(", "))]
    HoldingsPageUnreachable { attempted_urls: Vec<String> },
}

impl ExtractionError {
    /// Wraps a capability failure with the phase it occurred in.
    pub(crate) fn capability(phase: &str, source: impl std::fmt::Display) -> Self {
        ExtractionError::CapabilityUnavailable {
            reason: format!("{source} (during {phase})"),
        }
    }
}
