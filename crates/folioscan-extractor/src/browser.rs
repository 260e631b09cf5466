//! The browser-automation capability boundary.
//!
//! The engine drives a real browser but does not implement one: the embedding
//! application supplies these traits (backed by CDP, `WebDriver`, or anything
//! that can navigate, evaluate script in-page, and wait for selectors). Tests
//! supply scripted fakes.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the automation capability.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("automation capability unavailable: {0}")]
    Unavailable(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("in-page evaluation failed: {0}")]
    Evaluation(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Launches isolated browser instances, one per extraction session.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, headless: bool) -> Result<Box<dyn Browser>, CapabilityError>;
}

/// One live browser owned by a single session.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn new_page(&self) -> Result<Box<dyn Page>, CapabilityError>;

    /// Releases the browser. Must be safe to call exactly once.
    async fn close(&self) -> Result<(), CapabilityError>;
}

/// One browser tab/page.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigates and waits for the load to settle, bounded by `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CapabilityError>;

    /// Runs `script` inside the page's rendering context and returns its
    /// JSON-serializable result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, CapabilityError>;

    /// Waits until `selector` matches an element, bounded by `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<(), CapabilityError>;

    /// The page's current URL.
    async fn current_url(&self) -> Result<String, CapabilityError>;
}
