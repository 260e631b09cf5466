pub mod browser;
pub mod error;
pub mod fragment;
pub mod navigate;
pub mod numeric;
pub mod orchestrator;
pub mod page;
pub mod progress;
pub mod session;
pub mod strategy;

pub use browser::{Browser, BrowserLauncher, CapabilityError, Page};
pub use error::ExtractionError;
pub use orchestrator::ExtractionOrchestrator;
pub use progress::{ProgressCallback, ProgressReporter};
