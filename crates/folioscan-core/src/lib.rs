pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::ExtractorConfig;
pub use config::{load_extractor_config, load_extractor_config_from_env};
pub use types::{
    HoldingRecord, PortfolioSnapshot, PortfolioSummary, ProgressUpdate, SessionPhase,
};

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
