use crate::app_config::ExtractorConfig;
use crate::ConfigError;

/// Load extractor configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_extractor_config() -> Result<ExtractorConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_extractor_config_from_env()
}

/// Load extractor configuration from environment variables already in the
/// process.
///
/// Unlike [`load_extractor_config`], this does NOT load `.env` files — useful
/// for testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_extractor_config_from_env() -> Result<ExtractorConfig, ConfigError> {
    build_extractor_config(|key| std::env::var(key))
}

/// Build extractor configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_extractor_config<F>(lookup: F) -> Result<ExtractorConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected true/false, got \"{other}\""),
            }),
        }
    };

    let portal_base_url = require("FOLIOSCAN_PORTAL_BASE_URL")?;
    if !portal_base_url.starts_with("http://") && !portal_base_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOLIOSCAN_PORTAL_BASE_URL".to_string(),
            reason: format!("\"{portal_base_url}\" is not an http(s) origin"),
        });
    }

    let login_path = or_default("FOLIOSCAN_LOGIN_PATH", "/login");
    let holdings_paths = or_default(
        "FOLIOSCAN_HOLDINGS_PATHS",
        "/stocks/user/holdings,/holdings,/portfolio,/dashboard/investments",
    )
    .split(',')
    .map(|p| p.trim().to_string())
    .filter(|p| !p.is_empty())
    .collect::<Vec<_>>();

    if holdings_paths.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOLIOSCAN_HOLDINGS_PATHS".to_string(),
            reason: "at least one holdings path is required".to_string(),
        });
    }

    let headless = parse_bool("FOLIOSCAN_HEADLESS", "false")?;
    let login_timeout_secs = parse_u64("FOLIOSCAN_LOGIN_TIMEOUT_SECS", "600")?;
    let login_poll_interval_secs = parse_u64("FOLIOSCAN_LOGIN_POLL_INTERVAL_SECS", "5")?;
    let navigation_timeout_secs = parse_u64("FOLIOSCAN_NAVIGATION_TIMEOUT_SECS", "20")?;
    let render_settle_ms = parse_u64("FOLIOSCAN_RENDER_SETTLE_MS", "1500")?;

    if login_poll_interval_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "FOLIOSCAN_LOGIN_POLL_INTERVAL_SECS".to_string(),
            reason: "poll interval must be at least 1 second".to_string(),
        });
    }

    Ok(ExtractorConfig {
        portal_base_url,
        login_path,
        holdings_paths,
        headless,
        login_timeout_secs,
        login_poll_interval_secs,
        navigation_timeout_secs,
        render_settle_ms,
    })
}
