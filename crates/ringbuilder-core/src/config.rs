use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("RINGBUILDER_ENV", "development"))?;

    let bind_addr = parse_addr("RINGBUILDER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("RINGBUILDER_LOG_LEVEL", "info");
    let settings_path = PathBuf::from(or_default(
        "RINGBUILDER_SETTINGS_PATH",
        "./config/builder.yaml",
    ));
    let catalog_path = PathBuf::from(or_default(
        "RINGBUILDER_CATALOG_PATH",
        "./config/catalog.json",
    ));
    let storefront_url = lookup("RINGBUILDER_STOREFRONT_URL")
        .ok()
        .filter(|s| !s.trim().is_empty());
    let storefront_token = lookup("RINGBUILDER_STOREFRONT_TOKEN")
        .ok()
        .filter(|s| !s.trim().is_empty());

    let page_size = or_default("RINGBUILDER_PAGE_SIZE", "24")
        .parse::<usize>()
        .map_err(|e| invalid("RINGBUILDER_PAGE_SIZE", e.to_string()))?;
    if page_size == 0 {
        return Err(invalid(
            "RINGBUILDER_PAGE_SIZE",
            "page size must be at least 1".to_string(),
        ));
    }

    let request_timeout_secs = parse_u64("RINGBUILDER_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("RINGBUILDER_USER_AGENT", "ringbuilder/0.1");
    let max_retries = parse_u32("RINGBUILDER_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("RINGBUILDER_RETRY_BACKOFF_BASE_SECS", "1")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        settings_path,
        catalog_path,
        storefront_url,
        storefront_token,
        page_size,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RINGBUILDER_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
