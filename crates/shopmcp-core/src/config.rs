use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
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
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Blank values count as unset; hosting dashboards often leave them empty.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("MCP_ENV", "development"));
    let bind_addr = parse_addr("MCP_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LOG_LEVEL", "info");
    let api_key = optional("MCP_API_KEY");

    let shopify_store_domain = optional("SHOPIFY_STORE_DOMAIN");
    let shopify_access_token = optional("SHOPIFY_ACCESS_TOKEN");
    let shopify_api_version = or_default("SHOPIFY_API_VERSION", "2024-01");
    let shopify_request_timeout_secs = parse_u64("SHOPIFY_REQUEST_TIMEOUT_SECS", "30")?;
    let shopify_call_delay_ms = parse_u64("SHOPIFY_CALL_DELAY_MS", "500")?;
    let shopify_bulk_item_delay_ms = parse_u64("SHOPIFY_BULK_ITEM_DELAY_MS", "1000")?;

    let rate_limit_window_ms = parse_u64("RATE_LIMIT_WINDOW_MS", "900000")?;
    let rate_limit_max_requests = parse_usize("RATE_LIMIT_MAX_REQUESTS", "100")?;
    if rate_limit_window_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RATE_LIMIT_WINDOW_MS".to_string(),
            reason: "window must be greater than zero".to_string(),
        });
    }

    let allowed_origins = optional("ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty() && *s != "*")
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        api_key,
        shopify_store_domain,
        shopify_access_token,
        shopify_api_version,
        shopify_request_timeout_secs,
        shopify_call_delay_ms,
        shopify_bulk_item_delay_ms,
        rate_limit_window_ms,
        rate_limit_max_requests,
        allowed_origins,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
