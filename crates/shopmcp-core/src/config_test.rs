use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with the remote credentials and API key populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("SHOPIFY_STORE_DOMAIN", "example.myshopify.com");
    m.insert("SHOPIFY_ACCESS_TOKEN", "shpat_test");
    m.insert("MCP_API_KEY", "secret-key");
    m
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(parse_environment("development"), Environment::Development);
    assert_eq!(parse_environment("test"), Environment::Test);
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("empty env should load");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.api_key.is_none());
    assert!(cfg.shopify_store_domain.is_none());
    assert_eq!(cfg.shopify_api_version, "2024-01");
    assert_eq!(cfg.shopify_request_timeout_secs, 30);
    assert_eq!(cfg.shopify_call_delay_ms, 500);
    assert_eq!(cfg.shopify_bulk_item_delay_ms, 1000);
    assert_eq!(cfg.rate_limit_window_ms, 900_000);
    assert_eq!(cfg.rate_limit_max_requests, 100);
    assert!(cfg.allowed_origins.is_empty());
}

#[test]
fn missing_required_lists_every_unset_name_in_order() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.missing_required(),
        vec!["SHOPIFY_STORE_DOMAIN", "SHOPIFY_ACCESS_TOKEN", "MCP_API_KEY"]
    );
}

#[test]
fn missing_required_is_empty_when_configured() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.missing_required().is_empty());
}

#[test]
fn blank_values_count_as_missing() {
    let mut map = full_env();
    map.insert("SHOPIFY_ACCESS_TOKEN", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.missing_required(), vec!["SHOPIFY_ACCESS_TOKEN"]);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("MCP_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MCP_BIND_ADDR"),
        "expected InvalidEnvVar(MCP_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn call_delay_override() {
    let mut map = full_env();
    map.insert("SHOPIFY_CALL_DELAY_MS", "0");
    map.insert("SHOPIFY_BULK_ITEM_DELAY_MS", "250");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.shopify_call_delay_ms, 0);
    assert_eq!(cfg.shopify_bulk_item_delay_ms, 250);
}

#[test]
fn call_delay_invalid() {
    let mut map = full_env();
    map.insert("SHOPIFY_CALL_DELAY_MS", "half a second");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SHOPIFY_CALL_DELAY_MS"),
        "expected InvalidEnvVar(SHOPIFY_CALL_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn rate_limit_max_requests_invalid() {
    let mut map = full_env();
    map.insert("RATE_LIMIT_MAX_REQUESTS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATE_LIMIT_MAX_REQUESTS"),
        "expected InvalidEnvVar(RATE_LIMIT_MAX_REQUESTS), got: {result:?}"
    );
}

#[test]
fn zero_rate_limit_window_is_rejected() {
    let mut map = full_env();
    map.insert("RATE_LIMIT_WINDOW_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "RATE_LIMIT_WINDOW_MS"),
        "expected InvalidEnvVar(RATE_LIMIT_WINDOW_MS), got: {result:?}"
    );
}

#[test]
fn allowed_origins_are_split_and_wildcard_dropped() {
    let mut map = full_env();
    map.insert(
        "ALLOWED_ORIGINS",
        "https://shop.example.com, https://admin.example.com,*,",
    );
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.allowed_origins,
        vec!["https://shop.example.com", "https://admin.example.com"]
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("shpat_test"));
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("example.myshopify.com"));
}

#[test]
fn production_flag() {
    let mut map = full_env();
    map.insert("MCP_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.is_production());
}
