use super::*;

fn test_client(base_url: &str) -> AdminClient {
    AdminClient::with_base_url(base_url, "shpat_test", 30, Throttle::disabled())
        .expect("client construction should not fail")
}

fn test_config() -> AppConfig {
    AppConfig {
        env: shopmcp_core::Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_owned(),
        api_key: None,
        shopify_store_domain: None,
        shopify_access_token: None,
        shopify_api_version: "2024-01".to_owned(),
        shopify_request_timeout_secs: 30,
        shopify_call_delay_ms: 500,
        shopify_bulk_item_delay_ms: 1000,
        rate_limit_window_ms: 900_000,
        rate_limit_max_requests: 100,
        allowed_origins: Vec::new(),
    }
}

#[test]
fn new_builds_versioned_admin_base() {
    let client = AdminClient::new(
        "kraftokase.myshopify.com",
        "shpat_test",
        "2024-01",
        30,
        Throttle::disabled(),
    )
    .expect("client");
    assert_eq!(
        client.endpoint("products.json").expect("url").as_str(),
        "https://kraftokase.myshopify.com/admin/api/2024-01/products.json"
    );
}

#[test]
fn endpoint_keeps_version_segment_without_trailing_slash() {
    let client = test_client("https://shop.example/admin/api/2024-01");
    let url = client.endpoint("products/42/metafields.json").expect("url");
    assert_eq!(
        url.as_str(),
        "https://shop.example/admin/api/2024-01/products/42/metafields.json"
    );
}

#[test]
fn endpoint_collapses_duplicate_slashes() {
    let client = test_client("https://shop.example/admin/api/2024-01//");
    let url = client.endpoint("/shop.json").expect("url");
    assert_eq!(url.as_str(), "https://shop.example/admin/api/2024-01/shop.json");
}

#[test]
fn rejects_unparseable_base_url() {
    let err = AdminClient::with_base_url("not a url", "t", 30, Throttle::disabled()).unwrap_err();
    assert!(matches!(err, AdminError::InvalidBaseUrl { .. }), "got {err:?}");
}

#[test]
fn rejects_token_with_newline() {
    let err = AdminClient::with_base_url("https://shop.example", "bad\ntoken", 30, Throttle::disabled())
        .unwrap_err();
    assert!(matches!(err, AdminError::InvalidAccessToken), "got {err:?}");
}

#[test]
fn from_config_is_none_without_credentials() {
    let mut config = test_config();
    config.shopify_store_domain = None;
    assert!(AdminClient::from_config(&config).expect("no error").is_none());
}

#[test]
fn from_config_uses_configured_throttle() {
    let mut config = test_config();
    config.shopify_store_domain = Some("shop.example".to_owned());
    config.shopify_access_token = Some("shpat_test".to_owned());
    config.shopify_call_delay_ms = 7;
    config.shopify_bulk_item_delay_ms = 11;

    let client = AdminClient::from_config(&config)
        .expect("no error")
        .expect("configured");
    assert_eq!(client.throttle().call_delay(), Duration::from_millis(7));
    assert_eq!(client.throttle().bulk_item_delay(), Duration::from_millis(11));
}
