use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Settings the gateway needs before it can talk to the admin API.
///
/// The remote credentials and the inbound API key are optional at load time:
/// the server still boots without them so `/health` can report what is
/// missing instead of the process refusing to start.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_key: Option<String>,
    pub shopify_store_domain: Option<String>,
    pub shopify_access_token: Option<String>,
    pub shopify_api_version: String,
    pub shopify_request_timeout_secs: u64,
    pub shopify_call_delay_ms: u64,
    pub shopify_bulk_item_delay_ms: u64,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: usize,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Names of the environment variables that must be set for the gateway
    /// to serve protected routes, in a stable order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("SHOPIFY_STORE_DOMAIN", self.shopify_store_domain.is_none()),
            ("SHOPIFY_ACCESS_TOKEN", self.shopify_access_token.is_none()),
            ("MCP_API_KEY", self.api_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("shopify_store_domain", &self.shopify_store_domain)
            .field(
                "shopify_access_token",
                &self.shopify_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("shopify_api_version", &self.shopify_api_version)
            .field(
                "shopify_request_timeout_secs",
                &self.shopify_request_timeout_secs,
            )
            .field("shopify_call_delay_ms", &self.shopify_call_delay_ms)
            .field(
                "shopify_bulk_item_delay_ms",
                &self.shopify_bulk_item_delay_ms,
            )
            .field("rate_limit_window_ms", &self.rate_limit_window_ms)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("allowed_origins", &self.allowed_origins)
            .finish()
    }
}
