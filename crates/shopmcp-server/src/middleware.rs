use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, header::USER_AGENT, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shopmcp_core::AppConfig;
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Shared-secret auth settings used by middleware.
///
/// With no key configured every protected request is rejected.
#[derive(Clone)]
pub struct AuthState {
    api_key: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl AuthState {
    #[must_use]
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.map(Arc::from),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("MCP_API_KEY not set; all protected routes will answer 401");
        }
        Self::new(config.api_key.as_deref())
    }

    fn allows(&self, presented: &str) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|expected| bool::from(expected.as_bytes().ct_eq(presented.as_bytes())))
    }
}

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    clients: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            Duration::from_millis(config.rate_limit_window_ms),
        )
    }

    /// Counts one request for `client`; `false` once the window's budget is spent.
    async fn admit(&self, client: &str) -> bool {
        let mut clients = self.clients.lock().await;
        let now = Instant::now();

        if !clients.contains_key(client) {
            clients.retain(|_, w| now.duration_since(w.started_at) < self.window);
        }

        let window = clients
            .entry(client.to_owned())
            .or_insert(RateLimitWindow {
                started_at: now,
                count: 0,
            });

        if now.duration_since(window.started_at) >= self.window {
            window.started_at = now;
            window.count = 0;
        }

        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Error envelope shared by every middleware rejection.
#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    success: bool,
    error: &'static str,
    message: &'static str,
}

impl MiddlewareErrorBody {
    fn response(status: StatusCode, error: &'static str, message: &'static str) -> Response {
        (
            status,
            Json(Self {
                success: false,
                error,
                message,
            }),
        )
            .into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Emits one log line per request once the response is ready.
pub async fn log_request(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let ip = client_ip(&req);
    let user_agent = user_agent(req.headers()).to_owned();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();

    let res = next.run(req).await;

    tracing::info!(
        method = %method,
        path,
        status = res.status().as_u16(),
        duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        request_id,
        ip,
        user_agent,
        "request processed"
    );

    res
}

/// Middleware enforcing the shared API key.
///
/// Accepts `X-API-Key`, or `Authorization: Bearer <key>` when that header is absent.
pub async fn require_api_key(State(auth): State<AuthState>, req: Request, next: Next) -> Response {
    let presented = extract_api_key(req.headers());

    match presented {
        Some(key) if auth.allows(key) => next.run(req).await,
        _ => {
            tracing::warn!(
                ip = %client_ip(&req),
                user_agent = %user_agent(req.headers()),
                path = %req.uri().path(),
                "unauthorized access attempt"
            );
            MiddlewareErrorBody::response(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Invalid or missing API key",
            )
        }
    }
}

/// Middleware enforcing a fixed request-per-window limit per client address.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let client = client_ip(&req);

    if !rate_limit.admit(&client).await {
        tracing::warn!(ip = %client, path = %req.uri().path(), "inbound rate limit exceeded");
        return MiddlewareErrorBody::response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests",
            "Rate limit exceeded. Please try again later.",
        );
    }

    next.run(req).await
}

/// `x-api-key` wins when present and non-empty; otherwise the bearer token.
fn extract_api_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .or_else(|| extract_bearer_token(headers.get(AUTHORIZATION)))
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}

/// First `x-forwarded-for` hop, else the socket peer, else `"unknown"`.
fn client_ip(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(ip) = forwarded {
        return ip.to_owned();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_owned(), |info| info.0.ip().to_string())
}

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}
