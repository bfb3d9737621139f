mod collections;
mod health;
mod products;
mod sync;

use std::{sync::Arc, time::Duration, time::Instant};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, FromRequest, FromRequestParts, Query, Request,
    },
    http::{header, request::Parts, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use shopmcp_admin::{AdminClient, AdminError};
use shopmcp_core::{validate_into, AppConfig, Validated, ValidationError};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
};

use crate::middleware::{
    enforce_rate_limit, log_request, request_id, require_api_key, AuthState, RateLimitState,
};

/// Request bodies above this size are rejected before validation.
const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

const AVAILABLE_ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /products",
    "GET /products/:id",
    "PUT /products/:id/tags",
    "GET /products/:id/metafields",
    "POST /products/:id/metafields",
    "GET /collections",
    "POST /collections",
    "GET /collections/:id",
    "POST /sync/products/metafield",
];

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// `None` when the store domain or access token is not configured.
    pub admin: Option<Arc<AdminClient>>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(config: Arc<AppConfig>, admin: Option<AdminClient>) -> Self {
        Self {
            config,
            admin: admin.map(Arc::new),
            started_at: Instant::now(),
        }
    }

    /// The admin client, or a 503 naming the missing credentials.
    pub(super) fn admin(&self) -> Result<&AdminClient, ApiError> {
        self.admin.as_deref().ok_or_else(|| {
            let missing: Vec<&str> = self
                .config
                .missing_required()
                .into_iter()
                .filter(|name| name.starts_with("SHOPIFY_"))
                .collect();
            ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service Unavailable",
                format!(
                    "Admin API credentials are not configured: {}",
                    missing.join(", ")
                ),
            )
        })
    }

    /// Maps a remote failure using this deployment's redaction policy.
    pub(super) fn admin_error(
        &self,
        error: &AdminError,
        resource: Resource,
        action: &str,
    ) -> ApiError {
        ApiError::from_admin(error, resource, action, self.config.is_production())
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

/// Remote entity a handler was working on, used to word 404s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Resource {
    Product,
    Collection,
}

impl Resource {
    fn label(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Collection => "Collection",
        }
    }

    fn noun(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Collection => "collection",
        }
    }
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                error: error.into(),
                message: message.into(),
                field: None,
            },
        }
    }

    #[must_use]
    pub fn validation(error: ValidationError) -> Self {
        let mut api_error = Self::new(StatusCode::BAD_REQUEST, "Validation Error", error.message);
        api_error.body.field = error.field;
        api_error
    }

    pub(super) fn not_found(resource: Resource) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{} not found", resource.label()),
            format!("The specified {} was not found", resource.noun()),
        )
    }

    /// Terminal mapping for every remote failure.
    pub(super) fn from_admin(
        error: &AdminError,
        resource: Resource,
        action: &str,
        production: bool,
    ) -> Self {
        if error.is_not_found() {
            return Self::not_found(resource);
        }
        if error.is_rate_limited() {
            return Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate Limited",
                "Too many requests to Shopify API. Please try again later.",
            );
        }

        let message = if production {
            "An unexpected error occurred".to_owned()
        } else {
            error.to_string()
        };
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to {action}"),
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// JSON body that passed its [`Validated::SCHEMA`] and was deserialized.
///
/// Rejections use the standard error envelope instead of axum's plain text.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: Validated,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(reject_json)?;

        validate_into::<T>(body).map(ValidJson).map_err(|e| {
            tracing::warn!(
                schema = e.schema,
                field = e.field.as_deref().unwrap_or("-"),
                message = %e.message,
                "validation error"
            );
            ApiError::validation(e)
        })
    }
}

fn reject_json(rejection: JsonRejection) -> ApiError {
    let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };
    ApiError::new(status, "Validation Error", rejection.body_text())
}

/// Query string extractor whose rejections use the standard error envelope.
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(reject_query)?;
        Ok(Self(query))
    }
}

fn reject_query(rejection: QueryRejection) -> ApiError {
    tracing::warn!(message = %rejection.body_text(), "query string rejected");
    ApiError::new(StatusCode::BAD_REQUEST, "Validation Error", rejection.body_text())
}

/// Parses a `:id` path segment; only positive integers are accepted.
pub(super) fn parse_id(raw: &str) -> Result<u64, ApiError> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let mut err = ApiError::new(
                StatusCode::BAD_REQUEST,
                "Validation Error",
                "\"id\" must be a positive integer",
            );
            err.body.field = Some("id".to_owned());
            Err(err)
        }
    }
}

/// Product page size: missing, unparsable or zero means 250; otherwise 1..=250.
pub(super) fn normalize_limit(raw: Option<&str>) -> u32 {
    const MAX: i64 = 250;
    let requested = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n != 0)
        .unwrap_or(MAX);
    u32::try_from(requested.clamp(1, MAX)).unwrap_or(250)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let origin_values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(86_400));

    // Credentials cannot be combined with a wildcard origin.
    if origin_values.is_empty() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        layer
            .allow_origin(AllowOrigin::list(origin_values))
            .allow_credentials(true)
    }
}

fn protected_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        .route("/products/{id}/tags", put(products::update_product_tags))
        .route(
            "/products/{id}/metafields",
            get(products::get_product_metafields).post(products::set_product_metafield),
        )
        .route(
            "/collections",
            get(collections::list_collections).post(collections::create_collection),
        )
        .route("/collections/{id}", get(collections::get_collection))
        .route(
            "/sync/products/metafield",
            post(sync::update_products_by_keyword),
        )
        .route_layer(axum::middleware::from_fn_with_state(auth, require_api_key))
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/", get(health::directory));

    let cors = build_cors(&state.config.allowed_origins);

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(axum::middleware::from_fn(log_request))
                .layer(cors)
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("SAMEORIGIN"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::REFERRER_POLICY,
                    HeaderValue::from_static("no-referrer"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::STRICT_TRANSPORT_SECURITY,
                    HeaderValue::from_static("max-age=15552000; includeSubDomains"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-dns-prefetch-control"),
                    HeaderValue::from_static("off"),
                ))
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct NotFoundBody {
    success: bool,
    error: &'static str,
    message: String,
    available_endpoints: &'static [&'static str],
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundBody {
            success: false,
            error: "Not Found",
            message: format!("Route {method} {uri} not found"),
            available_endpoints: AVAILABLE_ENDPOINTS,
        }),
    )
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
