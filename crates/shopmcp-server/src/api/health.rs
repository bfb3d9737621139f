use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct Unhealthy {
    status: &'static str,
    timestamp: DateTime<Utc>,
    error: &'static str,
    missing_variables: Vec<&'static str>,
    message: &'static str,
}

#[derive(Debug, Serialize)]
pub(super) struct Healthy {
    status: &'static str,
    timestamp: DateTime<Utc>,
    /// Seconds since the server started.
    uptime: f64,
    shopify_connection: bool,
    environment: String,
    store_domain: Option<String>,
}

/// Reports missing configuration without touching the remote, otherwise
/// probes `shop.json` and reports whether it answered.
pub(super) async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let missing = state.config.missing_required();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "health check: configuration incomplete");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Unhealthy {
                status: "unhealthy",
                timestamp: Utc::now(),
                error: "Missing environment variables",
                missing_variables: missing,
                message: "Set the missing environment variables and restart the gateway",
            }),
        )
            .into_response();
    }

    let shopify_connection = match state.admin.as_deref() {
        Some(admin) => admin.test_connection().await.success,
        None => false,
    };

    (
        StatusCode::OK,
        Json(Healthy {
            status: "healthy",
            timestamp: Utc::now(),
            uptime: state.started_at.elapsed().as_secs_f64(),
            shopify_connection,
            environment: state.config.env.to_string(),
            store_domain: state.config.shopify_store_domain.clone(),
        }),
    )
        .into_response()
}

/// Static endpoint directory served at `/`.
pub(super) async fn directory() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Gateway for a store's admin API: products, tags, metafields and smart collections",
        "endpoints": {
            "health": "GET /health",
            "products": {
                "list": "GET /products",
                "single": "GET /products/:id",
                "update_tags": "PUT /products/:id/tags",
                "metafields": "GET /products/:id/metafields",
                "update_metafield": "POST /products/:id/metafields"
            },
            "collections": {
                "list": "GET /collections",
                "create": "POST /collections",
                "single": "GET /collections/:id"
            },
            "sync": {
                "bulk_metafield": "POST /sync/products/metafield?keyword=K"
            }
        },
        "authentication": "Every endpoint except GET /health and GET / requires an X-API-Key header or Authorization: Bearer <key>"
    }))
}
