use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopmcp_admin::{BulkUpdateReport, DEFAULT_BATCH_SIZE};
use shopmcp_core::MetafieldInput;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, Resource, ValidJson, ValidQuery};

#[derive(Debug, Deserialize)]
pub(super) struct SyncQuery {
    pub keyword: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncResult {
    #[serde(flatten)]
    report: BulkUpdateReport,
    message: String,
}

/// Sets one metafield on every product whose title contains `keyword`.
///
/// Runs to completion inside the request; items are processed one at a time.
pub(super) async fn update_products_by_keyword(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ValidQuery(query): ValidQuery<SyncQuery>,
    ValidJson(input): ValidJson<MetafieldInput>,
) -> Result<Json<ApiResponse<SyncResult>>, ApiError> {
    let Some(keyword) = query
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
    else {
        let mut err = ApiError::new(
            StatusCode::BAD_REQUEST,
            "Missing keyword",
            "Keyword parameter is required for bulk metafield updates",
        );
        err.body.field = Some("keyword".to_owned());
        return Err(err);
    };

    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .map_or(DEFAULT_BATCH_SIZE, |n| n.min(DEFAULT_BATCH_SIZE));

    let admin = state.admin()?;
    let report = admin
        .update_products_by_keyword(keyword, &input, Some(limit))
        .await
        .map_err(|e| {
            state.admin_error(&e, Resource::Product, "perform bulk metafield update")
        })?;

    tracing::info!(
        task = "bulk_metafield_update",
        keyword,
        namespace = %input.namespace,
        key = %input.key,
        total_products = report.total_products,
        successful_updates = report.succeeded(),
        failed_updates = report.failed(),
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(SyncResult {
        message: format!("Bulk metafield update completed for keyword: {keyword}"),
        report,
    }))
}
