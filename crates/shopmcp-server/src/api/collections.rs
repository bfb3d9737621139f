use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use shopmcp_core::{Collection, NewSmartCollection};

use crate::middleware::RequestId;

use super::{parse_id, ApiError, ApiResponse, AppState, Resource, ValidJson};

#[derive(Debug, Serialize)]
pub(super) struct CollectionList {
    collections: Vec<Collection>,
    count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionData {
    collection: Collection,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionCreated {
    collection: Collection,
    message: String,
}

pub(super) async fn list_collections(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CollectionList>>, ApiError> {
    let admin = state.admin()?;

    let collections = admin
        .list_collections()
        .await
        .map_err(|e| state.admin_error(&e, Resource::Collection, "fetch collections"))?;

    tracing::info!(
        task = "get_collections",
        count = collections.len(),
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(CollectionList {
        count: collections.len(),
        collections,
    }))
}

pub(super) async fn create_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ValidJson(new): ValidJson<NewSmartCollection>,
) -> Result<(StatusCode, Json<ApiResponse<CollectionCreated>>), ApiError> {
    let admin = state.admin()?;

    let collection = admin
        .create_smart_collection(&new)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Collection, "create collection"))?;

    tracing::info!(
        task = "create_smart_collection",
        title = %new.title,
        rule_keywords = ?new.rule_keywords,
        collection_id = collection.id,
        request_id = %req_id.0,
        "task completed"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(CollectionCreated {
            collection,
            message: format!("Successfully created smart collection: {}", new.title),
        }),
    ))
}

/// The admin API is only asked for the full list; the id is matched locally.
pub(super) async fn get_collection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<CollectionData>>, ApiError> {
    let collection_id = parse_id(&raw_id)?;
    let admin = state.admin()?;

    let collection = admin
        .list_collections()
        .await
        .map_err(|e| state.admin_error(&e, Resource::Collection, "fetch collection"))?
        .into_iter()
        .find(|c| c.id == collection_id)
        .ok_or_else(|| ApiError::not_found(Resource::Collection))?;

    tracing::info!(task = "get_collection", collection_id, request_id = %req_id.0, "task completed");

    Ok(ApiResponse::ok(CollectionData { collection }))
}
