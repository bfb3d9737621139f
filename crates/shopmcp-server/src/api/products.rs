use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use shopmcp_core::{Metafield, MetafieldInput, Product, UpdateTagsRequest};

use crate::middleware::RequestId;

use super::{
    normalize_limit, parse_id, ApiError, ApiResponse, AppState, Resource, ValidJson, ValidQuery,
};

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    /// Kept as text so a malformed value falls back to the default instead of a 400.
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductList {
    products: Vec<Product>,
    count: usize,
    limit: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductData {
    product: Product,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductUpdated {
    product: Product,
    message: String,
}

#[derive(Debug, Serialize)]
pub(super) struct MetafieldList {
    metafields: Vec<Metafield>,
    count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct MetafieldUpdated {
    metafield: Metafield,
    message: String,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    ValidQuery(query): ValidQuery<ProductQuery>,
) -> Result<Json<ApiResponse<ProductList>>, ApiError> {
    let admin = state.admin()?;
    let limit = normalize_limit(query.limit.as_deref());

    let products = admin
        .list_products(limit)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Product, "fetch products"))?;

    tracing::info!(
        task = "get_products",
        limit,
        count = products.len(),
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(ProductList {
        count: products.len(),
        products,
        limit,
    }))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<ProductData>>, ApiError> {
    let product_id = parse_id(&raw_id)?;
    let admin = state.admin()?;

    let product = admin
        .get_product(product_id)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Product, "fetch product"))?;

    tracing::info!(task = "get_product", product_id, request_id = %req_id.0, "task completed");

    Ok(ApiResponse::ok(ProductData { product }))
}

pub(super) async fn update_product_tags(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    ValidJson(body): ValidJson<UpdateTagsRequest>,
) -> Result<Json<ApiResponse<ProductUpdated>>, ApiError> {
    let product_id = parse_id(&raw_id)?;
    let admin = state.admin()?;

    let product = admin
        .update_product_tags(product_id, &body.tags)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Product, "update product tags"))?;

    tracing::info!(
        task = "update_product_tags",
        product_id,
        tags = ?body.tags,
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(ProductUpdated {
        product,
        message: format!("Successfully updated tags for product {product_id}"),
    }))
}

pub(super) async fn get_product_metafields(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<MetafieldList>>, ApiError> {
    let product_id = parse_id(&raw_id)?;
    let admin = state.admin()?;

    let metafields = admin
        .get_product_metafields(product_id)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Product, "fetch product metafields"))?;

    tracing::info!(
        task = "get_product_metafields",
        product_id,
        count = metafields.len(),
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(MetafieldList {
        count: metafields.len(),
        metafields,
    }))
}

pub(super) async fn set_product_metafield(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(raw_id): Path<String>,
    ValidJson(input): ValidJson<MetafieldInput>,
) -> Result<Json<ApiResponse<MetafieldUpdated>>, ApiError> {
    let product_id = parse_id(&raw_id)?;
    let admin = state.admin()?;

    let metafield = admin
        .set_product_metafield(product_id, &input)
        .await
        .map_err(|e| state.admin_error(&e, Resource::Product, "update product metafield"))?;

    tracing::info!(
        task = "update_product_metafield",
        product_id,
        namespace = %input.namespace,
        key = %input.key,
        metafield_type = %input.metafield_type,
        request_id = %req_id.0,
        "task completed"
    );

    Ok(ApiResponse::ok(MetafieldUpdated {
        metafield,
        message: format!(
            "Successfully updated metafield {}.{} for product {product_id}",
            input.namespace, input.key
        ),
    }))
}
