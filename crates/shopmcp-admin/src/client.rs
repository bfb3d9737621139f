//! HTTP client for the store's admin REST API.
//!
//! Wraps `reqwest` with the access-token header, a versioned base path,
//! request/response logging, and the fixed post-call [`Throttle`]. Failures
//! are returned as-is: no retries, no transient/permanent distinction.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use shopmcp_core::{
    join_tags, smart_collection_rules, AppConfig, Collection, Metafield, MetafieldInput,
    NewSmartCollection, Product,
};

use crate::error::AdminError;
use crate::throttle::Throttle;
use crate::types::{
    CollectionEnvelope, CollectionsEnvelope, ConnectionStatus, MetafieldCreate,
    MetafieldEnvelope, MetafieldsEnvelope, ProductEnvelope, ProductTagsPayload,
    ProductTagsUpdate, ProductsEnvelope, ShopEnvelope, SmartCollectionCreate,
    SmartCollectionPayload,
};

const ACCESS_TOKEN_HEADER: &str = "x-shopify-access-token";

/// Fields requested when listing products; keeps list payloads small.
const PRODUCT_LIST_FIELDS: &str =
    "id,title,handle,tags,images,vendor,product_type,created_at,updated_at";

/// Client for the admin REST API of a single store.
///
/// Use [`AdminClient::new`] for a real store or [`AdminClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: Url,
    throttle: Throttle,
}

impl AdminClient {
    /// Creates a client for `https://{store_domain}/admin/api/{api_version}`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidBaseUrl`] if the domain does not form a
    /// valid URL, [`AdminError::InvalidAccessToken`] if the token cannot be
    /// sent as a header, or [`AdminError::Http`] if the `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        store_domain: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        throttle: Throttle,
    ) -> Result<Self, AdminError> {
        let base_url = format!("https://{store_domain}/admin/api/{api_version}");
        Self::with_base_url(&base_url, access_token, timeout_secs, throttle)
    }

    /// Builds a client from application config.
    ///
    /// Returns `Ok(None)` when the store domain or access token is not
    /// configured, so callers can still serve health and docs routes.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, AdminError> {
        let (Some(domain), Some(token)) = (
            config.shopify_store_domain.as_deref(),
            config.shopify_access_token.as_deref(),
        ) else {
            return Ok(None);
        };

        Self::new(
            domain,
            token,
            &config.shopify_api_version,
            config.shopify_request_timeout_secs,
            Throttle::from_config(config),
        )
        .map(Some)
    }

    /// Creates a client rooted at an arbitrary base URL.
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::new`].
    pub fn with_base_url(
        base_url: &str,
        access_token: &str,
        timeout_secs: u64,
        throttle: Throttle,
    ) -> Result<Self, AdminError> {
        // Exactly one trailing slash, so `Url::join` appends instead of
        // replacing the version segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| AdminError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let mut token =
            HeaderValue::from_str(access_token).map_err(|_| AdminError::InvalidAccessToken)?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, token);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            throttle,
        })
    }

    #[must_use]
    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    /// Lists up to `limit` products with the summary field set.
    ///
    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn list_products(&self, limit: u32) -> Result<Vec<Product>, AdminError> {
        let query = [
            ("limit", limit.to_string()),
            ("fields", PRODUCT_LIST_FIELDS.to_owned()),
        ];
        let envelope: ProductsEnvelope = self
            .send(Method::GET, "products.json", &query, None::<&()>)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "error fetching products"))?;
        Ok(envelope.products)
    }

    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged. A missing product
    /// surfaces as a 404 [`AdminError::Status`].
    pub async fn get_product(&self, product_id: u64) -> Result<Product, AdminError> {
        let path = format!("products/{product_id}.json");
        let envelope: ProductEnvelope = self
            .send(Method::GET, &path, &[], None::<&()>)
            .await
            .inspect_err(|e| tracing::error!(product_id, error = %e, "error fetching product"))?;
        Ok(envelope.product)
    }

    /// Replaces a product's tags. The list is sent as one `", "`-joined string.
    ///
    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn update_product_tags(
        &self,
        product_id: u64,
        tags: &[String],
    ) -> Result<Product, AdminError> {
        let joined = join_tags(tags);
        let path = format!("products/{product_id}.json");
        let body = ProductTagsUpdate {
            product: ProductTagsPayload {
                id: product_id,
                tags: &joined,
            },
        };

        let envelope: ProductEnvelope = self
            .send(Method::PUT, &path, &[], Some(&body))
            .await
            .inspect_err(|e| {
                tracing::error!(product_id, error = %e, "error updating product tags");
            })?;

        tracing::info!(product_id, tags = %joined, "updated product tags");
        Ok(envelope.product)
    }

    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn list_collections(&self) -> Result<Vec<Collection>, AdminError> {
        let envelope: CollectionsEnvelope = self
            .send(Method::GET, "collections.json", &[], None::<&()>)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "error fetching collections"))?;
        Ok(envelope.collections)
    }

    /// Creates a published smart collection with one `tag equals` rule per keyword.
    ///
    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn create_smart_collection(
        &self,
        new: &NewSmartCollection,
    ) -> Result<Collection, AdminError> {
        let body = SmartCollectionCreate {
            collection: SmartCollectionPayload {
                title: &new.title,
                body_html: new.description.as_deref().unwrap_or_default(),
                collection_type: "smart",
                rules: smart_collection_rules(&new.rule_keywords),
                published: true,
            },
        };

        let envelope: CollectionEnvelope = self
            .send(Method::POST, "collections.json", &[], Some(&body))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "error creating smart collection"))?;

        tracing::info!(title = %new.title, collection_id = envelope.collection.id, "created smart collection");
        Ok(envelope.collection)
    }

    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn get_product_metafields(
        &self,
        product_id: u64,
    ) -> Result<Vec<Metafield>, AdminError> {
        let path = format!("products/{product_id}/metafields.json");
        let envelope: MetafieldsEnvelope = self
            .send(Method::GET, &path, &[], None::<&()>)
            .await
            .inspect_err(|e| {
                tracing::error!(product_id, error = %e, "error fetching product metafields");
            })?;
        Ok(envelope.metafields)
    }

    /// Creates or updates a product metafield.
    ///
    /// # Errors
    ///
    /// Any [`AdminError`] from the request, unchanged.
    pub async fn set_product_metafield(
        &self,
        product_id: u64,
        input: &MetafieldInput,
    ) -> Result<Metafield, AdminError> {
        let path = format!("products/{product_id}/metafields.json");
        let body = MetafieldCreate { metafield: input };

        let envelope: MetafieldEnvelope = self
            .send(Method::POST, &path, &[], Some(&body))
            .await
            .inspect_err(|e| {
                tracing::error!(product_id, error = %e, "error updating product metafield");
            })?;

        tracing::info!(
            product_id,
            namespace = %input.namespace,
            key = %input.key,
            value = %input.value,
            "updated product metafield"
        );
        Ok(envelope.metafield)
    }

    /// Probes `shop.json`. Never fails: errors are folded into the status.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self
            .send::<ShopEnvelope, ()>(Method::GET, "shop.json", &[], None)
            .await
        {
            Ok(envelope) => ConnectionStatus {
                success: true,
                shop: Some(envelope.shop),
                error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "connection test failed");
                ConnectionStatus {
                    success: false,
                    shop: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Resolves `path` against the versioned base URL.
    fn endpoint(&self, path: &str) -> Result<Url, AdminError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AdminError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends one request, logs both ends, and waits the post-call delay on success.
    ///
    /// # Errors
    ///
    /// - [`AdminError::Http`] on network failure or timeout.
    /// - [`AdminError::Status`] for any non-2xx response.
    /// - [`AdminError::Deserialize`] if the body does not match `T`.
    async fn send<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T, AdminError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        tracing::info!(method = %method, path, "admin API request");

        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.inspect_err(|e| {
            tracing::error!(method = %method, path, error = %e, "admin API request error");
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                method = %method,
                path,
                body = %body,
                "admin API response error"
            );
            return Err(AdminError::Status {
                status: status.as_u16(),
                method: method.to_string(),
                path: path.to_owned(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), path, "admin API response");

        let text = response.text().await?;
        self.throttle.after_call().await;

        serde_json::from_str::<T>(&text).map_err(|e| AdminError::Deserialize {
            context: format!("{method} {path}"),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
