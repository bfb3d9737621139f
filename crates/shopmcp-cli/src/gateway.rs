//! Typed HTTP client for a running gateway.
//!
//! Every call returns the gateway's JSON body untouched so commands can
//! print it. Non-2xx answers become errors carrying the envelope's
//! `error` and `message` fields.

use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use shopmcp_core::{MetafieldInput, NewSmartCollection, Product};

#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GatewayClient {
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, api_key: Option<&str>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("failed to build gateway HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.map(ToOwned::to_owned),
        })
    }

    /// Fetches `/health`. A 503 is returned as data, not an error, so the
    /// caller can show which variables are missing.
    pub async fn health(&self) -> anyhow::Result<(StatusCode, Value)> {
        self.send(Method::GET, "/health", &[], None).await
    }

    pub async fn list_products(&self, limit: Option<u32>) -> anyhow::Result<Value> {
        let query: Vec<(&str, String)> = limit
            .map(|l| ("limit", l.to_string()))
            .into_iter()
            .collect();
        self.expect_ok(Method::GET, "/products", &query, None).await
    }

    /// Lists products and decodes them, for callers that need typed data.
    pub async fn products(&self, limit: u32) -> anyhow::Result<Vec<Product>> {
        let body = self.list_products(Some(limit)).await?;
        let products = body
            .pointer("/data/products")
            .cloned()
            .context("gateway response has no data.products")?;
        serde_json::from_value(products).context("failed to decode products from gateway")
    }

    pub async fn get_product(&self, id: u64) -> anyhow::Result<Value> {
        self.expect_ok(Method::GET, &format!("/products/{id}"), &[], None)
            .await
    }

    pub async fn update_tags(&self, id: u64, tags: &[String]) -> anyhow::Result<Value> {
        let body = serde_json::json!({ "tags": tags });
        self.expect_ok(Method::PUT, &format!("/products/{id}/tags"), &[], Some(&body))
            .await
    }

    pub async fn get_metafields(&self, id: u64) -> anyhow::Result<Value> {
        self.expect_ok(Method::GET, &format!("/products/{id}/metafields"), &[], None)
            .await
    }

    pub async fn set_metafield(&self, id: u64, input: &MetafieldInput) -> anyhow::Result<Value> {
        let body = serde_json::to_value(input)?;
        self.expect_ok(
            Method::POST,
            &format!("/products/{id}/metafields"),
            &[],
            Some(&body),
        )
        .await
    }

    pub async fn list_collections(&self) -> anyhow::Result<Value> {
        self.expect_ok(Method::GET, "/collections", &[], None).await
    }

    pub async fn get_collection(&self, id: u64) -> anyhow::Result<Value> {
        self.expect_ok(Method::GET, &format!("/collections/{id}"), &[], None)
            .await
    }

    pub async fn create_collection(&self, new: &NewSmartCollection) -> anyhow::Result<Value> {
        let body = serde_json::to_value(new)?;
        self.expect_ok(Method::POST, "/collections", &[], Some(&body))
            .await
    }

    pub async fn sync_metafield(
        &self,
        keyword: &str,
        input: &MetafieldInput,
        limit: Option<u32>,
    ) -> anyhow::Result<Value> {
        let mut query = vec![("keyword", keyword.to_owned())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        let body = serde_json::to_value(input)?;
        self.expect_ok(Method::POST, "/sync/products/metafield", &query, Some(&body))
            .await
    }

    async fn expect_ok(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> anyhow::Result<Value> {
        let (status, value) = self.send(method.clone(), path, query, body).await?;
        if !status.is_success() {
            let error = value["error"].as_str().unwrap_or("request failed");
            let message = value["message"].as_str().unwrap_or_default();
            bail!("{method} {path} returned {status}: {error}: {message}");
        }
        Ok(value)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(method = %method, url = %url, "gateway request");

        let mut request = self.client.request(method.clone(), &url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(status = status.as_u16(), url = %url, "gateway response");

        let value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)
                .with_context(|| format!("{method} {url} returned non-JSON body"))?
        };
        Ok((status, value))
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
