//! Keyword-driven bulk metafield update.
//!
//! Matches are made on the product title, not its tags. Items are processed
//! strictly one after another with the bulk delay after each; a failed item
//! is recorded and the loop moves on.

use serde::Serialize;
use shopmcp_core::{Metafield, MetafieldInput, Product};

use crate::client::AdminClient;
use crate::error::AdminError;

/// Products fetched when the caller does not supply a limit.
pub const DEFAULT_BATCH_SIZE: u32 = 250;

/// Result of updating one matched product.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemOutcome {
    pub product_id: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metafield: Option<Metafield>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkItemOutcome {
    #[must_use]
    pub fn succeeded(product_id: u64, metafield: Metafield) -> Self {
        Self {
            product_id,
            success: true,
            metafield: Some(metafield),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(product_id: u64, error: &AdminError) -> Self {
        Self {
            product_id,
            success: false,
            metafield: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateReport {
    pub keyword: String,
    /// Number of products whose title matched, not the number fetched.
    pub total_products: usize,
    pub results: Vec<BulkItemOutcome>,
}

impl BulkUpdateReport {
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Products whose title contains `keyword`, ignoring case.
#[must_use]
pub fn filter_by_title<'a>(products: &'a [Product], keyword: &str) -> Vec<&'a Product> {
    let needle = keyword.to_lowercase();
    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&needle))
        .collect()
}

impl AdminClient {
    /// Sets `input` on every product (among the first `limit`) whose title
    /// contains `keyword`.
    ///
    /// # Errors
    ///
    /// Only a failure of the initial product listing is returned. Per-item
    /// failures are recorded in the report.
    pub async fn update_products_by_keyword(
        &self,
        keyword: &str,
        input: &MetafieldInput,
        limit: Option<u32>,
    ) -> Result<BulkUpdateReport, AdminError> {
        let products = self
            .list_products(limit.unwrap_or(DEFAULT_BATCH_SIZE))
            .await?;
        let matched = filter_by_title(&products, keyword);

        tracing::info!(
            keyword,
            fetched = products.len(),
            matched = matched.len(),
            "bulk metafield update starting"
        );

        let mut results = Vec::with_capacity(matched.len());
        for product in &matched {
            let outcome = match self.set_product_metafield(product.id, input).await {
                Ok(metafield) => BulkItemOutcome::succeeded(product.id, metafield),
                Err(e) => {
                    tracing::warn!(product_id = product.id, error = %e, "bulk item failed");
                    BulkItemOutcome::failed(product.id, &e)
                }
            };
            results.push(outcome);
            self.throttle().between_bulk_items().await;
        }

        let report = BulkUpdateReport {
            keyword: keyword.to_owned(),
            total_products: matched.len(),
            results,
        };

        tracing::info!(
            keyword,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "bulk metafield update finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: u64, title: &str) -> Product {
        serde_json::from_value(json!({"id": id, "title": title, "handle": "h", "tags": ""}))
            .expect("product fixture")
    }

    #[test]
    fn filter_matches_title_substring_ignoring_case() {
        let products = vec![
            product(1, "Red Case"),
            product(2, "red wallet"),
            product(3, "Blue Case"),
        ];
        let ids: Vec<u64> = filter_by_title(&products, "red").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn filter_with_uppercase_keyword() {
        let products = vec![product(1, "magsafe leather case"), product(2, "Wallet")];
        let ids: Vec<u64> = filter_by_title(&products, "MAGSAFE").iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn report_counts_successes_and_failures() {
        let metafield: Metafield = serde_json::from_value(json!({
            "namespace": "custom", "key": "k", "value": "v"
        }))
        .expect("metafield fixture");
        let err = AdminError::Status {
            status: 500,
            method: "POST".to_owned(),
            path: "products/1/metafields.json".to_owned(),
            body: String::new(),
        };
        let report = BulkUpdateReport {
            keyword: "red".to_owned(),
            total_products: 2,
            results: vec![
                BulkItemOutcome::failed(1, &err),
                BulkItemOutcome::succeeded(2, metafield),
            ],
        };
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);

        let body = serde_json::to_value(&report).expect("serialize");
        assert_eq!(body["results"][0]["success"], false);
        assert!(body["results"][0].get("metafield").is_none());
        assert_eq!(body["results"][1]["metafield"]["key"], "k");
    }
}
