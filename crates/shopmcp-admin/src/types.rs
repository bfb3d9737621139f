//! Wire envelopes for the admin REST API.
//!
//! Every resource is wrapped in a single-key object (`{"product": {...}}`,
//! `{"products": [...]}`); these types peel that layer off.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopmcp_core::{Collection, CollectionRule, Metafield, MetafieldInput, Product};

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope {
    pub products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionsEnvelope {
    pub collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectionEnvelope {
    pub collection: Collection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldsEnvelope {
    pub metafields: Vec<Metafield>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldEnvelope {
    pub metafield: Metafield,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShopEnvelope {
    pub shop: Value,
}

/// `PUT /products/{id}.json` body. Tags travel as one joined string.
#[derive(Debug, Serialize)]
pub(crate) struct ProductTagsUpdate<'a> {
    pub product: ProductTagsPayload<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductTagsPayload<'a> {
    pub id: u64,
    pub tags: &'a str,
}

/// `POST /collections.json` body for a rule-driven collection.
#[derive(Debug, Serialize)]
pub(crate) struct SmartCollectionCreate<'a> {
    pub collection: SmartCollectionPayload<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SmartCollectionPayload<'a> {
    pub title: &'a str,
    pub body_html: &'a str,
    pub collection_type: &'static str,
    pub rules: Vec<CollectionRule>,
    pub published: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct MetafieldCreate<'a> {
    pub metafield: &'a MetafieldInput,
}

/// Outcome of the `shop.json` probe used by health checks.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
