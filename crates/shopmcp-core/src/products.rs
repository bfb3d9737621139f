//! Product shapes exchanged with the admin API.
//!
//! ### Tags
//! The admin REST API returns `tags` as one comma-separated string
//! (`"MagSafe, Leather"`) and only accepts that form on writes. The
//! gateway exposes tags as a list on both sides and converts at the edge
//! with [`split_tags`] and [`join_tags`]. An array is also accepted on
//! input so payloads produced by this crate round-trip.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::validation::{Schema, Validated, UPDATE_PRODUCT_TAGS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub handle: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Remaining remote fields (variants, options, status, ...), passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// Source URL of the first image, if the product has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.src.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `PUT /products/:id/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateTagsRequest {
    pub tags: Vec<String>,
}

impl Validated for UpdateTagsRequest {
    const SCHEMA: &'static Schema = &UPDATE_PRODUCT_TAGS;
}

/// Joins tags into the single comma-separated field the admin API expects.
#[must_use]
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// Splits the admin API's comma-separated tag string, dropping blanks.
#[must_use]
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::List(tags)) => tags,
        Some(RawTags::Joined(raw)) => split_tags(&raw),
        None => Vec::new(),
    })
}
