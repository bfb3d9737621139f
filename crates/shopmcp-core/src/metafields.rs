use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::{Schema, Validated, UPDATE_METAFIELD};

/// Value types the admin API accepts for product metafields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetafieldType {
    #[default]
    SingleLineTextField,
    MultiLineTextField,
    NumberInteger,
    NumberDecimal,
    Url,
    JsonString,
    Boolean,
}

impl MetafieldType {
    pub const NAMES: &'static [&'static str] = &[
        "single_line_text_field",
        "multi_line_text_field",
        "number_integer",
        "number_decimal",
        "url",
        "json_string",
        "boolean",
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleLineTextField => "single_line_text_field",
            Self::MultiLineTextField => "multi_line_text_field",
            Self::NumberInteger => "number_integer",
            Self::NumberDecimal => "number_decimal",
            Self::Url => "url",
            Self::JsonString => "json_string",
            Self::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for MetafieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetafieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_line_text_field" => Ok(Self::SingleLineTextField),
            "multi_line_text_field" => Ok(Self::MultiLineTextField),
            "number_integer" => Ok(Self::NumberInteger),
            "number_decimal" => Ok(Self::NumberDecimal),
            "url" => Ok(Self::Url),
            "json_string" => Ok(Self::JsonString),
            "boolean" => Ok(Self::Boolean),
            other => Err(format!(
                "unknown metafield type '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Metafield write request, as accepted by the gateway and forwarded upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetafieldInput {
    pub namespace: String,
    pub key: String,
    pub value: String,
    #[serde(rename = "type", default)]
    pub metafield_type: MetafieldType,
}

impl Validated for MetafieldInput {
    const SCHEMA: &'static Schema = &UPDATE_METAFIELD;
}

/// A metafield as returned by the admin API.
///
/// `value` stays a raw JSON value: the remote echoes integers and booleans
/// back as native JSON even though they are written as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metafield {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<u64>,
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub metafield_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
