use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::products::null_as_default;
use crate::validation::{Schema, Validated, CREATE_COLLECTION};

/// One membership rule of a smart collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRule {
    pub column: String,
    pub relation: String,
    pub condition: String,
}

impl CollectionRule {
    /// A rule matching products carrying exactly `tag`.
    #[must_use]
    pub fn tag_equals(tag: &str) -> Self {
        Self {
            column: "tag".to_owned(),
            relation: "equals".to_owned(),
            condition: tag.to_owned(),
        }
    }
}

/// A collection as returned by the admin API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub rules: Vec<CollectionRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /collections`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSmartCollection {
    pub title: String,
    pub rule_keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validated for NewSmartCollection {
    const SCHEMA: &'static Schema = &CREATE_COLLECTION;
}

/// Maps each keyword to a tag-equality rule, preserving order.
///
/// How multiple rules combine (AND/OR) is decided by the remote platform.
#[must_use]
pub fn smart_collection_rules(keywords: &[String]) -> Vec<CollectionRule> {
    keywords
        .iter()
        .map(|kw| CollectionRule::tag_equals(kw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword_produces_single_tag_rule() {
        let rules = smart_collection_rules(&["MagSafe".to_string()]);
        assert_eq!(
            rules,
            vec![CollectionRule {
                column: "tag".to_string(),
                relation: "equals".to_string(),
                condition: "MagSafe".to_string(),
            }]
        );
    }

    #[test]
    fn rules_keep_keyword_order() {
        let rules = smart_collection_rules(&["Leather".to_string(), "iPhone 15".to_string()]);
        let conditions: Vec<&str> = rules.iter().map(|r| r.condition.as_str()).collect();
        assert_eq!(conditions, vec!["Leather", "iPhone 15"]);
    }

    #[test]
    fn collection_deserializes_rules_and_keeps_extra_fields() {
        let collection: Collection = serde_json::from_value(serde_json::json!({
            "id": 1_063_001_322,
            "title": "MagSafe Cases",
            "handle": "magsafe-cases",
            "rules": [{"column": "tag", "relation": "equals", "condition": "MagSafe"}],
            "disjunctive": false
        }))
        .expect("deserialize");
        assert_eq!(collection.rules.len(), 1);
        assert_eq!(collection.extra["disjunctive"], serde_json::json!(false));
    }

    #[test]
    fn collection_tolerates_null_rules() {
        let collection: Collection = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Custom",
            "rules": null
        }))
        .expect("null rules should decode");
        assert!(collection.rules.is_empty());
    }
}
