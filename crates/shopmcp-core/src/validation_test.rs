use serde_json::json;

use super::*;
use crate::{MetafieldInput, MetafieldType, NewSmartCollection, UpdateTagsRequest};

fn message(result: Result<Value, ValidationError>) -> String {
    result.expect_err("expected validation failure").message
}

// ---------------------------------------------------------------------------
// Tag update
// ---------------------------------------------------------------------------

#[test]
fn tags_accepts_non_empty_list() {
    let out = validate(&UPDATE_PRODUCT_TAGS, json!({"tags": ["MagSafe", "Leather"]}))
        .expect("valid tags");
    assert_eq!(out, json!({"tags": ["MagSafe", "Leather"]}));
}

#[test]
fn tags_rejects_missing_field() {
    let err = validate(&UPDATE_PRODUCT_TAGS, json!({})).unwrap_err();
    assert_eq!(err.field.as_deref(), Some("tags"));
    assert_eq!(err.message, "\"tags\" is required");
    assert_eq!(err.schema, "update_product_tags");
}

#[test]
fn tags_rejects_empty_list() {
    assert_eq!(
        message(validate(&UPDATE_PRODUCT_TAGS, json!({"tags": []}))),
        "\"tags\" must contain at least 1 items"
    );
}

#[test]
fn tags_rejects_empty_string_item() {
    let err = validate(&UPDATE_PRODUCT_TAGS, json!({"tags": ["ok", ""]})).unwrap_err();
    assert_eq!(err.field.as_deref(), Some("tags[1]"));
    assert_eq!(err.message, "\"tags[1]\" is not allowed to be empty");
}

#[test]
fn tags_rejects_non_string_item() {
    assert_eq!(
        message(validate(&UPDATE_PRODUCT_TAGS, json!({"tags": [42]}))),
        "\"tags[0]\" must be a string"
    );
}

#[test]
fn tags_rejects_scalar_instead_of_list() {
    assert_eq!(
        message(validate(&UPDATE_PRODUCT_TAGS, json!({"tags": "MagSafe, Leather"}))),
        "\"tags\" must be an array"
    );
}

#[test]
fn rejects_non_object_body() {
    let err = validate(&UPDATE_PRODUCT_TAGS, json!(["MagSafe"])).unwrap_err();
    assert!(err.field.is_none());
    assert_eq!(err.message, "\"value\" must be of type object");
}

#[test]
fn rejects_unknown_field() {
    let err = validate(&UPDATE_PRODUCT_TAGS, json!({"tags": ["a"], "append": true})).unwrap_err();
    assert_eq!(err.field.as_deref(), Some("append"));
    assert_eq!(err.message, "\"append\" is not allowed");
}

// ---------------------------------------------------------------------------
// Collection creation
// ---------------------------------------------------------------------------

#[test]
fn collection_accepts_minimal_body() {
    let parsed: NewSmartCollection = validate_into(json!({
        "title": "MagSafe Cases",
        "rule_keywords": ["MagSafe"]
    }))
    .expect("valid collection");
    assert_eq!(parsed.title, "MagSafe Cases");
    assert_eq!(parsed.rule_keywords, vec!["MagSafe"]);
    assert!(parsed.description.is_none());
}

#[test]
fn collection_title_length_bounds() {
    let too_long = "x".repeat(256);
    assert_eq!(
        message(validate(
            &CREATE_COLLECTION,
            json!({"title": too_long, "rule_keywords": ["a"]})
        )),
        "\"title\" length must be less than or equal to 255 characters long"
    );

    let at_limit = "x".repeat(255);
    assert!(validate(&CREATE_COLLECTION, json!({"title": at_limit, "rule_keywords": ["a"]})).is_ok());
}

#[test]
fn collection_title_counts_characters_not_bytes() {
    let title = "é".repeat(255);
    assert!(validate(&CREATE_COLLECTION, json!({"title": title, "rule_keywords": ["a"]})).is_ok());
}

#[test]
fn collection_reports_first_violation_in_table_order() {
    let err = validate(&CREATE_COLLECTION, json!({"title": "", "rule_keywords": []})).unwrap_err();
    assert_eq!(err.field.as_deref(), Some("title"));
}

#[test]
fn collection_description_may_be_empty_but_not_too_long() {
    assert!(validate(
        &CREATE_COLLECTION,
        json!({"title": "t", "rule_keywords": ["a"], "description": ""})
    )
    .is_ok());
    assert_eq!(
        message(validate(
            &CREATE_COLLECTION,
            json!({"title": "t", "rule_keywords": ["a"], "description": "d".repeat(1001)})
        )),
        "\"description\" length must be less than or equal to 1000 characters long"
    );
}

// ---------------------------------------------------------------------------
// Metafield update
// ---------------------------------------------------------------------------

#[test]
fn metafield_type_defaults_when_absent() {
    let out = validate(
        &UPDATE_METAFIELD,
        json!({"namespace": "custom", "key": "material", "value": "leather"}),
    )
    .expect("valid metafield");
    assert_eq!(out["type"], "single_line_text_field");

    let parsed: MetafieldInput = serde_json::from_value(out).expect("typed");
    assert_eq!(parsed.metafield_type, MetafieldType::SingleLineTextField);
}

#[test]
fn metafield_type_outside_enumeration_is_rejected() {
    let err = validate(
        &UPDATE_METAFIELD,
        json!({"namespace": "custom", "key": "k", "value": "v", "type": "rich_text_field"}),
    )
    .unwrap_err();
    assert_eq!(err.field.as_deref(), Some("type"));
    assert!(err.message.starts_with("\"type\" must be one of ["));
    assert!(err.message.contains("json_string"));
}

#[test]
fn metafield_every_listed_type_is_accepted() {
    for ty in MetafieldType::NAMES {
        let parsed: MetafieldInput = validate_into(json!({
            "namespace": "custom",
            "key": "k",
            "value": "1",
            "type": ty
        }))
        .unwrap_or_else(|e| panic!("type {ty} rejected: {e}"));
        assert_eq!(parsed.metafield_type.as_str(), *ty);
    }
}

#[test]
fn metafield_namespace_and_key_limits() {
    assert_eq!(
        message(validate(
            &UPDATE_METAFIELD,
            json!({"namespace": "n".repeat(21), "key": "k", "value": "v"})
        )),
        "\"namespace\" length must be less than or equal to 20 characters long"
    );
    assert_eq!(
        message(validate(
            &UPDATE_METAFIELD,
            json!({"namespace": "n", "key": "k".repeat(31), "value": "v"})
        )),
        "\"key\" length must be less than or equal to 30 characters long"
    );
}

#[test]
fn metafield_value_must_be_string() {
    assert_eq!(
        message(validate(
            &UPDATE_METAFIELD,
            json!({"namespace": "n", "key": "k", "value": 5})
        )),
        "\"value\" must be a string"
    );
}

#[test]
fn validate_into_builds_typed_tag_request() {
    let parsed: UpdateTagsRequest = validate_into(json!({"tags": ["MagSafe"]})).expect("valid");
    assert_eq!(parsed.tags, vec!["MagSafe"]);
}
