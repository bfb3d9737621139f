//! Declarative request-body validation.
//!
//! Each mutating endpoint declares a [`Schema`]: an ordered table of
//! [`FieldRule`]s. [`validate`] walks the table once, stops at the first
//! violated constraint, rejects fields the table does not name, and fills
//! declared defaults. The resulting object is what handlers deserialize.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::metafields::MetafieldType;

/// Shape constraint for a single field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A string whose length (in characters) lies in `min..=max`.
    Text { min: usize, max: Option<usize> },
    /// An array of at least `min_items` strings, each at least `item_min` characters.
    TextList { min_items: usize, item_min: usize },
    /// A string drawn from a fixed set.
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    /// Value inserted when an optional field is absent.
    pub default: Option<&'static str>,
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

pub static UPDATE_PRODUCT_TAGS: Schema = Schema {
    name: "update_product_tags",
    fields: &[FieldRule {
        name: "tags",
        required: true,
        kind: FieldKind::TextList {
            min_items: 1,
            item_min: 1,
        },
        default: None,
    }],
};

pub static CREATE_COLLECTION: Schema = Schema {
    name: "create_collection",
    fields: &[
        FieldRule {
            name: "title",
            required: true,
            kind: FieldKind::Text {
                min: 1,
                max: Some(255),
            },
            default: None,
        },
        FieldRule {
            name: "rule_keywords",
            required: true,
            kind: FieldKind::TextList {
                min_items: 1,
                item_min: 1,
            },
            default: None,
        },
        FieldRule {
            name: "description",
            required: false,
            kind: FieldKind::Text {
                min: 0,
                max: Some(1000),
            },
            default: None,
        },
    ],
};

pub static UPDATE_METAFIELD: Schema = Schema {
    name: "update_metafield",
    fields: &[
        FieldRule {
            name: "namespace",
            required: true,
            kind: FieldKind::Text {
                min: 1,
                max: Some(20),
            },
            default: None,
        },
        FieldRule {
            name: "key",
            required: true,
            kind: FieldKind::Text {
                min: 1,
                max: Some(30),
            },
            default: None,
        },
        FieldRule {
            name: "value",
            required: true,
            kind: FieldKind::Text {
                min: 1,
                max: Some(1000),
            },
            default: None,
        },
        FieldRule {
            name: "type",
            required: false,
            kind: FieldKind::OneOf(MetafieldType::NAMES),
            default: Some(MetafieldType::SingleLineTextField.as_str()),
        },
    ],
};

/// First constraint a request body violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub schema: &'static str,
    /// Offending field, or `None` when the body itself has the wrong shape.
    pub field: Option<String>,
    pub message: String,
}

impl ValidationError {
    fn new(schema: &Schema, field: Option<&str>, message: String) -> Self {
        Self {
            schema: schema.name,
            field: field.map(ToOwned::to_owned),
            message,
        }
    }
}

/// A request type whose body must pass a [`Schema`] before it is deserialized.
pub trait Validated: DeserializeOwned {
    const SCHEMA: &'static Schema;
}

/// Validates `body` against `schema` and returns the coerced object.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered, in table order. Unknown
/// fields are reported after every declared field has passed.
pub fn validate(schema: &Schema, body: Value) -> Result<Value, ValidationError> {
    let Value::Object(mut object) = body else {
        return Err(ValidationError::new(
            schema,
            None,
            "\"value\" must be of type object".to_string(),
        ));
    };

    for rule in schema.fields {
        match object.get(rule.name) {
            Some(value) => check_field(schema, rule, value)?,
            None if rule.required => {
                return Err(ValidationError::new(
                    schema,
                    Some(rule.name),
                    format!("\"{}\" is required", rule.name),
                ));
            }
            None => {
                if let Some(default) = rule.default {
                    object.insert(rule.name.to_owned(), Value::String(default.to_owned()));
                }
            }
        }
    }

    if let Some(unknown) = object
        .keys()
        .find(|key| !schema.fields.iter().any(|rule| rule.name == key.as_str()))
    {
        return Err(ValidationError::new(
            schema,
            Some(unknown.as_str()),
            format!("\"{unknown}\" is not allowed"),
        ));
    }

    Ok(Value::Object(object))
}

/// Validates `body` against `T::SCHEMA` and deserializes the coerced object.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the body violates the schema or, after
/// passing it, still cannot be deserialized into `T`.
pub fn validate_into<T: Validated>(body: Value) -> Result<T, ValidationError> {
    let schema = T::SCHEMA;
    let coerced = validate(schema, body)?;
    serde_json::from_value(coerced)
        .map_err(|e| ValidationError::new(schema, None, format!("invalid body: {e}")))
}

fn check_field(schema: &Schema, rule: &FieldRule, value: &Value) -> Result<(), ValidationError> {
    match rule.kind {
        FieldKind::Text { min, max } => check_text(schema, rule.name, value, min, max),
        FieldKind::TextList {
            min_items,
            item_min,
        } => {
            let Value::Array(items) = value else {
                return Err(ValidationError::new(
                    schema,
                    Some(rule.name),
                    format!("\"{}\" must be an array", rule.name),
                ));
            };
            if items.len() < min_items {
                return Err(ValidationError::new(
                    schema,
                    Some(rule.name),
                    format!("\"{}\" must contain at least {min_items} items", rule.name),
                ));
            }
            for (index, item) in items.iter().enumerate() {
                let label = format!("{}[{index}]", rule.name);
                check_text(schema, &label, item, item_min, None)?;
            }
            Ok(())
        }
        FieldKind::OneOf(allowed) => match value.as_str() {
            Some(s) if allowed.contains(&s) => Ok(()),
            _ => Err(ValidationError::new(
                schema,
                Some(rule.name),
                format!("\"{}\" must be one of [{}]", rule.name, allowed.join(", ")),
            )),
        },
    }
}

fn check_text(
    schema: &Schema,
    label: &str,
    value: &Value,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let Some(s) = value.as_str() else {
        return Err(ValidationError::new(
            schema,
            Some(label),
            format!("\"{label}\" must be a string"),
        ));
    };

    let len = s.chars().count();
    if len == 0 && min > 0 {
        return Err(ValidationError::new(
            schema,
            Some(label),
            format!("\"{label}\" is not allowed to be empty"),
        ));
    }
    if len < min {
        return Err(ValidationError::new(
            schema,
            Some(label),
            format!("\"{label}\" length must be at least {min} characters long"),
        ));
    }
    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::new(
                schema,
                Some(label),
                format!("\"{label}\" length must be less than or equal to {max} characters long"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
