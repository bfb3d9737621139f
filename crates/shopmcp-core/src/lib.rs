pub mod app_config;
pub mod collections;
pub mod config;
pub mod metafields;
pub mod products;
pub mod validation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use collections::{smart_collection_rules, Collection, CollectionRule, NewSmartCollection};
pub use config::{load_app_config, load_app_config_from_env};
pub use metafields::{Metafield, MetafieldInput, MetafieldType};
pub use products::{join_tags, split_tags, Product, ProductImage, UpdateTagsRequest};
pub use validation::{validate, validate_into, Schema, Validated, ValidationError};

/// Errors raised while assembling [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
