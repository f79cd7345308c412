use crate::case::{pluralize, to_snake_case};
use crate::model::Model;
use serde::Serialize;

/// Table and key names for a model type. Never mutated once resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModelMetadata {
    pub primary_key: String,
    pub table_name: String,
    /// Column other tables use to reference this model.
    pub relation_key: String,
}

pub const DEFAULT_PRIMARY_KEY: &str = "id";

pub fn default_table_name(model_name: &str) -> String {
    pluralize(&to_snake_case(model_name))
}

pub fn default_relation_key(model_name: &str) -> String {
    format!("{}_id", to_snake_case(model_name))
}

/// Resolves metadata for `M`: overrides first, conventions otherwise. Uncached.
pub fn model_info<M: Model>() -> ModelMetadata {
    let name = M::model_name();
    ModelMetadata {
        primary_key: M::with_primary_key().unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string()),
        table_name: M::with_table_name().unwrap_or_else(|| default_table_name(name)),
        relation_key: M::with_relation_key().unwrap_or_else(|| default_relation_key(name)),
    }
}

/// Same as [`model_info`], taking an instance.
pub fn model_info_of<M: Model>(_model: &M) -> ModelMetadata {
    model_info::<M>()
}
