//! Model capabilities and the metadata derived from them.
//!
//! A model is any `Serialize` type. Table and key names follow a convention
//! based on the type's simple name; each can be overridden on the [`Model`] impl:
//!
//! ```
//! use brace_orm::model::{model_info, Model};
//!
//! #[derive(serde::Serialize)]
//! struct BlogPost { id: Option<i64>, title: String }
//! impl Model for BlogPost {}
//!
//! #[derive(serde::Serialize)]
//! struct Address { id: Option<i64> }
//! impl Model for Address {
//!     fn with_table_name() -> Option<String> { Some("addresses".into()) }
//! }
//!
//! assert_eq!(model_info::<BlogPost>().table_name, "blog_posts");
//! assert_eq!(model_info::<Address>().table_name, "addresses");
//! ```

mod cache;
mod data;
mod metadata;

pub use cache::*;
pub use data::*;
pub use metadata::*;

use crate::case::simple_type_name;
use crate::error::ModelError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Optional overrides for convention-derived metadata. Every method has a default.
pub trait Model: Serialize + Sized + 'static {
    /// Simple name the conventions are derived from.
    fn model_name() -> &'static str {
        simple_type_name(std::any::type_name::<Self>())
    }

    fn with_primary_key() -> Option<String> {
        None
    }

    fn with_table_name() -> Option<String> {
        None
    }

    fn with_relation_key() -> Option<String> {
        None
    }

    /// Column/value pairs written by create and update. Defaults to the serde representation.
    fn with_data_for_persistence(&self) -> Result<Map<String, Value>, ModelError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(ModelError::InvalidData {
                model: Self::model_name().to_string(),
                reason: "model did not serialize to an object".into(),
            }),
            Err(e) => Err(ModelError::InvalidData {
                model: Self::model_name().to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
