//! brace-orm: brace-delimited SQL templates, convention-based model metadata and
//! middleware-driven query execution.

pub mod case;
pub mod config;
pub mod connect;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod orm;
pub mod sql;

pub use config::{OrmConfig, PlaceholderStyle};
pub use connect::{compose, connect, connect_with_config, middleware, Connection, Driver, Middleware, Next, QueryLogger, QueryResult};
pub use error::{BindingError, ConfigError, ModelError, OrmError};
pub use model::{cached_model_info, model_info, model_info_of, MetadataCache, Model, ModelMetadata};
pub use orm::Orm;
pub use sql::{q, q_json, BindValue, Bindable, Binder, CompiledQuery, Data};
