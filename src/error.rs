//! Typed errors for binding, model resolution, configuration and execution.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("missing closing \"}}\" after character {offset} of \"{template}\"")]
    TemplateSyntax { offset: usize, template: String },
    #[error("unable to process expression \"{expression}\"")]
    UnknownBindingFlag { expression: String },
    #[error("\"{0}\" does not exist in given data")]
    MissingIdentifier(String),
    #[error("value for \"{identifier}\" must be a scalar or a list of scalars ({found} given)")]
    InvalidValueType { identifier: String, found: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("unable to determine persistence data for model {model}: {reason}")]
    InvalidData { model: String, reason: String },
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error("model {model} has no value for primary key '{key}'")]
    MissingPrimaryKey { model: String, key: String },
    #[error("model {model} field '{field}' collides with a reserved template key")]
    ReservedField { model: String, field: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum OrmError {
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("the middleware stack was exhausted without a result; the query was not executed")]
    MiddlewareChainExhausted,
    #[error("no default {0} connection has been set")]
    NoDefaultConnection(&'static str),
    #[error("driver: {0}")]
    Driver(String),
    #[error("hydration: {0}")]
    Hydration(#[from] serde_json::Error),
}
