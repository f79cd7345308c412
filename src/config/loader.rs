//! Load [`OrmConfig`] from the environment (and a `.env` file when present).

use crate::config::{OrmConfig, PlaceholderStyle};
use crate::error::ConfigError;

pub const ENV_PLACEHOLDER: &str = "BRACE_ORM_PLACEHOLDER";
pub const ENV_CACHE_METADATA: &str = "BRACE_ORM_CACHE_METADATA";
pub const ENV_LOG_QUERIES: &str = "BRACE_ORM_LOG_QUERIES";

impl OrmConfig {
    /// Defaults overridden by `BRACE_ORM_*` variables. A missing `.env` file is not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`OrmConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = OrmConfig::default();
        if let Some(v) = lookup(ENV_PLACEHOLDER) {
            config.placeholder_style = parse_placeholder(&v)?;
        }
        if let Some(v) = lookup(ENV_CACHE_METADATA) {
            config.cache_metadata = parse_flag(ENV_CACHE_METADATA, &v)?;
        }
        if let Some(v) = lookup(ENV_LOG_QUERIES) {
            config.log_queries = parse_flag(ENV_LOG_QUERIES, &v)?;
        }
        tracing::debug!(config = ?config, "orm config loaded");
        Ok(config)
    }
}

fn parse_placeholder(v: &str) -> Result<PlaceholderStyle, ConfigError> {
    match v.trim().to_lowercase().as_str() {
        "question" | "?" => Ok(PlaceholderStyle::Question),
        "dollar" | "$" => Ok(PlaceholderStyle::Dollar),
        _ => Err(ConfigError::InvalidValue {
            key: ENV_PLACEHOLDER,
            value: v.to_string(),
        }),
    }
}

fn parse_flag(key: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: v.to_string(),
        }),
    }
}
