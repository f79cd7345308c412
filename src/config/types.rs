//! Runtime options for binding and execution.

use serde::{Deserialize, Serialize};

/// Placeholder syntax emitted by binding processors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?` markers (MySQL, SQLite).
    #[default]
    Question,
    /// `$1, $2, ...` numbered across the whole statement (PostgreSQL).
    Dollar,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrmConfig {
    pub placeholder_style: PlaceholderStyle,
    /// Resolve model metadata through the process-wide cache.
    pub cache_metadata: bool,
    /// Put a query logger in front of user middlewares (see `connect_with_config`).
    pub log_queries: bool,
}

impl Default for OrmConfig {
    fn default() -> Self {
        OrmConfig {
            placeholder_style: PlaceholderStyle::Question,
            cache_metadata: true,
            log_queries: false,
        }
    }
}
