//! Query logging middleware.

use crate::connect::{Driver, Middleware, Next, QueryResult};
use crate::error::OrmError;
use crate::sql::BindValue;
use std::time::Instant;

/// Emits a `tracing` event per query with its params, duration and row count.
#[derive(Clone, Debug, Default)]
pub struct QueryLogger {
    /// Log params as `<n params>` instead of their values.
    pub redact_params: bool,
}

impl QueryLogger {
    pub fn redacted() -> Self {
        QueryLogger { redact_params: true }
    }
}

impl Middleware for QueryLogger {
    fn handle(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
        next: &Next<'_>,
    ) -> Result<QueryResult, OrmError> {
        if self.redact_params {
            tracing::debug!(sql = %query, params = params.len(), "query");
        } else {
            tracing::debug!(sql = %query, params = ?params, "query");
        }
        let started = Instant::now();
        let result = next(driver, query, params);
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        match &result {
            Ok(r) => tracing::debug!(elapsed_ms, rows = r.rows.len(), success = r.success, "query done"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "query failed"),
        }
        result
    }
}
