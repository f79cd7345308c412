//! Connections: a driver plus the middleware pipeline every query passes through.

use crate::config::OrmConfig;
use crate::connect::{compose, exhausted, Middleware, Next, Pipeline, QueryLogger};
use crate::error::OrmError;
use crate::sql::{BindValue, CompiledQuery};
use serde_json::Value;
use std::sync::Arc;

/// Executes SQL. Implemented outside this crate for a concrete database client.
pub trait Driver: Send + Sync {
    fn run(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult, OrmError>;
}

impl<D: Driver + ?Sized> Driver for Arc<D> {
    fn run(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult, OrmError> {
        (**self).run(sql, params)
    }
}

/// Outcome of one statement. Rows are opaque JSON objects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub success: bool,
    pub rows: Vec<Value>,
    pub last_insert_id: Option<BindValue>,
}

impl QueryResult {
    /// Successful statement with no rows.
    pub fn empty() -> Self {
        QueryResult {
            success: true,
            rows: Vec::new(),
            last_insert_id: None,
        }
    }

    pub fn with_rows(rows: Vec<Value>) -> Self {
        QueryResult {
            success: true,
            rows,
            last_insert_id: None,
        }
    }

    pub fn inserted(id: impl Into<BindValue>) -> Self {
        QueryResult {
            success: true,
            rows: Vec::new(),
            last_insert_id: Some(id.into()),
        }
    }

    pub fn failed() -> Self {
        QueryResult {
            success: false,
            ..Default::default()
        }
    }

    pub fn was_successful(&self) -> bool {
        self.success
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn first_row(&self) -> Option<&Value> {
        self.rows.first()
    }

    pub fn last_insert_id(&self) -> Option<&BindValue> {
        self.last_insert_id.as_ref()
    }
}

/// Final stage: runs the query on the driver and does not delegate.
pub struct ExecuteQuery;

impl Middleware for ExecuteQuery {
    fn handle(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
        _next: &Next<'_>,
    ) -> Result<QueryResult, OrmError> {
        driver.run(&query, &params)
    }
}

/// A driver decorated with a composed middleware chain.
#[derive(Clone)]
pub struct Connection {
    driver: Arc<dyn Driver>,
    pipeline: Pipeline,
}

impl Connection {
    pub fn run(&self, sql: impl Into<String>, params: Vec<BindValue>) -> Result<QueryResult, OrmError> {
        self.pipeline.call(&*self.driver, sql.into(), params)
    }

    pub fn execute(&self, query: CompiledQuery) -> Result<QueryResult, OrmError> {
        let (sql, params) = query.into_parts();
        self.run(sql, params)
    }
}

/// Composes `middlewares` (in order) in front of query execution.
pub fn connect<D: Driver + 'static>(driver: D, middlewares: Vec<Box<dyn Middleware>>) -> Connection {
    let mut chain = middlewares;
    chain.push(Box::new(ExecuteQuery));
    tracing::debug!(middlewares = chain.len() - 1, "connection pipeline composed");
    Connection {
        driver: Arc::new(driver),
        pipeline: compose(chain, exhausted()),
    }
}

/// [`connect`], adding a [`QueryLogger`] first when `config.log_queries` is set.
pub fn connect_with_config<D: Driver + 'static>(
    driver: D,
    middlewares: Vec<Box<dyn Middleware>>,
    config: &OrmConfig,
) -> Connection {
    let mut chain: Vec<Box<dyn Middleware>> = Vec::with_capacity(middlewares.len() + 1);
    if config.log_queries {
        chain.push(Box::new(QueryLogger::default()));
    }
    chain.extend(middlewares);
    connect(driver, chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect::middleware;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(String, Vec<BindValue>)>>,
    }

    impl Driver for Recorder {
        fn run(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult, OrmError> {
            self.seen.lock().unwrap().push((sql.to_string(), params.to_vec()));
            Ok(QueryResult::inserted(11))
        }
    }

    #[test]
    fn test_connect_executes_on_driver() {
        let driver = Arc::new(Recorder::default());
        let conn = connect(driver.clone(), Vec::new());
        let result = conn
            .execute(CompiledQuery::new("insert into t (a) values (?)", vec![BindValue::Int(1)]))
            .unwrap();
        assert_eq!(result.last_insert_id(), Some(&BindValue::Int(11)));
        let seen = driver.seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[("insert into t (a) values (?)".to_string(), vec![BindValue::Int(1)])]);
    }

    #[test]
    fn test_middleware_sees_query_before_driver() {
        let driver = Arc::new(Recorder::default());
        let upper = middleware(|d, q, p, next| next(d, q.to_uppercase(), p));
        let conn = connect(driver.clone(), vec![Box::new(upper)]);
        conn.run("select 1", vec![]).unwrap();
        assert_eq!(driver.seen.lock().unwrap()[0].0, "SELECT 1");
    }

    #[test]
    fn test_connect_with_config_logging() {
        let config = OrmConfig { log_queries: true, ..OrmConfig::default() };
        let conn = connect_with_config(Recorder::default(), Vec::new(), &config);
        assert!(conn.run("select 1", vec![]).unwrap().was_successful());
    }

    #[test]
    fn test_failed_result() {
        let result = QueryResult::failed();
        assert!(!result.was_successful());
        assert!(result.rows().is_empty());
    }
}
