//! Middleware composition: an ordered list of interceptors reduced into one callable.

use crate::connect::{Driver, QueryResult};
use crate::error::OrmError;
use crate::sql::BindValue;
use std::sync::Arc;

/// The downstream stage handed to each middleware.
pub type Next<'a> =
    dyn Fn(&dyn Driver, String, Vec<BindValue>) -> Result<QueryResult, OrmError> + Send + Sync + 'a;

type Stage = Arc<Next<'static>>;

/// Intercepts query execution. Call `next` to continue down the chain (possibly with
/// changed arguments) or return a result to stop it.
pub trait Middleware: Send + Sync {
    fn handle(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
        next: &Next<'_>,
    ) -> Result<QueryResult, OrmError>;
}

impl<F> Middleware for F
where
    F: Fn(&dyn Driver, String, Vec<BindValue>, &Next<'_>) -> Result<QueryResult, OrmError> + Send + Sync,
{
    fn handle(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
        next: &Next<'_>,
    ) -> Result<QueryResult, OrmError> {
        self(driver, query, params, next)
    }
}

/// Pins a closure to the middleware signature so its argument types are inferred.
pub fn middleware<F>(f: F) -> F
where
    F: Fn(&dyn Driver, String, Vec<BindValue>, &Next<'_>) -> Result<QueryResult, OrmError> + Send + Sync,
{
    f
}

/// A composed chain. Immutable once built.
#[derive(Clone)]
pub struct Pipeline {
    entry: Stage,
}

impl Pipeline {
    pub fn call(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
    ) -> Result<QueryResult, OrmError> {
        (self.entry)(driver, query, params)
    }
}

/// Terminal stage reached only when every middleware delegated and none produced a result.
pub fn exhausted() -> Arc<Next<'static>> {
    Arc::new(|_driver: &dyn Driver, query: String, _params: Vec<BindValue>| -> Result<QueryResult, OrmError> {
        tracing::error!(sql = %query, "middleware chain exhausted");
        Err(OrmError::MiddlewareChainExhausted)
    })
}

/// Wraps `terminal` right-to-left: the first middleware becomes the entry point.
pub fn compose(middlewares: Vec<Box<dyn Middleware>>, terminal: Arc<Next<'static>>) -> Pipeline {
    let entry = middlewares
        .into_iter()
        .rev()
        .fold(terminal, |next, current| -> Stage {
            Arc::new(move |driver: &dyn Driver, query: String, params: Vec<BindValue>| {
                current.handle(driver, query, params, &*next)
            })
        });
    Pipeline { entry }
}
