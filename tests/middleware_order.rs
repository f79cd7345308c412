mod common;

use brace_orm::connect::{compose, exhausted, Next};
use brace_orm::{connect, middleware, BindValue, Driver, Middleware, OrmError, QueryResult};
use common::RecordingDriver;
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

struct Recording {
    name: &'static str,
    log: Log,
}

impl Middleware for Recording {
    fn handle(
        &self,
        driver: &dyn Driver,
        query: String,
        params: Vec<BindValue>,
        next: &Next<'_>,
    ) -> Result<QueryResult, OrmError> {
        self.log.lock().unwrap().push(format!("{} pre", self.name));
        let result = next(driver, query, params);
        self.log.lock().unwrap().push(format!("{} post", self.name));
        result
    }
}

#[test]
fn test_onion_ordering() {
    let log: Log = Arc::default();
    let terminal_log = log.clone();
    let terminal: Arc<Next<'static>> = Arc::new(
        move |_d: &dyn Driver, _q: String, _p: Vec<BindValue>| -> Result<QueryResult, OrmError> {
            terminal_log.lock().unwrap().push("terminal".into());
            Ok(QueryResult::empty())
        },
    );
    let pipeline = compose(
        vec![
            Box::new(Recording { name: "m1", log: log.clone() }),
            Box::new(Recording { name: "m2", log: log.clone() }),
        ],
        terminal,
    );
    pipeline.call(&RecordingDriver::new(), "select 1".into(), vec![]).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["m1 pre", "m2 pre", "terminal", "m2 post", "m1 post"]
    );
}

#[test]
fn test_connected_chain_reaches_driver_with_rewritten_params() {
    let driver = Arc::new(RecordingDriver::new());
    let tenant = middleware(|d, q, mut p, next| {
        p.push(BindValue::Int(42));
        next(d, format!("{} and tenant_id = ?", q), p)
    });
    let conn = connect(driver.clone(), vec![Box::new(tenant)]);
    conn.run("select * from t where id = ?", vec![BindValue::Int(1)]).unwrap();
    assert_eq!(
        driver.statements(),
        vec![(
            "select * from t where id = ? and tenant_id = ?".to_string(),
            vec![BindValue::Int(1), BindValue::Int(42)]
        )]
    );
}

#[test]
fn test_post_logic_can_transform_results() {
    let driver = Arc::new(RecordingDriver::new());
    driver.respond(QueryResult::with_rows(vec![serde_json::json!({"id": 1})]));
    let count = middleware(|d, q, p, next| {
        let mut result = next(d, q, p)?;
        let n = result.rows.len();
        result.rows.push(serde_json::json!({"count": n}));
        Ok(result)
    });
    let conn = connect(driver, vec![Box::new(count)]);
    let result = conn.run("select id from t", vec![]).unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[1]["count"], 1);
}

#[test]
fn test_chain_without_terminal_result_is_fatal() {
    let pass = middleware(|d, q, p, next| next(d, q, p));
    let pipeline = compose(vec![Box::new(pass)], exhausted());
    let err = pipeline.call(&RecordingDriver::new(), "select 1".into(), vec![]).unwrap_err();
    assert!(matches!(err, OrmError::MiddlewareChainExhausted));
    assert!(err.to_string().contains("not executed"));
}
