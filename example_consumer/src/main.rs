//! Example consumer: a separate Rust project that uses brace-orm as a dependency.
//!
//! Run from repo root: `cargo run -p example-consumer`
//! Or from this directory: `cargo run`
//!
//! Statements go to a driver that prints them instead of talking to a database.

use brace_orm::logging::init_tracing;
use brace_orm::{
    connect_with_config, data, middleware, BindValue, Driver, Middleware, Model, Orm, OrmConfig, OrmError,
    QueryResult,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct Person {
    id: Option<i64>,
    first_name: String,
    last_name: String,
    address_id: Option<i64>,
}

impl Model for Person {
    fn with_table_name() -> Option<String> {
        Some("people".into())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Address {
    id: Option<i64>,
    line1: String,
}

impl Model for Address {
    fn with_table_name() -> Option<String> {
        Some("addresses".into())
    }
}

/// Prints every statement and answers with canned rows.
struct PrintingDriver;

impl Driver for PrintingDriver {
    fn run(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult, OrmError> {
        let rendered: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        println!("{sql}  [{}]", rendered.join(", "));
        if sql.starts_with("insert") {
            return Ok(QueryResult::inserted(1));
        }
        if sql.contains("from addresses") {
            return Ok(QueryResult::with_rows(vec![json!({"id": 30, "line1": "1 High St"})]));
        }
        Ok(QueryResult::with_rows(vec![json!({
            "id": 1, "first_name": "Tom", "last_name": "Jones", "address_id": 30
        })]))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("brace_orm=debug,example_consumer=info");

    let config = OrmConfig::from_env()?;
    let audit = middleware(|driver, query, params, next| {
        tracing::info!(%query, "audit");
        next(driver, query, params)
    });
    let chain: Vec<Box<dyn Middleware>> = vec![Box::new(audit)];
    let conn = Arc::new(connect_with_config(PrintingDriver, chain, &config));
    let orm = Orm::new(conn).with_config(config);

    let mut tom = Person {
        id: None,
        first_name: "Tom".into(),
        last_name: "Jones".into(),
        address_id: Some(30),
    };
    if let Some(BindValue::Int(id)) = orm.save(&tom)? {
        tom.id = Some(id);
    }
    tom.last_name = "Smith".into();
    orm.save(&tom)?;

    let address: Option<Address> = orm.belongs_to::<Person, Address>(&tom)?;
    tracing::info!(?address, "address");

    let people: Vec<Person> =
        orm.find_where("{last_name%} and {!id}", &data! { "last_name" => "Sm", "id" => vec![7, 8] })?;
    tracing::info!(count = people.len(), "people");

    orm.delete(&tom)?;
    Ok(())
}
