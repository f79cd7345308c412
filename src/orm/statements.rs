//! Statements generated for active-record operations, all through the template binder.
//!
//! Table names and field lists are spliced with `{*__...}`; every value is a parameter.

use crate::error::{BindingError, ModelError, OrmError};
use crate::model::ModelMetadata;
use crate::sql::{identifier_from_expression, json_kind, BindValue, Binder, Bindable, CompiledQuery, Data};
use serde_json::{Map, Value};

const TABLE_KEY: &str = "__table";
const FIELDS_KEY: &str = "__fields";
const VALUES_KEY: &str = "__values";

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && identifier_from_expression(s) == s
}

/// Column names referenced by `{=column}` must be plain identifiers.
fn check_column(model: &str, column: &str) -> Result<(), ModelError> {
    if is_identifier(column) {
        Ok(())
    } else {
        Err(ModelError::InvalidData {
            model: model.to_string(),
            reason: format!("column '{}' is not a valid identifier", column),
        })
    }
}

fn scalar(field: &str, v: &Value) -> Result<BindValue, BindingError> {
    BindValue::from_json(v).ok_or_else(|| BindingError::InvalidValueType {
        identifier: field.to_string(),
        found: json_kind(v),
    })
}

fn table_data(info: &ModelMetadata) -> Data {
    Data::new().with(TABLE_KEY, info.table_name.as_str())
}

/// `insert into <table> (<fields>) values (?, ...)`, skipping the primary key.
pub fn insert(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    data: &Map<String, Value>,
) -> Result<CompiledQuery, OrmError> {
    let mut fields = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (field, v) in data {
        if *field == info.primary_key {
            continue;
        }
        check_column(model, field)?;
        values.push(scalar(field, v)?);
        fields.push(BindValue::Text(field.clone()));
    }
    let mapping = table_data(info)
        .with(FIELDS_KEY, Bindable::Many(fields))
        .with(VALUES_KEY, Bindable::Many(values));
    Ok(binder.bind(
        "insert into {*__table} ({*__fields}) values ({__values})",
        &mapping,
    )?)
}

/// `update <table> set a = ?, b = ? where <pk> = ?`.
pub fn update(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    data: &Map<String, Value>,
    id: BindValue,
) -> Result<CompiledQuery, OrmError> {
    check_column(model, &info.primary_key)?;
    let mut mapping = table_data(info);
    let mut assignments = Vec::new();
    for (field, v) in data {
        if *field == info.primary_key {
            continue;
        }
        check_column(model, field)?;
        mapping.insert(field.clone(), scalar(field, v)?);
        assignments.push(format!("{{={}}}", field));
    }
    if assignments.is_empty() {
        return Err(ModelError::InvalidData {
            model: model.to_string(),
            reason: "no fields to update".into(),
        }
        .into());
    }
    mapping.insert(info.primary_key.clone(), id);
    let template = format!(
        "update {{*__table}} set {} where {{={}}}",
        assignments.join(", "),
        info.primary_key
    );
    Ok(binder.bind(&template, &mapping)?)
}

/// `delete from <table> where <pk> = ?`.
pub fn delete(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    id: BindValue,
) -> Result<CompiledQuery, OrmError> {
    select_where_column(binder, model, info, "delete from {*__table}", &info.primary_key, id, None)
}

/// `select * from <table> where <pk> = ?`.
pub fn select_by_key(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    id: BindValue,
) -> Result<CompiledQuery, OrmError> {
    select_where_column(binder, model, info, "select * from {*__table}", &info.primary_key, id, None)
}

/// `select * from <table> where <column> = ?` with an optional limit.
pub fn select_by_column(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    column: &str,
    value: BindValue,
    limit: Option<u32>,
) -> Result<CompiledQuery, OrmError> {
    select_where_column(binder, model, info, "select * from {*__table}", column, value, limit)
}

fn select_where_column(
    binder: &Binder,
    model: &str,
    info: &ModelMetadata,
    head: &str,
    column: &str,
    value: BindValue,
    limit: Option<u32>,
) -> Result<CompiledQuery, OrmError> {
    check_column(model, column)?;
    let mapping = table_data(info).with(column, value);
    let limit_clause = limit.map(|n| format!(" limit {}", n)).unwrap_or_default();
    let template = format!("{} where {{={}}}{}", head, column, limit_clause);
    Ok(binder.bind(&template, &mapping)?)
}

/// `select * from <table>` with an optional limit.
pub fn select_all(binder: &Binder, info: &ModelMetadata, limit: Option<u32>) -> Result<CompiledQuery, OrmError> {
    let limit_clause = limit.map(|n| format!(" limit {}", n)).unwrap_or_default();
    let template = format!("select * from {{*__table}}{}", limit_clause);
    Ok(binder.bind(&template, &table_data(info))?)
}

/// `select * from <table> where ` followed by the caller's bound template.
pub fn select_where(
    binder: &Binder,
    info: &ModelMetadata,
    template: &str,
    data: &Data,
) -> Result<CompiledQuery, OrmError> {
    let mut q = binder.bind("select * from {*__table} where ", &table_data(info))?;
    let condition = binder.bind_from(q.params.len(), template, data)?;
    q.append(condition);
    Ok(q)
}
