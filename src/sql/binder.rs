//! Compiles brace-delimited templates into parameterized SQL.
//!
//! `select * from {*table} where {=id} and {>=age}` with
//! `{table: "users", id: [1, 2], age: 18}` becomes
//! `select * from users where id in (?, ?) and age >= ?` bound to `[1, 2, 18]`.

use crate::config::PlaceholderStyle;
use crate::error::BindingError;
use crate::sql::processors::{self, ProcessorEntry};
use crate::sql::{BindValue, Data};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Final SQL and its bind values, in placeholder order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl CompiledQuery {
    pub fn new(sql: impl Into<String>, params: Vec<BindValue>) -> Self {
        CompiledQuery {
            sql: sql.into(),
            params,
        }
    }

    /// Appends another compiled query. Under `Dollar` style the other query must
    /// have been bound with an offset of `self.params.len()`.
    pub fn append(&mut self, other: CompiledQuery) {
        self.sql.push_str(&other.sql);
        self.params.extend(other.params);
    }

    pub fn push_sql(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub fn into_parts(self) -> (String, Vec<BindValue>) {
        (self.sql, self.params)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Binder {
    style: PlaceholderStyle,
}

impl Binder {
    pub fn new(style: PlaceholderStyle) -> Self {
        Binder { style }
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    pub fn bind(&self, template: &str, data: &Data) -> Result<CompiledQuery, BindingError> {
        self.bind_from(0, template, data)
    }

    /// Binds with `offset` params already in the statement; only affects `Dollar` numbering.
    pub fn bind_from(
        &self,
        offset: usize,
        template: &str,
        data: &Data,
    ) -> Result<CompiledQuery, BindingError> {
        let mut out = CompiledQuery::default();
        let mut rest = template;
        let mut consumed = 0;

        while let Some((opens, closes)) = next_binding_position(rest, consumed, template)? {
            out.sql.push_str(&rest[..opens]);
            let expression = &rest[opens + 1..closes];
            let (fragment, values, binds) = invoke_processor(expression, data)?;
            if binds {
                let fragment = self.render_markers(&fragment, offset + out.params.len());
                out.sql.push_str(&fragment);
            } else {
                out.sql.push_str(&fragment);
            }
            out.params.extend(values);
            consumed += closes + 1;
            rest = &rest[closes + 1..];
        }
        out.sql.push_str(rest);

        tracing::trace!(template = %template, sql = %out.sql, params = out.params.len(), "bound template");
        Ok(out)
    }

    /// Rewrites `?` markers of a processor fragment for the configured style.
    fn render_markers(&self, fragment: &str, already_bound: usize) -> String {
        match self.style {
            PlaceholderStyle::Question => fragment.to_string(),
            PlaceholderStyle::Dollar => {
                let mut out = String::with_capacity(fragment.len() + 8);
                let mut n = already_bound;
                for c in fragment.chars() {
                    if c == '?' {
                        n += 1;
                        out.push('$');
                        out.push_str(&n.to_string());
                    } else {
                        out.push(c);
                    }
                }
                out
            }
        }
    }
}

/// Binds `template` with `?` placeholders.
pub fn q(template: &str, data: &Data) -> Result<CompiledQuery, BindingError> {
    Binder::default().bind(template, data)
}

/// [`q`] with a JSON object as the data mapping.
pub fn q_json(template: &str, data: &Value) -> Result<CompiledQuery, BindingError> {
    q(template, &Data::from_json(data)?)
}

/// Positions of the next `{` and its closing `}` within `rest`. `consumed` is the
/// byte offset of `rest` inside `template`, used for error messages.
fn next_binding_position(
    rest: &str,
    consumed: usize,
    template: &str,
) -> Result<Option<(usize, usize)>, BindingError> {
    let Some(opens) = rest.find('{') else {
        return Ok(None);
    };
    let closes = rest[opens + 1..]
        .find('}')
        .map(|i| opens + 1 + i)
        .ok_or_else(|| BindingError::TemplateSyntax {
            offset: consumed + opens,
            template: template.to_string(),
        })?;
    Ok(Some((opens, closes)))
}

fn non_identifier_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^_a-zA-Z0-9]+").expect("static identifier pattern"))
}

/// Strips characters which are not valid in an identifier.
pub fn identifier_from_expression(expression: &str) -> String {
    non_identifier_chars().replace_all(expression, "").into_owned()
}

fn resolve_processor(expression: &str) -> Result<(String, &'static ProcessorEntry), BindingError> {
    let identifier = identifier_from_expression(expression);
    let unknown = || BindingError::UnknownBindingFlag {
        expression: expression.to_string(),
    };
    if identifier.is_empty() {
        return Err(unknown());
    }
    let flag = expression.replace(&identifier, "id");
    let entry = processors::lookup(&flag).ok_or_else(unknown)?;
    Ok((identifier, entry))
}

fn invoke_processor(
    expression: &str,
    data: &Data,
) -> Result<(String, Vec<BindValue>, bool), BindingError> {
    let (identifier, entry) = resolve_processor(expression)?;
    let value = data
        .get(&identifier)
        .ok_or_else(|| BindingError::MissingIdentifier(identifier.clone()))?;
    let (fragment, values) = (entry.apply)(&identifier, value);
    Ok((fragment, values, entry.binds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data;

    #[test]
    fn test_template_without_expressions_is_unchanged() {
        let q = q("select 1 from dual", &Data::new()).unwrap();
        assert_eq!(q, CompiledQuery::new("select 1 from dual", vec![]));
    }

    #[test]
    fn test_trailing_text_is_kept() {
        let q = q("where {a} order by id", &data! { "a" => 1 }).unwrap();
        assert_eq!(q.sql, "where ? order by id");
    }

    #[test]
    fn test_unterminated_expression_reports_offset() {
        let err = q("select {*t} where {a", &data! { "a" => 1, "t" => "x" }).unwrap_err();
        assert_eq!(
            err,
            BindingError::TemplateSyntax {
                offset: 18,
                template: "select {*t} where {a".into()
            }
        );
    }

    #[test]
    fn test_unknown_flag() {
        let err = q("where {~a}", &data! { "a" => 1 }).unwrap_err();
        assert_eq!(err, BindingError::UnknownBindingFlag { expression: "~a".into() });
    }

    #[test]
    fn test_expression_without_identifier_is_unknown() {
        assert!(matches!(
            q("where {=}", &Data::new()),
            Err(BindingError::UnknownBindingFlag { .. })
        ));
    }

    #[test]
    fn test_identifier_extraction() {
        assert_eq!(identifier_from_expression(">=created_at"), "created_at");
        assert_eq!(identifier_from_expression("%name%"), "name");
    }

    #[test]
    fn test_dollar_numbering_skips_raw() {
        let binder = Binder::new(PlaceholderStyle::Dollar);
        let data = data! { "t" => "a?b", "id" => vec![1, 2], "age" => 3 };
        let q = binder.bind("select * from {*t} where {=id} and {>age}", &data).unwrap();
        assert_eq!(q.sql, "select * from a?b where id in ($1, $2) and age > $3");
        assert_eq!(q.params.len(), 3);
    }

    #[test]
    fn test_bind_from_offset_continues_numbering() {
        let binder = Binder::new(PlaceholderStyle::Dollar);
        let q = binder.bind_from(2, "{=a}", &data! { "a" => 1 }).unwrap();
        assert_eq!(q.sql, "a = $3");
    }

    #[test]
    fn test_append_concatenates() {
        let mut head = q("update t set {=a}", &data! { "a" => 1 }).unwrap();
        head.append(q(" where {=id}", &data! { "id" => 9 }).unwrap());
        assert_eq!(head.sql, "update t set a = ? where id = ?");
        assert_eq!(head.params, vec![BindValue::Int(1), BindValue::Int(9)]);
    }

    #[test]
    fn test_q_json_rejects_nested_values() {
        let err = q_json("where {=a}", &serde_json::json!({"a": [[1]]})).unwrap_err();
        assert!(matches!(err, BindingError::InvalidValueType { .. }));
    }
}
