//! Bindable values and the data mapping handed to the binder.

use crate::error::BindingError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// A scalar that can be rendered into SQL or bound as a query parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl BindValue {
    /// Converts a JSON scalar. Arrays and objects are not scalars and yield `None`.
    pub fn from_json(v: &Value) -> Option<Self> {
        Some(match v {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::Int(i)
                } else {
                    BindValue::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            Value::String(s) => BindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => return None,
        })
    }

    pub fn to_json(&self) -> Value {
        match self {
            BindValue::Null => Value::Null,
            BindValue::Bool(b) => Value::Bool(*b),
            BindValue::Int(i) => Value::from(*i),
            BindValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            BindValue::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BindValue::Null)
    }

    /// Text used when the value is spliced into SQL or wrapped in like wildcards.
    /// Booleans render as 1/0 and null as the empty string.
    pub fn literal(&self) -> String {
        match self {
            BindValue::Null => String::new(),
            BindValue::Bool(true) => "1".into(),
            BindValue::Bool(false) => "0".into(),
            BindValue::Int(i) => i.to_string(),
            BindValue::Float(f) => f.to_string(),
            BindValue::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for BindValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindValue::Null => f.write_str("null"),
            BindValue::Text(s) => write!(f, "'{}'", s),
            other => f.write_str(&other.literal()),
        }
    }
}

/// A data mapping entry: one scalar or an ordered list of scalars.
#[derive(Clone, Debug, PartialEq)]
pub enum Bindable {
    One(BindValue),
    Many(Vec<BindValue>),
}

impl Bindable {
    /// Converts a JSON value, rejecting objects and arrays that hold non-scalars.
    pub fn from_json(identifier: &str, v: &Value) -> Result<Self, BindingError> {
        match v {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    BindValue::from_json(item).ok_or_else(|| BindingError::InvalidValueType {
                        identifier: identifier.to_string(),
                        found: json_kind(item),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Bindable::Many),
            other => BindValue::from_json(other)
                .map(Bindable::One)
                .ok_or_else(|| BindingError::InvalidValueType {
                    identifier: identifier.to_string(),
                    found: json_kind(other),
                }),
        }
    }

    /// Scalars in order; a single value is a one-element slice.
    pub fn values(&self) -> &[BindValue] {
        match self {
            Bindable::One(v) => std::slice::from_ref(v),
            Bindable::Many(vs) => vs,
        }
    }
}

pub(crate) fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

macro_rules! scalar_conversions {
    ($($ty:ty => |$v:ident| $conv:expr),* $(,)?) => {
        $(
            impl From<$ty> for BindValue {
                fn from($v: $ty) -> Self {
                    $conv
                }
            }

            impl From<$ty> for Bindable {
                fn from(v: $ty) -> Self {
                    Bindable::One(BindValue::from(v))
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => |v| BindValue::Bool(v),
    i32 => |v| BindValue::Int(i64::from(v)),
    i64 => |v| BindValue::Int(v),
    u32 => |v| BindValue::Int(i64::from(v)),
    f64 => |v| BindValue::Float(v),
    &str => |v| BindValue::Text(v.to_string()),
    String => |v| BindValue::Text(v),
    &String => |v| BindValue::Text(v.clone()),
}

impl From<BindValue> for Bindable {
    fn from(v: BindValue) -> Self {
        Bindable::One(v)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(BindValue::Null)
    }
}

impl<T: Into<BindValue>> From<Option<T>> for Bindable {
    fn from(v: Option<T>) -> Self {
        Bindable::One(BindValue::from(v))
    }
}

impl<T: Into<BindValue>> From<Vec<T>> for Bindable {
    fn from(vs: Vec<T>) -> Self {
        Bindable::Many(vs.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<BindValue> + Clone> From<&[T]> for Bindable {
    fn from(vs: &[T]) -> Self {
        Bindable::Many(vs.iter().cloned().map(Into::into).collect())
    }
}

/// Identifier to value mapping referenced by a template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Data(HashMap<String, Bindable>);

impl Data {
    pub fn new() -> Self {
        Data(HashMap::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<String>, value: impl Into<Bindable>) -> Self {
        self.insert(id, value);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, value: impl Into<Bindable>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn get(&self, id: &str) -> Option<&Bindable> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds a mapping from a JSON object. Every member must be a scalar or a list of scalars.
    pub fn from_json(v: &Value) -> Result<Self, BindingError> {
        let Value::Object(map) = v else {
            return Err(BindingError::InvalidValueType {
                identifier: String::new(),
                found: json_kind(v),
            });
        };
        let mut data = Data::new();
        for (k, v) in map {
            data.insert(k.clone(), Bindable::from_json(k, v)?);
        }
        Ok(data)
    }
}

impl<K: Into<String>, V: Into<Bindable>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Data::new();
        for (k, v) in iter {
            data.insert(k, v);
        }
        data
    }
}

/// Builds a [`Data`] mapping: `data! { "id" => 1, "tags" => vec!["a", "b"] }`.
#[macro_export]
macro_rules! data {
    () => { $crate::sql::Data::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::sql::Data::new();
        $( data.insert($key, $value); )+
        data
    }};
}
