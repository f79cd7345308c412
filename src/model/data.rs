//! Persistence data extracted from model instances.

use crate::error::ModelError;
use crate::model::{Model, ModelMetadata};
use crate::sql::BindValue;
use serde_json::{Map, Value};

/// Template keys used by generated statements start with this prefix; model fields may not.
pub const RESERVED_PREFIX: &str = "__";

/// The model's persistence data, rejecting fields that collide with reserved template keys.
pub fn model_data<M: Model>(model: &M) -> Result<Map<String, Value>, ModelError> {
    let data = model.with_data_for_persistence()?;
    if let Some(field) = data.keys().find(|k| k.starts_with(RESERVED_PREFIX)) {
        return Err(ModelError::ReservedField {
            model: M::model_name().to_string(),
            field: field.clone(),
        });
    }
    Ok(data)
}

/// Scalar value stored under the primary key, `None` when absent or null.
pub fn primary_key_value<M: Model>(
    data: &Map<String, Value>,
    info: &ModelMetadata,
) -> Result<Option<BindValue>, ModelError> {
    match data.get(&info.primary_key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => BindValue::from_json(v).map(Some).ok_or_else(|| ModelError::InvalidData {
            model: M::model_name().to_string(),
            reason: format!("primary key '{}' is not a scalar", info.primary_key),
        }),
    }
}

/// Like [`primary_key_value`], failing when the key has no value.
pub fn require_primary_key<M: Model>(
    data: &Map<String, Value>,
    info: &ModelMetadata,
) -> Result<BindValue, ModelError> {
    primary_key_value::<M>(data, info)?.ok_or_else(|| ModelError::MissingPrimaryKey {
        model: M::model_name().to_string(),
        key: info.primary_key.clone(),
    })
}

/// A model is persisted when its primary key holds a non-null value.
pub fn is_persisted<M: Model>(model: &M, info: &ModelMetadata) -> Result<bool, ModelError> {
    let data = model_data(model)?;
    Ok(primary_key_value::<M>(&data, info)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::model_info;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Person {
        id: Option<i64>,
        first_name: String,
    }

    impl Model for Person {}

    #[derive(Serialize)]
    struct Sneaky {
        __table: String,
    }

    impl Model for Sneaky {}

    #[derive(Serialize)]
    struct Tagged {
        id: Vec<i64>,
    }

    impl Model for Tagged {}

    #[derive(Serialize)]
    struct Computed {
        secret: String,
    }

    impl Model for Computed {
        fn with_data_for_persistence(&self) -> Result<Map<String, Value>, ModelError> {
            let mut map = Map::new();
            map.insert("name".into(), Value::String("fixed".into()));
            Ok(map)
        }
    }

    #[test]
    fn test_is_persisted() {
        let info = model_info::<Person>();
        let fresh = Person { id: None, first_name: "Tom".into() };
        let stored = Person { id: Some(4), first_name: "Tom".into() };
        assert!(!is_persisted(&fresh, &info).unwrap());
        assert!(is_persisted(&stored, &info).unwrap());
    }

    #[test]
    fn test_reserved_fields_rejected() {
        let err = model_data(&Sneaky { __table: "x".into() }).unwrap_err();
        assert_eq!(
            err,
            ModelError::ReservedField { model: "Sneaky".into(), field: "__table".into() }
        );
    }

    #[test]
    fn test_non_scalar_primary_key() {
        let info = model_info::<Tagged>();
        let data = model_data(&Tagged { id: vec![1] }).unwrap();
        assert!(matches!(
            primary_key_value::<Tagged>(&data, &info),
            Err(ModelError::InvalidData { .. })
        ));
    }

    #[test]
    fn test_missing_primary_key() {
        let info = model_info::<Person>();
        let data = model_data(&Person { id: None, first_name: "A".into() }).unwrap();
        assert_eq!(
            require_primary_key::<Person>(&data, &info),
            Err(ModelError::MissingPrimaryKey { model: "Person".into(), key: "id".into() })
        );
    }

    #[test]
    fn test_persistence_override() {
        let data = model_data(&Computed { secret: "s".into() }).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data["name"], "fixed");
    }
}
