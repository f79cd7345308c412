//! Lets compiled params be bound to a sqlx PostgreSQL query.

use crate::sql::BindValue;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgArguments, PgTypeInfo, Postgres};
use sqlx::query::Query;
use sqlx::Database;

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            BindValue::Null => <Option<i32> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            BindValue::Bool(b) => <bool as Encode<Postgres>>::encode_by_ref(b, buf)?,
            BindValue::Int(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf)?,
            BindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
        })
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            BindValue::Null | BindValue::Text(_) => PgTypeInfo::with_name("TEXT"),
            BindValue::Bool(_) => PgTypeInfo::with_name("BOOL"),
            BindValue::Int(_) => PgTypeInfo::with_name("INT8"),
            BindValue::Float(_) => PgTypeInfo::with_name("FLOAT8"),
        })
    }
}

impl sqlx::Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

/// Binds every param in order. Pair with [`PlaceholderStyle::Dollar`](crate::config::PlaceholderStyle).
pub fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for p in params {
        query = query.bind(p.clone());
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlaceholderStyle;
    use crate::sql::Binder;
    use sqlx::Execute;

    #[test]
    fn test_bind_all_keeps_dollar_sql() {
        let q = Binder::new(PlaceholderStyle::Dollar)
            .bind("select * from t where {=a} and {>b}", &crate::data! { "a" => "x", "b" => 2 })
            .unwrap();
        let query = bind_all(sqlx::query(&q.sql), &q.params);
        assert_eq!(query.sql(), "select * from t where a = $1 and b > $2");
    }

    #[test]
    fn test_per_value_type_info() {
        assert_eq!(
            <BindValue as Encode<Postgres>>::produces(&BindValue::Int(1)),
            Some(PgTypeInfo::with_name("INT8"))
        );
    }
}
