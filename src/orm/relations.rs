//! Relation traversal. The owning side's `relation_key` names the foreign key column.

use crate::error::{ModelError, OrmError};
use crate::model::{model_data, require_primary_key, Model};
use crate::orm::{first, hydrate, statements, Orm};
use crate::sql::{BindValue, CompiledQuery};
use serde::de::DeserializeOwned;
use serde_json::Value;

impl Orm {
    /// The parent referenced by `child.<parent relation_key>`, or `None` when that field is absent or null.
    pub fn belongs_to<Child, Parent>(&self, child: &Child) -> Result<Option<Parent>, OrmError>
    where
        Child: Model,
        Parent: Model + DeserializeOwned,
    {
        let parent_info = self.info::<Parent>();
        let data = model_data(child)?;
        let foreign_key = match data.get(&parent_info.relation_key) {
            None | Some(Value::Null) => return Ok(None),
            Some(v) => BindValue::from_json(v).ok_or_else(|| ModelError::InvalidData {
                model: Child::model_name().to_string(),
                reason: format!("foreign key '{}' is not a scalar", parent_info.relation_key),
            })?,
        };
        self.find_one::<Parent>(foreign_key)
    }

    /// The first child whose `<parent relation_key>` is the parent's primary key.
    pub fn has_one<Parent, Child>(&self, parent: &Parent) -> Result<Option<Child>, OrmError>
    where
        Parent: Model,
        Child: Model + DeserializeOwned,
    {
        let q = self.children_query::<Parent, Child>(parent, Some(1))?;
        first(self.read(q)?)
    }

    /// Every child whose `<parent relation_key>` is the parent's primary key.
    pub fn has_many<Parent, Child>(&self, parent: &Parent) -> Result<Vec<Child>, OrmError>
    where
        Parent: Model,
        Child: Model + DeserializeOwned,
    {
        let q = self.children_query::<Parent, Child>(parent, None)?;
        hydrate(self.read(q)?)
    }

    fn children_query<Parent: Model, Child: Model>(
        &self,
        parent: &Parent,
        limit: Option<u32>,
    ) -> Result<CompiledQuery, OrmError> {
        let parent_info = self.info::<Parent>();
        let child_info = self.info::<Child>();
        let data = model_data(parent)?;
        let id = require_primary_key::<Parent>(&data, &parent_info)?;
        statements::select_by_column(
            &self.binder,
            Child::model_name(),
            &child_info,
            &parent_info.relation_key,
            id,
            limit,
        )
    }
}
