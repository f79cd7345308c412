//! Active-record operations over a reader and a writer connection.

mod relations;
pub mod statements;

use crate::config::OrmConfig;
use crate::connect::{Connection, QueryResult};
use crate::context;
use crate::error::OrmError;
use crate::model::{cached_model_info, model_data, model_info, primary_key_value, require_primary_key, Model, ModelMetadata};
use crate::sql::{BindValue, Binder, CompiledQuery, Data};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Explicit execution context: where reads and writes go, and how statements are rendered.
#[derive(Clone)]
pub struct Orm {
    reader: Arc<Connection>,
    writer: Arc<Connection>,
    config: OrmConfig,
    binder: Binder,
}

impl Orm {
    /// One connection for both reads and writes.
    pub fn new(conn: Arc<Connection>) -> Self {
        Self::with_connections(conn.clone(), conn)
    }

    pub fn with_connections(reader: Arc<Connection>, writer: Arc<Connection>) -> Self {
        let config = OrmConfig::default();
        Orm {
            reader,
            writer,
            binder: Binder::new(config.placeholder_style),
            config,
        }
    }

    /// Uses the process-wide default connections (see [`crate::context`]).
    pub fn from_defaults() -> Result<Self, OrmError> {
        Ok(Self::with_connections(context::default_reader()?, context::default_writer()?))
    }

    pub fn with_config(mut self, config: OrmConfig) -> Self {
        self.binder = Binder::new(config.placeholder_style);
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrmConfig {
        &self.config
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn reader(&self) -> &Connection {
        &self.reader
    }

    pub fn writer(&self) -> &Connection {
        &self.writer
    }

    fn info<M: Model>(&self) -> Arc<ModelMetadata> {
        if self.config.cache_metadata {
            cached_model_info::<M>()
        } else {
            Arc::new(model_info::<M>())
        }
    }

    /// Binds `template` and runs it on the reader.
    pub fn query(&self, template: &str, data: &Data) -> Result<QueryResult, OrmError> {
        self.read(self.binder.bind(template, data)?)
    }

    /// Binds `template` and runs it on the writer.
    pub fn execute(&self, template: &str, data: &Data) -> Result<QueryResult, OrmError> {
        self.write(self.binder.bind(template, data)?)
    }

    fn read(&self, q: CompiledQuery) -> Result<QueryResult, OrmError> {
        tracing::debug!(sql = %q.sql, params = q.params.len(), "read");
        self.reader.execute(q)
    }

    fn write(&self, q: CompiledQuery) -> Result<QueryResult, OrmError> {
        tracing::debug!(sql = %q.sql, params = q.params.len(), "write");
        self.writer.execute(q)
    }

    /// Inserts the model without its primary key. Returns the id reported by the driver.
    pub fn create<M: Model>(&self, model: &M) -> Result<Option<BindValue>, OrmError> {
        let info = self.info::<M>();
        let data = model_data(model)?;
        let result = self.write(statements::insert(&self.binder, M::model_name(), &info, &data)?)?;
        if !result.was_successful() {
            return Err(OrmError::Driver(format!("insert into {} was not successful", info.table_name)));
        }
        Ok(result.last_insert_id)
    }

    /// Updates every persisted field of the model by primary key.
    pub fn update<M: Model>(&self, model: &M) -> Result<bool, OrmError> {
        let info = self.info::<M>();
        let data = model_data(model)?;
        let id = require_primary_key::<M>(&data, &info)?;
        let q = statements::update(&self.binder, M::model_name(), &info, &data, id)?;
        Ok(self.write(q)?.was_successful())
    }

    /// Updates a persisted model, creates it otherwise. Returns its id.
    pub fn save<M: Model>(&self, model: &M) -> Result<Option<BindValue>, OrmError> {
        let info = self.info::<M>();
        let data = model_data(model)?;
        match primary_key_value::<M>(&data, &info)? {
            Some(id) => {
                let q = statements::update(&self.binder, M::model_name(), &info, &data, id.clone())?;
                if self.write(q)?.was_successful() {
                    Ok(Some(id))
                } else {
                    Err(OrmError::Driver(format!("update of {} was not successful", info.table_name)))
                }
            }
            None => self.create(model),
        }
    }

    pub fn delete<M: Model>(&self, model: &M) -> Result<bool, OrmError> {
        let info = self.info::<M>();
        let data = model_data(model)?;
        let id = require_primary_key::<M>(&data, &info)?;
        let q = statements::delete(&self.binder, M::model_name(), &info, id)?;
        Ok(self.write(q)?.was_successful())
    }

    pub fn is_persisted<M: Model>(&self, model: &M) -> Result<bool, OrmError> {
        Ok(crate::model::is_persisted(model, &self.info::<M>())?)
    }

    pub fn find_one<M: Model + DeserializeOwned>(&self, id: impl Into<BindValue>) -> Result<Option<M>, OrmError> {
        let info = self.info::<M>();
        let q = statements::select_by_key(&self.binder, M::model_name(), &info, id.into())?;
        first(self.read(q)?)
    }

    pub fn find_first<M: Model + DeserializeOwned>(&self) -> Result<Option<M>, OrmError> {
        let q = statements::select_all(&self.binder, &self.info::<M>(), Some(1))?;
        first(self.read(q)?)
    }

    pub fn find_all<M: Model + DeserializeOwned>(&self) -> Result<Vec<M>, OrmError> {
        let q = statements::select_all(&self.binder, &self.info::<M>(), None)?;
        hydrate(self.read(q)?)
    }

    /// `select * from <table> where <template>`.
    pub fn find_where<M: Model + DeserializeOwned>(&self, template: &str, data: &Data) -> Result<Vec<M>, OrmError> {
        let q = statements::select_where(&self.binder, &self.info::<M>(), template, data)?;
        hydrate(self.read(q)?)
    }
}

/// Deserializes every row into `M`.
pub fn hydrate<M: DeserializeOwned>(result: QueryResult) -> Result<Vec<M>, OrmError> {
    result
        .rows
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(OrmError::from))
        .collect()
}

fn first<M: DeserializeOwned>(result: QueryResult) -> Result<Option<M>, OrmError> {
    match result.rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}
