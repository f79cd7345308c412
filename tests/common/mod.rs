#![allow(dead_code)]

use brace_orm::{BindValue, Driver, OrmError, QueryResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Driver double: records each statement and replays queued results (empty success when none are queued).
#[derive(Default)]
pub struct RecordingDriver {
    pub statements: Mutex<Vec<(String, Vec<BindValue>)>>,
    responses: Mutex<VecDeque<QueryResult>>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, result: QueryResult) -> &Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<BindValue>)> {
        self.statements.lock().unwrap().clone()
    }

    pub fn last_sql(&self) -> String {
        self.statements.lock().unwrap().last().map(|s| s.0.clone()).unwrap_or_default()
    }
}

impl Driver for RecordingDriver {
    fn run(&self, sql: &str, params: &[BindValue]) -> Result<QueryResult, OrmError> {
        self.statements.lock().unwrap().push((sql.to_string(), params.to_vec()));
        Ok(self.responses.lock().unwrap().pop_front().unwrap_or_else(QueryResult::empty))
    }
}
