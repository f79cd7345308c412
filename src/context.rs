//! Process-wide default connections with an explicit set/reset lifecycle.
//!
//! Prefer passing an [`Orm`](crate::orm::Orm) explicitly. The defaults exist for
//! applications that configure one database at startup; swapping them while other
//! threads are running queries is allowed but not coordinated.

use crate::connect::Connection;
use crate::error::OrmError;
use std::sync::{Arc, PoisonError, RwLock};

static DEFAULT_READER: RwLock<Option<Arc<Connection>>> = RwLock::new(None);
static DEFAULT_WRITER: RwLock<Option<Arc<Connection>>> = RwLock::new(None);

fn set(slot: &RwLock<Option<Arc<Connection>>>, conn: Option<Arc<Connection>>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = conn;
}

fn get(slot: &RwLock<Option<Arc<Connection>>>, kind: &'static str) -> Result<Arc<Connection>, OrmError> {
    slot.read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(OrmError::NoDefaultConnection(kind))
}

pub fn set_default_reader(conn: Arc<Connection>) {
    set(&DEFAULT_READER, Some(conn));
}

pub fn set_default_writer(conn: Arc<Connection>) {
    set(&DEFAULT_WRITER, Some(conn));
}

/// Uses one connection for both reads and writes.
pub fn set_default_connection(conn: Arc<Connection>) {
    set_default_reader(conn.clone());
    set_default_writer(conn);
}

pub fn default_reader() -> Result<Arc<Connection>, OrmError> {
    get(&DEFAULT_READER, "reader")
}

pub fn default_writer() -> Result<Arc<Connection>, OrmError> {
    get(&DEFAULT_WRITER, "writer")
}

/// Clears both defaults.
pub fn reset_defaults() {
    set(&DEFAULT_READER, None);
    set(&DEFAULT_WRITER, None);
}
