//! Turso database handle shared by the ledger and the audit sink.
//!
//! Each adapter takes its own connection and guards it with an async mutex,
//! so a transaction never interleaves with another statement on the same
//! connection.

use std::path::Path;

use thiserror::Error;
use turso::{Builder, Connection, Database, Row, Value};

/// Errors from opening or querying the store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Database could not be opened or connected to.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Statement execution error.
    #[error("Query error: {0}")]
    Query(String),
}

impl From<turso::Error> for PersistenceError {
    fn from(err: turso::Error) -> Self {
        Self::Query(err.to_string())
    }
}

/// An open Turso database.
pub struct TursoStore {
    db: Database,
    location: String,
}

impl std::fmt::Debug for TursoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TursoStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl TursoStore {
    /// Open (or create) a database file. Missing parent directories are created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PersistenceError::Connection(format!("{}: {e}", parent.display())))?;
        }

        let location = path.to_string_lossy().into_owned();
        let db = Builder::new_local(&location)
            .build()
            .await
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;

        tracing::info!(path = %location, "Turso database opened");
        Ok(Self { db, location })
    }

    /// Open a private in-memory database.
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let db = Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| PersistenceError::Connection(e.to_string()))?;
        Ok(Self {
            db,
            location: ":memory:".to_string(),
        })
    }

    /// Where the database lives.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Open a new connection.
    pub fn connect(&self) -> Result<Connection, PersistenceError> {
        self.db
            .connect()
            .map_err(|e| PersistenceError::Connection(e.to_string()))
    }
}

// ============================================================================
// Row decoding
// ============================================================================

/// Read a REAL column; INTEGER values are widened.
pub(crate) fn column_f64(row: &Row, index: usize) -> Result<f64, String> {
    match row.get_value(index).map_err(|e| e.to_string())? {
        Value::Real(value) => Ok(value),
        Value::Integer(value) => Ok(value as f64),
        other => Err(format!("column {index}: expected REAL, got {other:?}")),
    }
}

/// Read an INTEGER column.
pub(crate) fn column_i64(row: &Row, index: usize) -> Result<i64, String> {
    match row.get_value(index).map_err(|e| e.to_string())? {
        Value::Integer(value) => Ok(value),
        other => Err(format!("column {index}: expected INTEGER, got {other:?}")),
    }
}

/// Read a TEXT column; NULL reads as empty.
pub(crate) fn column_text(row: &Row, index: usize) -> Result<String, String> {
    match row.get_value(index).map_err(|e| e.to_string())? {
        Value::Text(value) => Ok(value),
        Value::Null => Ok(String::new()),
        other => Err(format!("column {index}: expected TEXT, got {other:?}")),
    }
}
