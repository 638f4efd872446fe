//! Audit sink writing to the `monitor_events` table.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use turso::Connection;

use super::turso_store::column_text;
use crate::application::ports::{AuditError, AuditEvent, AuditSinkPort};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS monitor_events (
    id INTEGER PRIMARY KEY,
    event_type TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

/// Turso implementation of `AuditSinkPort`.
pub struct TursoAuditSink {
    conn: Mutex<Connection>,
}

impl TursoAuditSink {
    /// Wrap a connection and make sure the table exists.
    pub async fn new(conn: Connection) -> Result<Self, AuditError> {
        conn.execute(SCHEMA, ()).await.map_err(storage_error)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Stored JSON payloads of one event type, oldest first.
    pub async fn payloads(&self, event_type: &str) -> Result<Vec<String>, AuditError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT payload FROM monitor_events WHERE event_type = ?1 ORDER BY id",
                (event_type.to_string(),),
            )
            .await
            .map_err(storage_error)?;

        let mut payloads = Vec::new();
        while let Some(row) = rows.next().await.map_err(storage_error)? {
            payloads.push(
                column_text(&row, 0).map_err(|message| AuditError::StorageError { message })?,
            );
        }
        Ok(payloads)
    }
}

#[async_trait]
impl AuditSinkPort for TursoAuditSink {
    async fn record(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let payload =
            serde_json::to_string(event).map_err(|e| AuditError::SerializationError {
                message: e.to_string(),
            })?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO monitor_events (event_type, payload, created_at) VALUES (?1, ?2, ?3)",
            (
                event.event_type().to_string(),
                payload,
                Utc::now().to_rfc3339(),
            ),
        )
        .await
        .map_err(storage_error)?;
        Ok(())
    }
}

fn storage_error(err: turso::Error) -> AuditError {
    AuditError::StorageError {
        message: err.to_string(),
    }
}
