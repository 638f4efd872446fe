//! Turso-backed daily risk ledger.
//!
//! One row per trading date in `risk_daily_metrics`, plus the append-only
//! `risk_activity_log`. Every `update` is a single transaction run while the
//! connection mutex is held; a halt entry is written inside that same
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use turso::Connection;

use super::in_memory::halt_details;
use super::turso_store::{column_f64, column_i64, column_text};
use crate::domain::risk_management::{
    DailyRiskLedger, DailyStatus, LedgerError, LedgerSettings, RiskActivity, RiskEvent,
    trading_day,
};
use crate::observability::record_daily_halt;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS risk_daily_metrics (
        trading_date TEXT PRIMARY KEY,
        start_equity REAL NOT NULL,
        current_equity REAL NOT NULL,
        halted INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS risk_activity_log (
        id INTEGER PRIMARY KEY,
        occurred_at TEXT NOT NULL,
        event_type TEXT NOT NULL,
        message TEXT NOT NULL,
        details TEXT NOT NULL,
        trading_date TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_risk_activity_log_date ON risk_activity_log (trading_date)",
];

/// Stored row, before the new observation is applied.
struct StoredDay {
    start_equity: f64,
    halted: bool,
}

/// Turso implementation of `DailyRiskLedger`.
pub struct TursoRiskLedger {
    conn: Mutex<Connection>,
    settings: LedgerSettings,
}

impl TursoRiskLedger {
    /// Wrap a connection and make sure the schema exists.
    pub async fn new(conn: Connection, settings: LedgerSettings) -> Result<Self, LedgerError> {
        for statement in SCHEMA {
            conn.execute(statement, ()).await.map_err(db_error)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
            settings,
        })
    }

    /// Stored status for a trading date.
    pub async fn status(&self, trading_date: &str) -> Result<Option<DailyStatus>, LedgerError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT start_equity, current_equity, halted
                 FROM risk_daily_metrics WHERE trading_date = ?1",
                (trading_date.to_string(),),
            )
            .await
            .map_err(db_error)?;

        let Some(row) = single_row(&mut rows).await? else {
            return Ok(None);
        };
        let corrupt = |message| LedgerError::CorruptRow {
            trading_date: trading_date.to_string(),
            message,
        };
        let start_equity = column_f64(&row, 0).map_err(corrupt)?;
        let current_equity = column_f64(&row, 1).map_err(corrupt)?;
        let halted = column_i64(&row, 2).map_err(corrupt)? != 0;

        let loss_percent = if start_equity > 0.0 {
            (current_equity - start_equity) / start_equity
        } else {
            0.0
        };
        Ok(Some(DailyStatus {
            trading_date: trading_date.to_string(),
            start_equity,
            current_equity,
            loss_percent,
            halted,
        }))
    }

    /// Activity log entries for a trading date, oldest first.
    pub async fn activity(&self, trading_date: &str) -> Result<Vec<RiskActivity>, LedgerError> {
        let conn = self.conn.lock().await;
        let mut rows = conn
            .query(
                "SELECT occurred_at, event_type, message, details, trading_date
                 FROM risk_activity_log WHERE trading_date = ?1 ORDER BY id",
                (trading_date.to_string(),),
            )
            .await
            .map_err(db_error)?;

        let corrupt = |message| LedgerError::CorruptRow {
            trading_date: trading_date.to_string(),
            message,
        };
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_error)? {
            let occurred_at = column_text(&row, 0).map_err(corrupt)?;
            let occurred_at = DateTime::parse_from_rfc3339(&occurred_at)
                .map_err(|e| corrupt(e.to_string()))?
                .with_timezone(&Utc);
            entries.push(RiskActivity {
                occurred_at,
                event_type: column_text(&row, 1).map_err(corrupt)?,
                message: column_text(&row, 2).map_err(corrupt)?,
                details: column_text(&row, 3).map_err(corrupt)?,
                trading_date: column_text(&row, 4).map_err(corrupt)?,
            });
        }
        Ok(entries)
    }

    async fn load_day(
        conn: &Connection,
        trading_date: &str,
    ) -> Result<Option<StoredDay>, LedgerError> {
        let mut rows = conn
            .query(
                "SELECT start_equity, halted FROM risk_daily_metrics WHERE trading_date = ?1",
                (trading_date.to_string(),),
            )
            .await
            .map_err(db_error)?;

        let Some(row) = single_row(&mut rows).await? else {
            return Ok(None);
        };
        let corrupt = |message| LedgerError::CorruptRow {
            trading_date: trading_date.to_string(),
            message,
        };
        Ok(Some(StoredDay {
            start_equity: column_f64(&row, 0).map_err(corrupt)?,
            halted: column_i64(&row, 1).map_err(corrupt)? != 0,
        }))
    }

    /// Body of `update`; runs inside an open transaction.
    async fn apply(
        &self,
        conn: &Connection,
        trading_date: &str,
        timestamp: DateTime<Utc>,
        equity: f64,
    ) -> Result<(DailyStatus, bool), LedgerError> {
        let updated_at = timestamp.to_rfc3339();

        let Some(stored) = Self::load_day(conn, trading_date).await? else {
            conn.execute(
                "INSERT INTO risk_daily_metrics
                 (trading_date, start_equity, current_equity, halted, updated_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                (trading_date.to_string(), equity, equity, updated_at),
            )
            .await
            .map_err(db_error)?;
            return Ok((DailyStatus::opening(trading_date, equity), false));
        };

        let max_daily_loss = self.settings.max_daily_loss();
        let (status, trips) = DailyStatus::advance(
            trading_date,
            stored.start_equity,
            stored.halted,
            equity,
            max_daily_loss,
        );

        conn.execute(
            "UPDATE risk_daily_metrics
             SET current_equity = ?1, halted = ?2, updated_at = ?3
             WHERE trading_date = ?4",
            (
                equity,
                i64::from(status.halted),
                updated_at.clone(),
                trading_date.to_string(),
            ),
        )
        .await
        .map_err(db_error)?;

        if trips {
            insert_activity(
                conn,
                &updated_at,
                RiskEvent::DAILY_HALT,
                &status.halt_message(max_daily_loss),
                &halt_details(&status),
                trading_date,
            )
            .await?;
        }

        Ok((status, trips))
    }
}

#[async_trait]
impl DailyRiskLedger for TursoRiskLedger {
    async fn update(
        &self,
        timestamp: DateTime<Utc>,
        equity: f64,
    ) -> Result<DailyStatus, LedgerError> {
        let trading_date = trading_day(timestamp, self.settings.reset_hour());
        let conn = self.conn.lock().await;

        conn.execute("BEGIN", ()).await.map_err(db_error)?;
        let applied = match self.apply(&conn, &trading_date, timestamp, equity).await {
            Ok(applied) => conn
                .execute("COMMIT", ())
                .await
                .map(|_| applied)
                .map_err(db_error),
            Err(e) => Err(e),
        };

        let (status, trips) = match applied {
            Ok(applied) => applied,
            Err(e) => {
                if let Err(rollback) = conn.execute("ROLLBACK", ()).await {
                    tracing::error!(trading_date = %trading_date, error = %rollback, "Ledger rollback failed");
                }
                return Err(e);
            }
        };
        drop(conn);

        if trips {
            tracing::warn!(
                trading_date = %trading_date,
                loss_percent = status.loss_percent,
                start_equity = status.start_equity,
                current_equity = status.current_equity,
                "{}",
                status.halt_message(self.settings.max_daily_loss())
            );
            record_daily_halt();
        }

        Ok(status)
    }

    async fn log_event(&self, event: RiskEvent) -> Result<(), LedgerError> {
        if event.event_type.trim().is_empty() {
            return Err(LedgerError::InvalidEvent {
                message: "event type must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        let trading_date = event
            .trading_date
            .unwrap_or_else(|| trading_day(now, self.settings.reset_hour()));

        let conn = self.conn.lock().await;
        insert_activity(
            &conn,
            &now.to_rfc3339(),
            &event.event_type,
            &event.message,
            &event.details,
            &trading_date,
        )
        .await
    }
}

async fn insert_activity(
    conn: &Connection,
    occurred_at: &str,
    event_type: &str,
    message: &str,
    details: &str,
    trading_date: &str,
) -> Result<(), LedgerError> {
    conn.execute(
        "INSERT INTO risk_activity_log
         (occurred_at, event_type, message, details, trading_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            occurred_at.to_string(),
            event_type.to_string(),
            message.to_string(),
            details.to_string(),
            trading_date.to_string(),
        ),
    )
    .await
    .map_err(db_error)?;
    Ok(())
}

/// First row of a keyed lookup. The cursor is always read to the end; a
/// statement left open ends the surrounding transaction.
async fn single_row(rows: &mut turso::Rows) -> Result<Option<turso::Row>, LedgerError> {
    let first = rows.next().await.map_err(db_error)?;
    while rows.next().await.map_err(db_error)?.is_some() {}
    Ok(first)
}

fn db_error(err: turso::Error) -> LedgerError {
    LedgerError::persistence(err.to_string())
}
