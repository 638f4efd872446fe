//! Daily Risk Ledger Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::errors::LedgerError;
use super::value_objects::{DailyStatus, RiskEvent};

/// Durable per-trading-day equity tracker with a one-way halt flag.
///
/// Implementations must make `update` atomic: concurrent callers see each
/// other's writes in some serial order and a failed call leaves no partial
/// state behind.
#[async_trait]
pub trait DailyRiskLedger: Send + Sync {
    /// Record an equity observation and return the resulting daily status.
    ///
    /// The first observation of a trading date becomes its start equity.
    /// Later observations may trip the halt, which then stays set for the
    /// rest of that date.
    async fn update(&self, timestamp: DateTime<Utc>, equity: f64)
    -> Result<DailyStatus, LedgerError>;

    /// Append an entry to the risk activity log.
    async fn log_event(&self, event: RiskEvent) -> Result<(), LedgerError>;
}
