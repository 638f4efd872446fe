//! Per-trading-day equity and halt state.

use serde::{Deserialize, Serialize};

/// Snapshot of the daily drawdown ledger for one trading date.
///
/// `halted` never goes back to false within a trading date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStatus {
    /// Trading date key (`YYYY-MM-DD`).
    pub trading_date: String,
    /// First equity observed on this trading date.
    pub start_equity: f64,
    /// Most recent equity observed.
    pub current_equity: f64,
    /// Signed change since the start of the day, as a fraction of start equity.
    pub loss_percent: f64,
    /// Whether exposure increases are blocked for the rest of the day.
    pub halted: bool,
}

impl DailyStatus {
    /// Status for a trading date seen for the first time.
    #[must_use]
    pub fn opening(trading_date: impl Into<String>, equity: f64) -> Self {
        Self {
            trading_date: trading_date.into(),
            start_equity: equity,
            current_equity: equity,
            loss_percent: 0.0,
            halted: false,
        }
    }

    /// Apply a new equity observation to a stored day.
    ///
    /// Returns the new status and whether this observation tripped the halt.
    #[must_use]
    pub fn advance(
        trading_date: impl Into<String>,
        start_equity: f64,
        was_halted: bool,
        equity: f64,
        max_daily_loss: f64,
    ) -> (Self, bool) {
        let loss_percent = if start_equity > 0.0 {
            (equity - start_equity) / start_equity
        } else {
            0.0
        };

        let trips = !was_halted && start_equity > 0.0 && loss_percent <= -max_daily_loss;

        let status = Self {
            trading_date: trading_date.into(),
            start_equity,
            current_equity: equity,
            loss_percent,
            halted: was_halted || trips,
        };
        (status, trips)
    }

    /// Human-readable description of a halt transition.
    #[must_use]
    pub fn halt_message(&self, max_daily_loss: f64) -> String {
        format!(
            "daily loss {:.2}% breached limit {:.2}%, trading halted",
            self.loss_percent * 100.0,
            max_daily_loss * 100.0
        )
    }
}
