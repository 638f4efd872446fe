//! Account state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account balances and current exposure as seen by account polling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    /// Total account equity in quote currency.
    pub equity: f64,
    /// Free balance in quote currency.
    #[serde(default)]
    pub balance: f64,
    /// Current exposure of the evaluated symbol as a signed fraction of equity.
    #[serde(default)]
    pub current_exposure_percent: f64,
    /// When the state was observed.
    pub timestamp: DateTime<Utc>,
}

impl AccountState {
    /// Create an account state observed now.
    #[must_use]
    pub fn new(equity: f64, current_exposure_percent: f64) -> Self {
        Self {
            equity,
            balance: equity,
            current_exposure_percent,
            timestamp: Utc::now(),
        }
    }

    /// Same state with a different observation time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
