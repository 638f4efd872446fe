//! Risk activity log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An entry to append to the risk activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskEvent {
    /// Event type, e.g. `daily_halt`.
    pub event_type: String,
    /// Human-readable message.
    pub message: String,
    /// Optional structured details.
    pub details: String,
    /// Trading date the event belongs to; the current trading day when absent.
    pub trading_date: Option<String>,
}

impl RiskEvent {
    /// Event type written when the daily loss limit trips.
    pub const DAILY_HALT: &'static str = "daily_halt";

    /// Create an event without details for the current trading day.
    pub fn new(event_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            message: message.into(),
            details: String::new(),
            trading_date: None,
        }
    }

    /// Attach details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = details.into();
        self
    }

    /// Pin the event to a trading date.
    #[must_use]
    pub fn on(mut self, trading_date: impl Into<String>) -> Self {
        self.trading_date = Some(trading_date.into());
        self
    }
}

/// A stored activity log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskActivity {
    /// When the row was written.
    pub occurred_at: DateTime<Utc>,
    /// Event type.
    pub event_type: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    pub details: String,
    /// Trading date key.
    pub trading_date: String,
}
