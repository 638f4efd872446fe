//! Risk management errors.

use std::fmt;

/// Errors raised while configuring risk evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RiskError {
    /// Invalid risk configuration.
    InvalidConfiguration {
        /// Configuration field.
        field: String,
        /// Error message.
        message: String,
    },
}

impl RiskError {
    /// Shorthand for an invalid configuration error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RiskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { field, message } => {
                write!(f, "Invalid risk configuration [{field}]: {message}")
            }
        }
    }
}

impl std::error::Error for RiskError {}

/// Errors raised by a [`DailyRiskLedger`](super::DailyRiskLedger).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The storage backend failed; the transaction was rolled back.
    #[error("ledger persistence error: {message}")]
    Persistence {
        /// Error message.
        message: String,
    },

    /// A stored row could not be decoded.
    #[error("ledger row for {trading_date} is malformed: {message}")]
    CorruptRow {
        /// Trading date key of the row.
        trading_date: String,
        /// Error message.
        message: String,
    },

    /// An activity event was rejected.
    #[error("invalid risk event: {message}")]
    InvalidEvent {
        /// Error message.
        message: String,
    },

    /// The ledger was constructed with invalid settings.
    #[error(transparent)]
    Configuration(#[from] RiskError),
}

impl LedgerError {
    /// Shorthand for a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }
}
