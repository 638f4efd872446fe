//! Broker Port (Driven Port)
//!
//! Interface for submitting orders to a perpetual-futures venue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::broker::{Classify, ErrorClass, is_retryable_status};
use crate::domain::order_execution::OrderRequest;
use crate::domain::shared::Symbol;

/// Acknowledgment from broker after order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Broker-assigned order ID.
    pub broker_order_id: String,
    /// Client order ID echoed back.
    pub client_order_id: String,
    /// When the broker accepted the order.
    pub accepted_at: DateTime<Utc>,
}

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Connection error.
    #[error("Broker connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },

    /// The request timed out.
    #[error("Broker request timed out: {message}")]
    Timeout {
        /// Error details.
        message: String,
    },

    /// Rate limited.
    #[error("Rate limited by broker")]
    RateLimited,

    /// Exchange temporarily unavailable.
    #[error("Exchange unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Order rejected by broker.
    #[error("Order rejected: {reason}")]
    OrderRejected {
        /// Rejection reason.
        reason: String,
    },

    /// Invalid order parameters.
    #[error("Invalid order: {reason}")]
    InvalidOrder {
        /// Validation failure.
        reason: String,
    },

    /// Insufficient margin.
    #[error("Insufficient margin")]
    InsufficientMargin,

    /// Authentication or permission failure.
    #[error("Broker authentication failed: {message}")]
    Authentication {
        /// Error details.
        message: String,
    },

    /// Unknown error.
    #[error("Broker error: {message}")]
    Unknown {
        /// Error details.
        message: String,
    },
}

impl BrokerError {
    /// Map an HTTP response from a venue API to a broker error.
    #[must_use]
    pub fn from_http_status(status: u16, body: &str) -> Self {
        let message = body.trim().to_string();
        match status {
            429 => Self::RateLimited,
            408 | 504 => Self::Timeout { message },
            401 | 403 => Self::Authentication { message },
            _ if is_retryable_status(status) => Self::Unavailable { message },
            400 | 422 => {
                let lower = message.to_lowercase();
                if lower.contains("margin") {
                    Self::InsufficientMargin
                } else if lower.contains("reject") {
                    Self::OrderRejected { reason: message }
                } else {
                    Self::InvalidOrder { reason: message }
                }
            }
            _ => Self::Unknown {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }

    /// Metric / log label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionError { .. } => "connection",
            Self::Timeout { .. } => "timeout",
            Self::RateLimited => "rate_limited",
            Self::Unavailable { .. } => "unavailable",
            Self::OrderRejected { .. } => "rejected",
            Self::InvalidOrder { .. } => "invalid_order",
            Self::InsufficientMargin => "insufficient_margin",
            Self::Authentication { .. } => "authentication",
            Self::Unknown { .. } => "unknown",
        }
    }
}

impl Classify for BrokerError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::ConnectionError { .. }
            | Self::Timeout { .. }
            | Self::RateLimited
            | Self::Unavailable { .. } => ErrorClass::Retryable,
            Self::OrderRejected { .. }
            | Self::InvalidOrder { .. }
            | Self::InsufficientMargin
            | Self::Authentication { .. }
            | Self::Unknown { .. } => ErrorClass::Fatal,
        }
    }
}

/// Port for broker interactions.
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Broker name for logs and metrics.
    fn name(&self) -> &str;

    /// Submit one order. Retries resubmit the same request verbatim.
    async fn submit_order(
        &self,
        symbol: &Symbol,
        order: &OrderRequest,
    ) -> Result<OrderAck, BrokerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(BrokerError::ConnectionError { message: "reset".into() } => ErrorClass::Retryable; "connection")]
    #[test_case(BrokerError::Timeout { message: "slow".into() } => ErrorClass::Retryable; "timeout")]
    #[test_case(BrokerError::RateLimited => ErrorClass::Retryable; "rate limited")]
    #[test_case(BrokerError::Unavailable { message: "maintenance".into() } => ErrorClass::Retryable; "unavailable")]
    #[test_case(BrokerError::OrderRejected { reason: "price band".into() } => ErrorClass::Fatal; "rejected")]
    #[test_case(BrokerError::InvalidOrder { reason: "size".into() } => ErrorClass::Fatal; "invalid")]
    #[test_case(BrokerError::InsufficientMargin => ErrorClass::Fatal; "margin")]
    #[test_case(BrokerError::Authentication { message: "bad key".into() } => ErrorClass::Fatal; "auth")]
    #[test_case(BrokerError::Unknown { message: "?".into() } => ErrorClass::Fatal; "unknown")]
    fn broker_error_class(error: BrokerError) -> ErrorClass {
        error.class()
    }

    #[test_case(429, "" => "rate_limited"; "too many requests")]
    #[test_case(504, "gateway timeout" => "timeout"; "gateway timeout")]
    #[test_case(503, "maintenance" => "unavailable"; "service unavailable")]
    #[test_case(401, "bad signature" => "authentication"; "unauthorized")]
    #[test_case(400, "Insufficient margin to place order" => "insufficient_margin"; "margin")]
    #[test_case(400, "Order rejected: post only would cross" => "rejected"; "rejected")]
    #[test_case(422, "size must be positive" => "invalid_order"; "validation")]
    #[test_case(404, "not found" => "unknown"; "not found")]
    fn broker_error_from_http_status(status: u16, body: &str) -> &'static str {
        BrokerError::from_http_status(status, body).kind()
    }
}
