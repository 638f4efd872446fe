//! Execution planning errors.

use thiserror::Error;

use crate::domain::risk_management::EvaluationStatus;

/// Reasons the planner produces no orders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// The risk verdict does not allow execution.
    #[error("risk not allowed: evaluation status is {status}")]
    RiskNotAllowed {
        /// Verdict of the evaluation.
        status: EvaluationStatus,
    },

    /// Market price is missing or non-positive.
    #[error("invalid market price {price}")]
    InvalidPrice {
        /// Offending price.
        price: f64,
    },

    /// Current exposure already equals the target.
    #[error("already at target exposure {target:+.6} (current {current:+.6})")]
    AlreadyAtTarget {
        /// Current exposure.
        current: f64,
        /// Target exposure.
        target: f64,
    },

    /// Account equity is non-positive.
    #[error("invalid account equity {equity}")]
    InvalidEquity {
        /// Offending equity.
        equity: f64,
    },

    /// Computed order amount is non-positive or not finite.
    #[error("invalid order amount {amount}")]
    InvalidAmount {
        /// Offending amount.
        amount: f64,
    },

    /// A price string could not be parsed as a positive number.
    #[error("invalid price string '{raw}'")]
    InvalidPriceString {
        /// Offending input.
        raw: String,
    },
}

impl PlanError {
    /// Metric / log label.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::RiskNotAllowed { .. } => "risk_not_allowed",
            Self::InvalidPrice { .. } => "invalid_price",
            Self::AlreadyAtTarget { .. } => "already_at_target",
            Self::InvalidEquity { .. } => "invalid_equity",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::InvalidPriceString { .. } => "invalid_price_string",
        }
    }
}
