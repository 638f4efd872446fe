//! Per-asset cycle input and outcome.

use serde::{Deserialize, Serialize};

use crate::domain::decision::Decision;
use crate::domain::market::{AccountState, FeatureSnapshot, PositionSummary};
use crate::domain::order_execution::ExecutionResult;
use crate::domain::risk_management::EvaluationResult;

/// Everything one asset's pipeline consumes in a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetSnapshot {
    /// Asset key, e.g. "BTC".
    pub asset: String,
    /// Contract symbol.
    pub symbol: String,
    /// Latest market price.
    pub market_price: f64,
    /// Recommendation, absent when the decision source produced none.
    #[serde(default)]
    pub decision: Option<Decision>,
    /// Indicator snapshot.
    pub features: FeatureSnapshot,
    /// Position summary.
    #[serde(default)]
    pub position: PositionSummary,
    /// Account state.
    pub account: AccountState,
}

/// What happened to one asset in a cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// The decision interval has not elapsed.
    NotDue,
    /// No recommendation was available.
    NoDecision,
    /// Risk evaluation denied the recommendation.
    Denied {
        /// The verdict.
        evaluation: EvaluationResult,
    },
    /// The planner produced no orders.
    NothingToDo {
        /// The verdict.
        evaluation: EvaluationResult,
        /// Why no orders were built.
        reason: String,
    },
    /// Orders were submitted.
    Executed {
        /// The verdict.
        evaluation: EvaluationResult,
        /// Submission outcome.
        result: ExecutionResult,
    },
}

impl CycleOutcome {
    /// Log label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotDue => "not_due",
            Self::NoDecision => "no_decision",
            Self::Denied { .. } => "denied",
            Self::NothingToDo { .. } => "nothing_to_do",
            Self::Executed { .. } => "executed",
        }
    }
}
