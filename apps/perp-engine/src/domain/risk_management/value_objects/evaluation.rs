//! Risk evaluation input and result.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::decision::Decision;
use crate::domain::market::{AccountState, FeatureSnapshot, PositionSummary};

use super::DailyStatus;

/// Everything the evaluator looks at for one symbol.
#[derive(Debug, Clone, Copy)]
pub struct RiskInput<'a> {
    /// The recommendation being evaluated.
    pub decision: &'a Decision,
    /// Latest indicator snapshot.
    pub features: &'a FeatureSnapshot,
    /// Current position summary.
    pub position: &'a PositionSummary,
    /// Current account state.
    pub account: &'a AccountState,
    /// Latest market price.
    pub market_price: f64,
}

/// Verdict of a risk evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    /// The target exposure may be executed.
    Proceed,
    /// Nothing may be executed this cycle.
    Deny,
}

impl EvaluationStatus {
    /// Metric / log label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Contract symbol.
    pub symbol: String,
    /// Verdict.
    pub status: EvaluationStatus,
    /// Approved target exposure as a signed fraction of equity.
    pub target_exposure_percent: f64,
    /// Stop-loss level the evaluator sized against.
    pub recommended_stop_loss: Option<f64>,
    /// Take-profit level passed through from the recommendation.
    pub recommended_take_profit: Option<f64>,
    /// Capital at risk in quote currency.
    pub risk_amount: f64,
    /// Confidence factor applied to the risk budget.
    pub confidence_applied: f64,
    /// Ordered explanation of every decision point.
    pub notes: Vec<String>,
    /// Ledger snapshot the evaluation ran against.
    pub daily_status: DailyStatus,
}

impl EvaluationResult {
    /// A denial with no notes yet.
    #[must_use]
    pub fn denied(symbol: impl Into<String>, daily_status: DailyStatus) -> Self {
        Self {
            symbol: symbol.into(),
            status: EvaluationStatus::Deny,
            target_exposure_percent: 0.0,
            recommended_stop_loss: None,
            recommended_take_profit: None,
            risk_amount: 0.0,
            confidence_applied: 0.0,
            notes: Vec::new(),
            daily_status,
        }
    }

    /// Returns true if the result allows execution.
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        self.status == EvaluationStatus::Proceed
    }

    /// The last note, usually the reason for the verdict.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.notes.last().map(String::as_str)
    }
}
