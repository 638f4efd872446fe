//! Execution plan: an approved exposure change for one asset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::decision::Decision;
use crate::domain::market::{AccountState, PositionSummary};
use crate::domain::risk_management::EvaluationResult;

/// Everything the planner needs to turn an evaluation into orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    /// Asset key, e.g. "BTC".
    pub asset: String,
    /// Contract symbol.
    pub symbol: String,
    /// Current signed exposure.
    pub current_exposure: f64,
    /// Approved signed target exposure.
    pub target_exposure: f64,
    /// Latest market price.
    pub market_price: f64,
    /// Stop-loss level to protect the target with.
    pub stop_loss: Option<f64>,
    /// Take-profit level to protect the target with.
    pub take_profit: Option<f64>,
    /// Recommendation that started the cycle.
    pub decision: Decision,
    /// Risk verdict.
    pub risk: EvaluationResult,
    /// Account state at evaluation time.
    pub account: AccountState,
    /// Position summary at evaluation time.
    pub position: PositionSummary,
    /// When the plan was assembled.
    pub generated_at: DateTime<Utc>,
}

impl ExecutionPlan {
    /// Assemble a plan from a risk verdict.
    #[must_use]
    pub fn from_evaluation(
        asset: impl Into<String>,
        decision: Decision,
        risk: EvaluationResult,
        account: AccountState,
        position: PositionSummary,
        market_price: f64,
    ) -> Self {
        Self {
            asset: asset.into(),
            symbol: risk.symbol.clone(),
            current_exposure: account.current_exposure_percent,
            target_exposure: risk.target_exposure_percent,
            market_price,
            stop_loss: risk.recommended_stop_loss,
            take_profit: risk.recommended_take_profit,
            decision,
            risk,
            account,
            position,
            generated_at: Utc::now(),
        }
    }
}
