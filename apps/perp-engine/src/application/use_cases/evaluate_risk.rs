//! Evaluate Risk Use Case

use std::sync::Arc;

use crate::domain::risk_management::{
    DailyRiskLedger, EvaluationResult, LedgerError, RiskEvaluator, RiskInput,
};
use crate::observability::record_risk_evaluation;

/// Use case for vetting one recommendation against the daily ledger and
/// the sizing rules.
pub struct EvaluateRiskUseCase<L>
where
    L: DailyRiskLedger,
{
    ledger: Arc<L>,
    evaluator: RiskEvaluator,
}

impl<L> EvaluateRiskUseCase<L>
where
    L: DailyRiskLedger,
{
    /// Create a new EvaluateRiskUseCase.
    pub const fn new(ledger: Arc<L>, evaluator: RiskEvaluator) -> Self {
        Self { ledger, evaluator }
    }

    /// The evaluator in use.
    #[must_use]
    pub const fn evaluator(&self) -> &RiskEvaluator {
        &self.evaluator
    }

    /// Execute the use case.
    ///
    /// Advances the ledger with the account's equity first, so the verdict
    /// always sees the halt flag as of this observation. A ledger failure
    /// aborts the evaluation.
    pub async fn execute(&self, input: &RiskInput<'_>) -> Result<EvaluationResult, LedgerError> {
        let status = self
            .ledger
            .update(input.account.timestamp, input.account.equity)
            .await?;

        let result = self.evaluator.evaluate(input, &status);

        tracing::info!(
            symbol = %result.symbol,
            trading_date = %status.trading_date,
            status = %result.status,
            target = result.target_exposure_percent,
            risk_amount = result.risk_amount,
            halted = status.halted,
            reason = result.reason().unwrap_or_default(),
            "Risk evaluated"
        );
        record_risk_evaluation(&result.symbol, result.status.as_str());

        Ok(result)
    }
}
