//! Run Cycle Use Case
//!
//! Drives the pipeline for every configured asset on each scheduler tick:
//! ledger update, risk evaluation, planning and submission. Assets run
//! concurrently within a tick; each asset's own pipeline is sequential.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::application::dto::{AssetSnapshot, CycleOutcome};
use crate::application::ports::{AuditEvent, AuditSinkPort, BrokerPort};
use crate::application::use_cases::{EvaluateRiskUseCase, OrderSubmitter, SubmissionFailure};
use crate::domain::order_execution::{ExecutionPlan, ExecutionPlanner};
use crate::domain::risk_management::{DailyRiskLedger, LedgerError, RiskInput};
use crate::domain::shared::Symbol;
use crate::observability::record_plan_rejection;

/// Scheduling state for one asset, owned by the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSchedule {
    /// Asset key.
    pub asset: String,
    /// When the asset last completed a risk evaluation.
    pub last_decision_at: Option<DateTime<Utc>>,
}

impl AssetSchedule {
    /// A schedule that is due immediately.
    #[must_use]
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            last_decision_at: None,
        }
    }

    /// Whether a new decision is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: DateTime<Utc>, interval: Duration) -> bool {
        self.last_decision_at
            .is_none_or(|last| now.signed_duration_since(last) >= interval)
    }

    /// Record a completed evaluation.
    pub fn mark(&mut self, now: DateTime<Utc>) {
        self.last_decision_at = Some(now);
    }
}

/// What a cycle propagates to the loop.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    /// The cancellation token fired.
    #[error("cycle cancelled")]
    Cancelled,

    /// The daily ledger could not be updated.
    #[error("ledger failure: {0}")]
    Ledger(#[from] LedgerError),

    /// An order batch stopped early.
    #[error("submission failure: {0}")]
    Submission(Box<SubmissionFailure>),
}

/// Per-tick orchestration of the trading pipeline.
pub struct TradingCycle<L, B, A>
where
    L: DailyRiskLedger,
    B: BrokerPort,
    A: AuditSinkPort,
{
    risk: EvaluateRiskUseCase<L>,
    planner: ExecutionPlanner,
    submitter: OrderSubmitter<B>,
    audit: Arc<A>,
    decision_interval: Duration,
}

impl<L, B, A> TradingCycle<L, B, A>
where
    L: DailyRiskLedger,
    B: BrokerPort,
    A: AuditSinkPort,
{
    /// Create a new TradingCycle.
    pub const fn new(
        risk: EvaluateRiskUseCase<L>,
        planner: ExecutionPlanner,
        submitter: OrderSubmitter<B>,
        audit: Arc<A>,
        decision_interval: Duration,
    ) -> Self {
        Self {
            risk,
            planner,
            submitter,
            audit,
            decision_interval,
        }
    }

    /// Run every asset in `snapshots` concurrently.
    ///
    /// Schedules are taken out of `schedules` for the duration of the tick
    /// and put back afterwards; assets seen for the first time get a fresh
    /// schedule.
    pub async fn run_tick(
        &self,
        cancel: &CancellationToken,
        schedules: &mut HashMap<String, AssetSchedule>,
        snapshots: Vec<AssetSnapshot>,
        now: DateTime<Utc>,
    ) -> Vec<(String, Result<CycleOutcome, CycleError>)> {
        let runs: Vec<_> = snapshots
            .into_iter()
            .map(|snapshot| {
                let mut schedule = schedules
                    .remove(&snapshot.asset)
                    .unwrap_or_else(|| AssetSchedule::new(snapshot.asset.clone()));
                async move {
                    let outcome = self.run_asset(cancel, &mut schedule, &snapshot, now).await;
                    (schedule, outcome)
                }
            })
            .collect();

        let finished = join_all(runs).await;

        finished
            .into_iter()
            .map(|(schedule, outcome)| {
                let asset = schedule.asset.clone();
                schedules.insert(asset.clone(), schedule);
                (asset, outcome)
            })
            .collect()
    }

    /// Run the pipeline for one asset.
    pub async fn run_asset(
        &self,
        cancel: &CancellationToken,
        schedule: &mut AssetSchedule,
        snapshot: &AssetSnapshot,
        now: DateTime<Utc>,
    ) -> Result<CycleOutcome, CycleError> {
        if cancel.is_cancelled() {
            return Err(CycleError::Cancelled);
        }
        if !schedule.is_due(now, self.decision_interval) {
            return Ok(CycleOutcome::NotDue);
        }

        let Some(decision) = snapshot.decision.as_ref() else {
            tracing::debug!(asset = %snapshot.asset, "No decision available");
            return Ok(CycleOutcome::NoDecision);
        };

        let input = RiskInput {
            decision,
            features: &snapshot.features,
            position: &snapshot.position,
            account: &snapshot.account,
            market_price: snapshot.market_price,
        };

        let evaluation = match self.risk.execute(&input).await {
            Ok(evaluation) => evaluation,
            Err(e) => {
                self.audit_error(&snapshot.asset, "risk", &e.to_string()).await;
                return Err(CycleError::Ledger(e));
            }
        };
        schedule.mark(now);

        self.audit(AuditEvent::RiskEvaluation {
            asset: snapshot.asset.clone(),
            result: evaluation.clone(),
        })
        .await;

        if !evaluation.is_proceed() {
            return Ok(CycleOutcome::Denied { evaluation });
        }

        let plan = ExecutionPlan::from_evaluation(
            snapshot.asset.clone(),
            decision.clone(),
            evaluation.clone(),
            snapshot.account.clone(),
            snapshot.position.clone(),
            snapshot.market_price,
        );

        let orders = match self.planner.build(&plan) {
            Ok(orders) => orders,
            Err(e) => {
                record_plan_rejection(e.reason());
                tracing::info!(asset = %snapshot.asset, reason = %e, "No orders planned");
                return Ok(CycleOutcome::NothingToDo {
                    evaluation,
                    reason: e.to_string(),
                });
            }
        };

        self.audit(AuditEvent::ExecutionPlan {
            plan: Box::new(plan),
            orders: orders.clone(),
        })
        .await;

        let symbol = Symbol::new(&snapshot.symbol);
        match self.submitter.execute(cancel, &symbol, orders).await {
            Ok(result) => {
                self.audit(AuditEvent::Execution {
                    asset: snapshot.asset.clone(),
                    symbol: symbol.to_string(),
                    result: result.clone(),
                })
                .await;
                Ok(CycleOutcome::Executed { evaluation, result })
            }
            Err(failure) => {
                self.audit(AuditEvent::Execution {
                    asset: snapshot.asset.clone(),
                    symbol: symbol.to_string(),
                    result: failure.result.clone(),
                })
                .await;
                self.audit_error(&snapshot.asset, "submit", &failure.error.to_string())
                    .await;
                if failure.error.is_cancelled() {
                    Err(CycleError::Cancelled)
                } else {
                    Err(CycleError::Submission(Box::new(failure)))
                }
            }
        }
    }

    async fn audit(&self, event: AuditEvent) {
        if let Err(e) = self.audit.record(&event).await {
            tracing::warn!(event_type = event.event_type(), error = %e, "Audit sink failed");
        }
    }

    async fn audit_error(&self, asset: &str, stage: &str, message: &str) {
        self.audit(AuditEvent::Error {
            asset: asset.to_string(),
            stage: stage.to_string(),
            message: message.to_string(),
        })
        .await;
    }
}
