//! Risk Pipeline Integration Tests
//!
//! Drives snapshots through the full cycle: daily ledger, risk evaluation,
//! execution planning and order submission.
//!
//! Covers:
//! - Stop-distance sizing of a fresh long
//! - Daily halt tripping and staying set for the rest of the day
//! - Confidence tiers
//! - Full closes while halted
//! - Partial batch failure and cancellation

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::unreadable_literal)]

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use perp_engine::application::dto::{AssetSnapshot, CycleOutcome};
use perp_engine::application::ports::{
    BrokerError, BrokerPort, NoOpAuditSink, OrderAck, SnapshotSourcePort,
};
use perp_engine::application::use_cases::{AssetSchedule, CycleError, SubmitError};
use perp_engine::broker::RetryPolicy;
use perp_engine::domain::decision::Decision;
use perp_engine::domain::market::{AccountState, FeatureSnapshot, PositionSummary};
use perp_engine::domain::order_execution::{OrderSide, OrderType, TriggerType};
use perp_engine::domain::shared::Symbol;
use perp_engine::infrastructure::broker::SimulatedBroker;
use perp_engine::infrastructure::persistence::InMemoryRiskLedger;
use perp_engine::infrastructure::source::JsonFileSource;
use perp_engine::{
    EvaluateRiskUseCase, EvaluationStatus, ExecutionPlanner, OrderRequest, OrderSubmitter,
    RiskEvaluator, RiskLimits, TradingCycle,
};
use tokio_util::sync::CancellationToken;

// ============================================
// Helpers
// ============================================

const BTC: &str = "BTC/USDC:USDC";

/// Broker that replays a fixed script of responses and records every call.
#[derive(Default)]
struct ScriptedBroker {
    script: Mutex<VecDeque<Result<(), BrokerError>>>,
    calls: Mutex<Vec<OrderRequest>>,
}

impl ScriptedBroker {
    fn new(script: Vec<Result<(), BrokerError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<OrderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokerPort for ScriptedBroker {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn submit_order(
        &self,
        _symbol: &Symbol,
        order: &OrderRequest,
    ) -> Result<OrderAck, BrokerError> {
        self.calls.lock().unwrap().push(order.clone());
        let next = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
        next.map(|()| OrderAck {
            broker_order_id: format!("scripted-{}", self.calls.lock().unwrap().len()),
            client_order_id: order.client_order_id.clone(),
            accepted_at: Utc::now(),
        })
    }
}

type Cycle<B> = TradingCycle<InMemoryRiskLedger, B, NoOpAuditSink>;

fn cycle_with<B: BrokerPort>(broker: Arc<B>) -> (Arc<InMemoryRiskLedger>, Cycle<B>) {
    let limits = RiskLimits::default();
    let ledger = Arc::new(InMemoryRiskLedger::new(limits.ledger_settings().unwrap()));
    let cycle = TradingCycle::new(
        EvaluateRiskUseCase::new(Arc::clone(&ledger), RiskEvaluator::new(limits).unwrap()),
        ExecutionPlanner::default(),
        OrderSubmitter::new(broker, RetryPolicy::new(2, StdDuration::from_millis(1))),
        Arc::new(NoOpAuditSink),
        Duration::hours(1),
    );
    (ledger, cycle)
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
}

fn open_long(confidence: f64) -> Decision {
    Decision {
        symbol: BTC.to_string(),
        intent: "OPEN".to_string(),
        direction: "LONG".to_string(),
        target_exposure_pct: 0.10,
        confidence,
        reasoning: "breakout above range".to_string(),
        stop_loss: "45000".to_string(),
        take_profit: "52000".to_string(),
        ..Decision::default()
    }
}

fn close_all() -> Decision {
    Decision {
        symbol: BTC.to_string(),
        intent: "CLOSE".to_string(),
        direction: "FLAT".to_string(),
        confidence: 0.3,
        reasoning: "invalidated".to_string(),
        ..Decision::default()
    }
}

fn snapshot(decision: Decision, equity: f64, current: f64, now: DateTime<Utc>) -> AssetSnapshot {
    AssetSnapshot {
        asset: "BTC".to_string(),
        symbol: BTC.to_string(),
        market_price: 50_000.0,
        decision: Some(decision),
        features: FeatureSnapshot::new(BTC, 0.0),
        position: PositionSummary::flat(),
        account: AccountState::new(equity, current).at(now),
    }
}

async fn run_once<B: BrokerPort>(
    cycle: &Cycle<B>,
    schedule: &mut AssetSchedule,
    snapshot: AssetSnapshot,
) -> Result<CycleOutcome, CycleError> {
    let now = snapshot.account.timestamp;
    cycle
        .run_asset(&CancellationToken::new(), schedule, &snapshot, now)
        .await
}

// ============================================
// Sizing
// ============================================

#[tokio::test]
async fn test_open_long_is_sized_by_stop_distance() {
    let broker = Arc::new(SimulatedBroker::new());
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedule = AssetSchedule::new("BTC");

    let outcome = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 100_000.0, 0.0, at(12)))
        .await
        .unwrap();

    let CycleOutcome::Executed { evaluation, result } = outcome else {
        panic!("expected execution, got {}", outcome.label());
    };
    assert!((evaluation.target_exposure_percent - 0.10).abs() < 1e-9);
    assert_eq!(evaluation.recommended_stop_loss, Some(45_000.0));
    assert!((evaluation.risk_amount - 1_000.0).abs() < 1e-9);

    assert!(result.executed);
    assert_eq!(result.orders.len(), 3);

    let primary = &result.orders[0];
    assert_eq!(primary.order_type, OrderType::Market);
    assert_eq!(primary.side, OrderSide::Buy);
    assert!((primary.amount - 0.2).abs() < 1e-9);
    assert!(!primary.reduce_only);

    assert_eq!(result.orders[1].trigger_type, Some(TriggerType::StopLoss));
    assert_eq!(result.orders[2].trigger_type, Some(TriggerType::TakeProfit));
    assert!(result.orders[1..].iter().all(|o| o.reduce_only && o.side == OrderSide::Sell));

    let wire = broker.submitted();
    assert_eq!(wire.len(), 3);
    assert_eq!(wire[0].symbol, BTC);
}

#[tokio::test]
async fn test_confidence_tiers_scale_the_risk_budget() {
    let broker = Arc::new(SimulatedBroker::new());
    let (_ledger, cycle) = cycle_with(broker);

    let mut full = AssetSchedule::new("BTC");
    let outcome = run_once(&cycle, &mut full, snapshot(open_long(0.85), 100_000.0, 0.0, at(10)))
        .await
        .unwrap();
    let CycleOutcome::Executed { evaluation, .. } = outcome else {
        panic!("expected execution, got {}", outcome.label());
    };
    assert_eq!(evaluation.confidence_applied, 1.0);

    let mut half = AssetSchedule::new("BTC");
    let outcome = run_once(&cycle, &mut half, snapshot(open_long(0.65), 100_000.0, 0.0, at(11)))
        .await
        .unwrap();
    let CycleOutcome::Executed { evaluation, result } = outcome else {
        panic!("expected execution, got {}", outcome.label());
    };
    assert_eq!(evaluation.confidence_applied, 0.5);
    assert!((evaluation.target_exposure_percent - 0.05).abs() < 1e-9);
    assert!((result.orders[0].amount - 0.1).abs() < 1e-9);

    let mut low = AssetSchedule::new("BTC");
    let outcome = run_once(&cycle, &mut low, snapshot(open_long(0.40), 100_000.0, 0.0, at(12)))
        .await
        .unwrap();
    let CycleOutcome::Denied { evaluation } = outcome else {
        panic!("expected denial, got {}", outcome.label());
    };
    assert_eq!(evaluation.status, EvaluationStatus::Deny);
    assert!(evaluation.reason().unwrap().contains("confidence"));
}

// ============================================
// Daily halt
// ============================================

#[tokio::test]
async fn test_daily_halt_blocks_increases_for_the_rest_of_the_day() {
    let broker = Arc::new(SimulatedBroker::new());
    let (ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedule = AssetSchedule::new("BTC");

    // Opening observation; below the confidence threshold so nothing trades.
    let first = run_once(&cycle, &mut schedule, snapshot(open_long(0.40), 100_000.0, 0.0, at(9)))
        .await
        .unwrap();
    assert_eq!(first.label(), "denied");

    // 3.5% down on a 3% limit.
    let second = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 96_500.0, 0.0, at(10)))
        .await
        .unwrap();
    let CycleOutcome::Denied { evaluation } = second else {
        panic!("expected denial, got {}", second.label());
    };
    assert!(evaluation.daily_status.halted);
    assert!((evaluation.daily_status.loss_percent + 0.035).abs() < 1e-9);
    assert!(evaluation.reason().unwrap().contains("halted"));

    // Equity recovers, the halt stays.
    let third = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 101_000.0, 0.0, at(11)))
        .await
        .unwrap();
    let CycleOutcome::Denied { evaluation } = third else {
        panic!("expected denial, got {}", third.label());
    };
    assert!(evaluation.daily_status.halted);

    let status = ledger.status("2024-05-01").unwrap();
    assert!(status.halted);
    assert_eq!(status.start_equity, 100_000.0);
    assert_eq!(
        ledger
            .events()
            .iter()
            .filter(|e| e.event_type == "daily_halt")
            .count(),
        1
    );
    assert!(broker.submitted().is_empty());
}

#[tokio::test]
async fn test_full_close_is_allowed_while_halted() {
    let broker = Arc::new(SimulatedBroker::new());
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedule = AssetSchedule::new("BTC");

    // Opening observation; below the confidence threshold so nothing trades.
    run_once(&cycle, &mut schedule, snapshot(open_long(0.40), 100_000.0, 0.0, at(9)))
        .await
        .unwrap();
    assert!(broker.submitted().is_empty());

    let outcome = run_once(&cycle, &mut schedule, snapshot(close_all(), 96_000.0, 0.12, at(10)))
        .await
        .unwrap();

    let CycleOutcome::Executed { evaluation, result } = outcome else {
        panic!("expected execution, got {}", outcome.label());
    };
    assert!(evaluation.daily_status.halted);
    assert_eq!(evaluation.target_exposure_percent, 0.0);

    assert_eq!(result.orders.len(), 1);
    let primary = &result.orders[0];
    assert_eq!(primary.side, OrderSide::Sell);
    assert!(primary.reduce_only);
    assert!(primary.close_all);
    assert!((primary.amount - 0.12 * 96_000.0 / 50_000.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_next_trading_day_starts_unhalted() {
    let broker = Arc::new(SimulatedBroker::new());
    let (ledger, cycle) = cycle_with(broker);
    let mut schedule = AssetSchedule::new("BTC");

    run_once(&cycle, &mut schedule, snapshot(open_long(0.40), 100_000.0, 0.0, at(9)))
        .await
        .unwrap();
    run_once(&cycle, &mut schedule, snapshot(open_long(0.40), 96_000.0, 0.0, at(10)))
        .await
        .unwrap();
    assert!(ledger.status("2024-05-01").unwrap().halted);

    let tomorrow = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
    let outcome = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 96_000.0, 0.0, tomorrow))
        .await
        .unwrap();

    let CycleOutcome::Executed { evaluation, .. } = outcome else {
        panic!("expected execution, got {}", outcome.label());
    };
    assert!(!evaluation.daily_status.halted);
    assert_eq!(evaluation.daily_status.trading_date, "2024-05-02");
    assert_eq!(evaluation.daily_status.start_equity, 96_000.0);
}

// ============================================
// Submission failures
// ============================================

#[tokio::test]
async fn test_partial_failure_keeps_accepted_orders() {
    let broker = Arc::new(ScriptedBroker::new(vec![
        Ok(()),
        Err(BrokerError::OrderRejected {
            reason: "trigger price out of band".to_string(),
        }),
    ]));
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedule = AssetSchedule::new("BTC");

    let error = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 100_000.0, 0.0, at(12)))
        .await
        .unwrap_err();

    let failure = match error {
        CycleError::Submission(failure) => failure,
        other => panic!("expected submission failure, got {other}"),
    };
    assert!(!failure.result.executed);
    assert_eq!(failure.result.orders.len(), 1);
    assert_eq!(failure.result.orders[0].order_type, OrderType::Market);
    assert!(matches!(
        failure.error,
        SubmitError::Fatal {
            index: 1,
            attempt: 1,
            ..
        }
    ));
    assert!(
        failure
            .result
            .notes
            .iter()
            .any(|n| n.contains("trigger price out of band"))
    );

    // The take-profit is never attempted.
    assert_eq!(broker.calls().len(), 2);
    assert!(schedule.last_decision_at.is_some());
}

#[tokio::test]
async fn test_transient_failure_is_retried_with_the_same_order() {
    let broker = Arc::new(ScriptedBroker::new(vec![Err(BrokerError::RateLimited)]));
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedule = AssetSchedule::new("BTC");

    let outcome = run_once(&cycle, &mut schedule, snapshot(open_long(0.85), 100_000.0, 0.0, at(12)))
        .await
        .unwrap();
    assert_eq!(outcome.label(), "executed");

    let calls = broker.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].client_order_id, calls[1].client_order_id);
}

#[tokio::test]
async fn test_cancelled_tick_submits_nothing() {
    let broker = Arc::new(ScriptedBroker::new(Vec::new()));
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let mut schedules = HashMap::new();
    let outcomes = cycle
        .run_tick(
            &cancel,
            &mut schedules,
            vec![snapshot(open_long(0.85), 100_000.0, 0.0, at(12))],
            at(12),
        )
        .await;

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0].1, Err(CycleError::Cancelled)));
    assert!(broker.calls().is_empty());
    assert!(schedules["BTC"].last_decision_at.is_none());
}

#[tokio::test]
async fn test_submitter_rejects_non_positive_amount_before_any_call() {
    let broker = Arc::new(ScriptedBroker::new(Vec::new()));
    let submitter = OrderSubmitter::new(Arc::clone(&broker), RetryPolicy::default());

    let bad = OrderRequest::market(OrderSide::Buy, 0.0, 50_000.0, Default::default());
    let good = OrderRequest::market(OrderSide::Buy, 0.1, 50_000.0, Default::default());

    let failure = submitter
        .execute(&CancellationToken::new(), &Symbol::new(BTC), vec![good, bad])
        .await
        .unwrap_err();

    assert!(matches!(failure.error, SubmitError::InvalidOrder { index: 1, .. }));
    assert!(broker.calls().is_empty());
}

// ============================================
// Fixture-driven tick
// ============================================

#[tokio::test]
async fn test_fixture_snapshot_drives_a_full_tick() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures/snapshot.json");
    let snapshots = JsonFileSource::new(&path).load().await.unwrap();
    assert_eq!(snapshots.len(), 3);

    let broker = Arc::new(SimulatedBroker::new());
    let (_ledger, cycle) = cycle_with(Arc::clone(&broker));
    let mut schedules = HashMap::new();

    let outcomes: HashMap<_, _> = cycle
        .run_tick(&CancellationToken::new(), &mut schedules, snapshots, at(12))
        .await
        .into_iter()
        .collect();

    assert_eq!(outcomes["BTC"].as_ref().unwrap().label(), "executed");
    assert_eq!(outcomes["ETH"].as_ref().unwrap().label(), "denied");
    // SOL's decision fails validation and is dropped by the source.
    assert_eq!(outcomes["SOL"].as_ref().unwrap(), &CycleOutcome::NoDecision);

    assert_eq!(broker.submitted().len(), 3);
    assert_eq!(schedules.len(), 3);
    assert!(schedules["SOL"].last_decision_at.is_none());
}
