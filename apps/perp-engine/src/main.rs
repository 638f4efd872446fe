//! Perp Engine Binary
//!
//! Runs the risk evaluation and execution loop for perpetual futures.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin perp-engine
//! ```
//!
//! # Environment Variables
//!
//! - `PERP_ENGINE_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `RUST_LOG`: Log filter, overrides `observability.logging.level`

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use perp_engine::application::ports::{
    AuditSinkPort, SnapshotSourcePort, TracingAuditSink,
};
use perp_engine::application::use_cases::{
    AssetSchedule, CycleError, EvaluateRiskUseCase, OrderSubmitter, TradingCycle,
};
use perp_engine::config::{Config, load_config};
use perp_engine::domain::order_execution::ExecutionPlanner;
use perp_engine::domain::risk_management::{DailyRiskLedger, RiskEvaluator};
use perp_engine::domain::shared::Symbol;
use perp_engine::infrastructure::broker::SimulatedBroker;
use perp_engine::infrastructure::persistence::{
    InMemoryRiskLedger, TursoAuditSink, TursoRiskLedger, TursoStore,
};
use perp_engine::infrastructure::source::JsonFileSource;
use perp_engine::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    let config_path = std::env::var("PERP_ENGINE_CONFIG").ok();
    let config = load_config(config_path.as_deref()).context("loading configuration")?;

    init_tracing(&config.observability.logging).context("initializing tracing")?;
    tracing::info!("Starting perp engine");

    if config.observability.metrics.enabled {
        let addr = config
            .observability
            .metrics
            .socket_addr()
            .context("parsing metrics listen address")?;
        init_metrics(addr).context("installing metrics exporter")?;
    }

    if !config.execution.simulation {
        bail!("no live venue adapter is available; set execution.simulation to true");
    }

    log_config(&config);

    let shutdown = CancellationToken::new();
    spawn_shutdown_listener(shutdown.clone());

    let settings = config
        .risk
        .limits()
        .ledger_settings()
        .context("validating ledger settings")?;

    if config.persistence.in_memory {
        tracing::warn!("In-memory persistence: daily ledger does not survive restarts");
        let ledger = Arc::new(InMemoryRiskLedger::new(settings));
        run(&config, ledger, Arc::new(TracingAuditSink), shutdown).await
    } else {
        let store = TursoStore::open(&config.persistence.db_path)
            .await
            .context("opening database")?;
        let ledger = TursoRiskLedger::new(store.connect()?, settings)
            .await
            .context("preparing risk ledger")?;
        let audit = TursoAuditSink::new(store.connect()?)
            .await
            .context("preparing audit table")?;
        run(&config, Arc::new(ledger), Arc::new(audit), shutdown).await
    }
}

/// Drive the scheduling loop until shutdown.
async fn run<L, A>(
    config: &Config,
    ledger: Arc<L>,
    audit: Arc<A>,
    shutdown: CancellationToken,
) -> anyhow::Result<()>
where
    L: DailyRiskLedger + 'static,
    A: AuditSinkPort + 'static,
{
    let evaluator = RiskEvaluator::new(config.risk.limits()).context("validating risk limits")?;
    let broker = Arc::new(SimulatedBroker::new());

    let cycle = TradingCycle::new(
        EvaluateRiskUseCase::new(ledger, evaluator),
        ExecutionPlanner::new(config.execution.planner_settings()),
        OrderSubmitter::new(broker, config.execution.retry_policy()),
        audit,
        config.scheduler.decision_interval(),
    );
    let source = JsonFileSource::new(&config.source.snapshot_path);

    let mut schedules: HashMap<String, AssetSchedule> = config
        .assets
        .iter()
        .map(|a| (a.asset.clone(), AssetSchedule::new(a.asset.clone())))
        .collect();
    let tracked: Vec<Symbol> = config.assets.iter().map(|a| Symbol::new(&a.symbol)).collect();

    let mut interval = tokio::time::interval(config.scheduler.loop_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!("Perp engine ready");

    loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break,
            _ = interval.tick() => {}
        }

        let snapshots = match source.load().await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::warn!(error = %e, "Snapshot unavailable, skipping tick");
                continue;
            }
        };

        let snapshots = snapshots
            .into_iter()
            .filter(|s| tracked.is_empty() || tracked.contains(&Symbol::new(&s.symbol)))
            .collect();

        for (asset, outcome) in cycle
            .run_tick(&shutdown, &mut schedules, snapshots, Utc::now())
            .await
        {
            match outcome {
                Ok(outcome) => tracing::info!(asset = %asset, outcome = outcome.label(), "Cycle finished"),
                Err(CycleError::Cancelled) => tracing::info!(asset = %asset, "Cycle cancelled"),
                Err(e) => tracing::error!(asset = %asset, error = %e, "Cycle failed"),
            }
        }
    }

    tracing::info!("Perp engine stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &Config) {
    tracing::info!(
        max_trade_risk = config.risk.max_trade_risk,
        max_daily_loss = config.risk.max_daily_loss,
        max_exposure = config.risk.max_exposure,
        protection_mode = ?config.execution.protection_mode,
        in_memory = config.persistence.in_memory,
        loop_interval_secs = config.scheduler.loop_interval_secs,
        decision_interval_secs = config.scheduler.decision_interval_secs,
        assets = config.assets.len(),
        "Configuration loaded"
    );
}

/// Cancel `shutdown` on Ctrl-C.
fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown"),
            Err(e) => tracing::error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
        }
        shutdown.cancel();
    });
}
