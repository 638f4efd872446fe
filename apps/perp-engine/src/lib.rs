// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Perp Engine - Rust Core Library
//!
//! Risk evaluation and execution planning for perpetual futures.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, services)
//!   - `decision`: The trade recommendation and its validation
//!   - `market`: Feature snapshot, account state, position summary
//!   - `risk_management`: Daily risk ledger, risk evaluation, trading day
//!   - `order_execution`: Execution plan, order requests, planner
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interfaces for external systems (`BrokerPort`, `AuditSinkPort`)
//!   - `use_cases`: `EvaluateRisk`, `OrderSubmitter`, `TradingCycle`
//!   - `dto`: Per-asset cycle input and outcome
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Turso and in-memory ledgers, audit table
//!   - `broker`: Wire format, simulated broker
//!   - `source`: Snapshot file reader

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Bounded retry for broker calls.
pub mod broker;

/// Configuration loading and validation.
pub mod config;

/// Metrics and logging.
pub mod observability;

// =============================================================================
// Re-exports
// =============================================================================

pub use application::use_cases::{
    EvaluateRiskUseCase, OrderSubmitter, SubmissionFailure, SubmitError, TradingCycle,
};
pub use domain::order_execution::{ExecutionPlan, ExecutionPlanner, OrderRequest, PlanError};
pub use domain::risk_management::{
    DailyRiskLedger, DailyStatus, EvaluationResult, EvaluationStatus, RiskEvaluator, RiskLimits,
};
