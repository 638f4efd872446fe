//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod evaluate_risk;
mod run_cycle;
mod submit_orders;

pub use evaluate_risk::EvaluateRiskUseCase;
pub use run_cycle::{AssetSchedule, CycleError, TradingCycle};
pub use submit_orders::{OrderSubmitter, SubmissionFailure, SubmitError};
