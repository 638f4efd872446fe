//! Risk Management Bounded Context
//!
//! Vets a recommendation before anything reaches the broker.
//!
//! # Key Concepts
//!
//! - **Daily Risk Ledger**: Per-trading-day equity tracker with a sticky halt flag
//! - **Risk Evaluation**: Sizes target exposure by stop distance, confidence and exposure cap
//! - **Trading Day**: 24h window starting at a configurable UTC hour

pub mod errors;
pub mod repository;
pub mod services;
pub mod value_objects;

pub use errors::{LedgerError, RiskError};
pub use repository::DailyRiskLedger;
pub use services::{RiskEvaluator, confidence_factor, select_stop, stop_distance, trading_day};
pub use value_objects::{
    DailyStatus, EvaluationResult, EvaluationStatus, LedgerSettings, RiskActivity, RiskEvent,
    RiskInput, RiskLimits,
};
