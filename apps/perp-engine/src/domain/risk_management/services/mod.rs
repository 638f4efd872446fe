//! Risk Management Domain Services

mod risk_evaluator;
mod trading_day;

pub use risk_evaluator::{RiskEvaluator, confidence_factor, select_stop, stop_distance};
pub use trading_day::trading_day;
