//! Risk Management Value Objects

mod daily_status;
mod evaluation;
mod risk_event;
mod risk_limits;

pub use daily_status::DailyStatus;
pub use evaluation::{EvaluationResult, EvaluationStatus, RiskInput};
pub use risk_event::{RiskActivity, RiskEvent};
pub use risk_limits::{LedgerSettings, RiskLimits};
