//! Order Execution Domain Services

mod execution_planner;
mod price_format;

pub use execution_planner::{ExecutionPlanner, PlannerSettings};
pub use price_format::{format_price, format_slippage, parse_price_string};
