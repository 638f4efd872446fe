//! Order Execution Aggregates

mod execution_plan;
mod execution_result;
mod order_request;

pub use execution_plan::ExecutionPlan;
pub use execution_result::ExecutionResult;
pub use order_request::OrderRequest;
