//! Order Execution Bounded Context
//!
//! Converts an approved exposure change into concrete order requests.
//!
//! # Key Concepts
//!
//! - **Execution Plan**: Approved target exposure plus the context it was approved in
//! - **Order Request**: One broker order, primary or protective
//! - **Protection Mode**: Whether exits ride on the primary order or go separately

pub mod aggregate;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use aggregate::{ExecutionPlan, ExecutionResult, OrderRequest};
pub use errors::PlanError;
pub use services::{
    ExecutionPlanner, PlannerSettings, format_price, format_slippage, parse_price_string,
};
pub use value_objects::{
    OrderParameters, OrderSide, OrderType, ProtectionMode, TimeInForce, TriggerType,
};
