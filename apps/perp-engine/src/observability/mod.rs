//! Observability module for metrics and logging.
//!
//! This module provides instrumentation for the perp engine,
//! including Prometheus metrics export and structured logging.

mod metrics;
mod tracing;

pub use self::metrics::{
    MetricsError, init_metrics, record_daily_halt, record_order_retry,
    record_order_submission, record_plan_rejection, record_risk_evaluation,
};
pub use self::tracing::{TracingError, init_tracing};
