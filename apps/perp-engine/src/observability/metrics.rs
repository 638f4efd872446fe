//! Prometheus metrics for the perp engine.
//!
//! Covers risk evaluation, the daily halt, planning and order submission.
//! Every recorder is a no-op until [`init_metrics`] installs an exporter.
//!
//! ```ignore
//! use perp_engine::observability::{init_metrics, record_order_submission};
//!
//! init_metrics("0.0.0.0:9090".parse()?)?;
//! record_order_submission("simulated", "accepted", "market", 0.015);
//! ```

use std::net::SocketAddr;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

/// Order latency histogram buckets in seconds (venue round trips, 10ms to 10s).
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Failure to bring up the exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The histogram buckets were rejected.
    #[error("invalid latency buckets: {0}")]
    Buckets(String),
    /// The listener or global recorder could not be installed.
    #[error("cannot install prometheus exporter on {addr}: {message}")]
    Install {
        /// Listener address.
        addr: SocketAddr,
        /// Underlying error.
        message: String,
    },
}

/// Install the global recorder and serve `/metrics` on `listen_addr`.
pub fn init_metrics(listen_addr: SocketAddr) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(listen_addr)
        .set_buckets_for_metric(
            Matcher::Full("order_latency_seconds".to_string()),
            LATENCY_BUCKETS,
        )
        .map_err(|e| MetricsError::Buckets(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Install {
            addr: listen_addr,
            message: e.to_string(),
        })?;

    tracing::info!(addr = %listen_addr, "Prometheus exporter listening");
    Ok(())
}

// ============================================================================
// Risk Metrics
// ============================================================================

/// Record a risk verdict.
///
/// # Arguments
///
/// * `symbol` - Contract symbol
/// * `status` - Verdict ("proceed" or "deny")
pub fn record_risk_evaluation(symbol: &str, status: &str) {
    counter!(
        "risk_evaluations_total",
        "symbol" => symbol.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a daily halt transition.
pub fn record_daily_halt() {
    counter!("daily_halts_total").increment(1);
}

/// Record a plan that produced no orders.
pub fn record_plan_rejection(reason: &str) {
    counter!("plan_rejections_total", "reason" => reason.to_string()).increment(1);
}

// ============================================================================
// Order Submission Metrics
// ============================================================================

/// Record an order submission.
///
/// # Arguments
///
/// * `broker` - Broker name (e.g., "simulated")
/// * `status` - Submission status (e.g., "accepted", "failed", "cancelled")
/// * `order_type` - Order kind (e.g., "market", "stop_loss", "take_profit")
/// * `latency_seconds` - Time from first attempt to final outcome in seconds
pub fn record_order_submission(broker: &str, status: &str, order_type: &str, latency_seconds: f64) {
    counter!(
        "order_submissions_total",
        "broker" => broker.to_string(),
        "status" => status.to_string(),
        "order_type" => order_type.to_string()
    )
    .increment(1);

    histogram!(
        "order_latency_seconds",
        "broker" => broker.to_string(),
        "order_type" => order_type.to_string()
    )
    .record(latency_seconds);
}

/// Record a retried order submission attempt.
pub fn record_order_retry(broker: &str) {
    counter!("order_retries_total", "broker" => broker.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_buckets_are_ascending() {
        assert!(LATENCY_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_recorders_without_exporter() {
        // Recording without an installed recorder must not panic
        record_risk_evaluation("BTC/USDC:USDC", "proceed");
        record_daily_halt();
        record_plan_rejection("already_at_target");
        record_order_submission("simulated", "accepted", "market", 0.015);
        record_order_retry("simulated");
    }
}
