//! Execution configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::broker::RetryPolicy;
use crate::domain::order_execution::{PlannerSettings, ProtectionMode, TimeInForce};

use super::default_true;

/// How orders are built and submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum slippage as a fraction of price.
    #[serde(default = "default_slippage")]
    pub slippage: f64,
    /// Time in force for primary orders.
    #[serde(default)]
    pub time_in_force: TimeInForce,
    /// Post-only flag for primary orders.
    #[serde(default)]
    pub post_only: bool,
    /// How protective exits are attached.
    #[serde(default)]
    pub protection_mode: ProtectionMode,
    /// Route orders to the simulated broker.
    #[serde(default = "default_true")]
    pub simulation: bool,
    /// Attempts per order, including the first.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// Backoff unit in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            slippage: default_slippage(),
            time_in_force: TimeInForce::default(),
            post_only: false,
            protection_mode: ProtectionMode::default(),
            simulation: true,
            max_retry_attempts: default_max_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl ExecutionConfig {
    /// Planner settings derived from this section.
    #[must_use]
    pub const fn planner_settings(&self) -> PlannerSettings {
        PlannerSettings {
            slippage: self.slippage,
            time_in_force: self.time_in_force,
            post_only: self.post_only,
            protection: self.protection_mode,
        }
    }

    /// Retry policy for order submission.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retry_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }
}

const fn default_slippage() -> f64 {
    0.005
}

const fn default_max_retry_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    1000
}
