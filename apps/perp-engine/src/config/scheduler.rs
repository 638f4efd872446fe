//! Scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between ticks.
    #[serde(default = "default_loop_interval_secs")]
    pub loop_interval_secs: u64,
    /// Minimum seconds between decisions for one asset.
    #[serde(default = "default_decision_interval_secs")]
    pub decision_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            loop_interval_secs: default_loop_interval_secs(),
            decision_interval_secs: default_decision_interval_secs(),
        }
    }
}

impl SchedulerConfig {
    /// Tick period.
    #[must_use]
    pub const fn loop_interval(&self) -> Duration {
        Duration::from_secs(self.loop_interval_secs)
    }

    /// Per-asset decision interval.
    #[must_use]
    pub fn decision_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.decision_interval_secs).unwrap_or(i64::MAX))
    }
}

const fn default_loop_interval_secs() -> u64 {
    60
}

const fn default_decision_interval_secs() -> u64 {
    3600
}
