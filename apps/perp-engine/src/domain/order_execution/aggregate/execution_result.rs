//! Outcome of submitting an order batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::OrderRequest;

/// What was submitted and whether the batch completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Orders accepted by the broker, in submission order.
    pub orders: Vec<OrderRequest>,
    /// True only when every order in the batch was accepted.
    pub executed: bool,
    /// When the batch finished.
    pub execution_time: DateTime<Utc>,
    /// Ordered notes, including the failure reason when aborted.
    pub notes: Vec<String>,
}

impl ExecutionResult {
    /// An empty, not-yet-executed result.
    #[must_use]
    pub fn pending() -> Self {
        Self {
            orders: Vec::new(),
            executed: false,
            execution_time: Utc::now(),
            notes: Vec::new(),
        }
    }
}
