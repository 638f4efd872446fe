//! Paper broker.
//!
//! Accepts every well-formed order after converting it to the wire format,
//! and keeps what it accepted for inspection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::wire::WireOrder;
use crate::application::ports::{BrokerError, BrokerPort, OrderAck};
use crate::domain::order_execution::OrderRequest;
use crate::domain::shared::Symbol;

/// Simulated implementation of `BrokerPort`.
#[derive(Debug, Default)]
pub struct SimulatedBroker {
    sequence: AtomicU64,
    submitted: Mutex<Vec<WireOrder>>,
}

impl SimulatedBroker {
    /// Create a new simulated broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire orders accepted so far, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<WireOrder> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl BrokerPort for SimulatedBroker {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn submit_order(
        &self,
        symbol: &Symbol,
        order: &OrderRequest,
    ) -> Result<OrderAck, BrokerError> {
        let wire = WireOrder::from_request(symbol, order)?;
        let payload = serde_json::to_string(&wire).map_err(|e| BrokerError::InvalidOrder {
            reason: e.to_string(),
        })?;

        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(symbol = %symbol, sequence, payload = %payload, "Simulated order accepted");

        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(wire);

        Ok(OrderAck {
            broker_order_id: format!("sim-{sequence}"),
            client_order_id: order.client_order_id.clone(),
            accepted_at: Utc::now(),
        })
    }
}
