//! A single order to submit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order_execution::value_objects::{
    OrderParameters, OrderSide, OrderType, TriggerType,
};

/// One order as produced by the planner.
///
/// Submitted verbatim; retries reuse the same `client_order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Client order id for broker-side de-duplication.
    pub client_order_id: String,
    /// Market or limit.
    pub order_type: OrderType,
    /// Buy or sell.
    pub side: OrderSide,
    /// Size in base units, always positive.
    pub amount: f64,
    /// Reference price (market price for the primary, trigger for protection).
    pub price: f64,
    /// The order may only shrink the position.
    pub reduce_only: bool,
    /// The order closes the whole position.
    pub close_all: bool,
    /// Protective trigger order.
    pub is_trigger: bool,
    /// Trigger kind for protective orders.
    pub trigger_type: Option<TriggerType>,
    /// Trigger price for protective orders.
    pub trigger_price: Option<f64>,
    /// Venue parameters.
    pub params: OrderParameters,
}

impl OrderRequest {
    /// Create a market order request.
    #[must_use]
    pub fn market(side: OrderSide, amount: f64, price: f64, params: OrderParameters) -> Self {
        Self {
            client_order_id: new_client_order_id(),
            order_type: OrderType::Market,
            side,
            amount,
            price,
            reduce_only: params.reduce_only,
            close_all: params.close_position,
            is_trigger: false,
            trigger_type: None,
            trigger_price: None,
            params,
        }
    }

    /// Create a reduce-only protective trigger order.
    #[must_use]
    pub fn protective(
        trigger_type: TriggerType,
        side: OrderSide,
        amount: f64,
        trigger_price: f64,
        params: OrderParameters,
    ) -> Self {
        Self {
            client_order_id: new_client_order_id(),
            order_type: OrderType::Limit,
            side,
            amount,
            price: trigger_price,
            reduce_only: true,
            close_all: false,
            is_trigger: true,
            trigger_type: Some(trigger_type),
            trigger_price: Some(trigger_price),
            params,
        }
    }

    /// Short label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self.trigger_type {
            Some(TriggerType::StopLoss) => "stop_loss",
            Some(TriggerType::TakeProfit) => "take_profit",
            None => self.order_type.as_str(),
        }
    }
}

fn new_client_order_id() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_order_ids_are_unique_hex() {
        let a = OrderRequest::market(OrderSide::Buy, 1.0, 100.0, OrderParameters::default());
        let b = OrderRequest::market(OrderSide::Buy, 1.0, 100.0, OrderParameters::default());
        assert_ne!(a.client_order_id, b.client_order_id);
        assert!(a.client_order_id.starts_with("0x"));
        assert_eq!(a.client_order_id.len(), 34);
    }

    #[test]
    fn protective_orders_are_reduce_only_triggers() {
        let order = OrderRequest::protective(
            TriggerType::StopLoss,
            OrderSide::Sell,
            0.2,
            45_000.0,
            OrderParameters::default(),
        );
        assert!(order.reduce_only);
        assert!(order.is_trigger);
        assert_eq!(order.trigger_price, Some(45_000.0));
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.kind(), "stop_loss");
    }
}
