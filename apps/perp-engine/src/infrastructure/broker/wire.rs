//! Venue wire format.
//!
//! Typed order requests become this shape only at the submission boundary.
//! Amounts and prices travel as decimal strings; venue flags travel in a
//! camelCase parameter map.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::BrokerError;
use crate::domain::order_execution::{
    OrderParameters, OrderRequest, format_price, format_slippage,
};
use crate::domain::shared::Symbol;

/// One order as the venue sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    /// Contract symbol.
    pub symbol: String,
    /// Client order ID.
    pub client_order_id: String,
    /// "market" or "limit".
    #[serde(rename = "type")]
    pub order_type: String,
    /// "buy" or "sell".
    pub side: String,
    /// Contract amount.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Reference or limit price.
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Venue parameter map.
    pub params: BTreeMap<String, Value>,
}

impl WireOrder {
    /// Convert a typed request.
    pub fn from_request(symbol: &Symbol, order: &OrderRequest) -> Result<Self, BrokerError> {
        Ok(Self {
            symbol: symbol.to_string(),
            client_order_id: order.client_order_id.clone(),
            order_type: order.order_type.as_str().to_string(),
            side: order.side.as_str().to_string(),
            amount: to_decimal("amount", order.amount)?,
            price: to_decimal("price", order.price)?,
            params: wire_params(&order.params),
        })
    }
}

/// Build the venue parameter map. Absent options and false flags are omitted,
/// except `reduceOnly`, which is always sent.
#[must_use]
pub fn wire_params(params: &OrderParameters) -> BTreeMap<String, Value> {
    let mut map = BTreeMap::new();
    map.insert("reduceOnly".to_string(), Value::Bool(params.reduce_only));
    if params.close_position {
        map.insert("closePosition".to_string(), Value::Bool(true));
    }
    if let Some(slippage) = params.slippage {
        map.insert("slippage".to_string(), Value::String(format_slippage(slippage)));
    }
    if let Some(tif) = params.time_in_force {
        map.insert("timeInForce".to_string(), Value::String(tif.wire().to_string()));
    }
    if params.post_only {
        map.insert("postOnly".to_string(), Value::Bool(true));
    }
    if let Some(price) = params.stop_loss_price {
        map.insert("stopLossPrice".to_string(), Value::String(format_price(price)));
    }
    if let Some(price) = params.take_profit_price {
        map.insert("takeProfitPrice".to_string(), Value::String(format_price(price)));
    }
    map
}

/// Shortest form when it fits, otherwise rounded to the 28 places a
/// `Decimal` can carry.
fn to_decimal(field: &str, value: f64) -> Result<Decimal, BrokerError> {
    let invalid = |reason: String| BrokerError::InvalidOrder {
        reason: format!("{field} {value} {reason}"),
    };
    let decimal = Decimal::from_str(&format_price(value))
        .or_else(|_| Decimal::from_str(&format!("{value:.28}")).map(|d| d.normalize()))
        .map_err(|e| invalid(format!("is not representable: {e}")))?;
    if decimal.is_zero() && value > 0.0 {
        return Err(invalid("is below decimal precision".to_string()));
    }
    Ok(decimal)
}
