//! Typed order parameters.
//!
//! These are the source of truth for venue parameters. They become the wire
//! parameter map only at the submission boundary.

use serde::{Deserialize, Serialize};

use super::TimeInForce;

/// Venue parameters attached to an order request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderParameters {
    /// The order may only shrink the position.
    pub reduce_only: bool,
    /// The order closes the whole position.
    pub close_position: bool,
    /// Maximum slippage as a fraction of price.
    pub slippage: Option<f64>,
    /// Time in force.
    pub time_in_force: Option<TimeInForce>,
    /// Post-only (maker) flag.
    pub post_only: bool,
    /// Stop-loss level, embedded or as the trigger of a protective order.
    pub stop_loss_price: Option<f64>,
    /// Take-profit level, embedded or as the trigger of a protective order.
    pub take_profit_price: Option<f64>,
}
