//! Protective trigger type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which exit a protective trigger order implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Exit at a loss.
    StopLoss,
    /// Exit at a profit.
    TakeProfit,
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopLoss => write!(f, "stop_loss"),
            Self::TakeProfit => write!(f, "take_profit"),
        }
    }
}
