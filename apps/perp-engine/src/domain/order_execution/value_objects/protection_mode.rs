//! How protective exits are attached to a position change.

use serde::{Deserialize, Serialize};

/// Broker capability for protective exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionMode {
    /// The broker accepts stop and take levels as parameters of the primary order.
    Embedded,
    /// Stop and take are sent as separate reduce-only trigger orders.
    #[default]
    Separate,
}
