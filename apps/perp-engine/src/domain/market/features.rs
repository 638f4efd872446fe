//! Market feature snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indicator values for one symbol at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    /// Contract symbol.
    pub symbol: String,
    /// When the snapshot was computed.
    pub generated_at: DateTime<Utc>,
    /// Average true range in price units.
    #[serde(default)]
    pub atr_absolute: f64,
}

impl FeatureSnapshot {
    /// Create a snapshot carrying only the ATR.
    #[must_use]
    pub fn new(symbol: impl Into<String>, atr_absolute: f64) -> Self {
        Self {
            symbol: symbol.into(),
            generated_at: Utc::now(),
            atr_absolute,
        }
    }
}
