//! Position summary.

use serde::{Deserialize, Serialize};

/// Side of an open position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    /// Long position.
    #[serde(rename = "LONG", alias = "long")]
    Long,
    /// Short position.
    #[serde(rename = "SHORT", alias = "short")]
    Short,
    /// No position.
    #[default]
    #[serde(rename = "", alias = "FLAT", alias = "flat")]
    Flat,
}

impl PositionSide {
    /// Sign of the position: long `1.0`, short `-1.0`, flat `0.0`.
    #[must_use]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Long => 1.0,
            Self::Short => -1.0,
            Self::Flat => 0.0,
        }
    }
}

/// Summary of the open position in one symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositionSummary {
    /// Position side.
    #[serde(default)]
    pub side: PositionSide,
    /// Position notional as a percentage of equity (0-100).
    #[serde(default)]
    pub size_percent: f64,
    /// Average entry price.
    #[serde(default)]
    pub entry_price: f64,
    /// Unrealized PnL as a percentage of margin.
    #[serde(default)]
    pub unrealized_pnl_percent: f64,
    /// Hours since the position was opened.
    #[serde(default, alias = "position_age_hours")]
    pub age_hours: f64,
    /// Active stop-loss price, 0 when unset.
    #[serde(default)]
    pub stop_loss: f64,
    /// Active take-profit price, 0 when unset.
    #[serde(default)]
    pub take_profit: f64,
}

impl PositionSummary {
    /// An empty (flat) summary.
    #[must_use]
    pub fn flat() -> Self {
        Self::default()
    }

    /// Signed exposure as a fraction of equity.
    #[must_use]
    pub fn signed_exposure(&self) -> f64 {
        self.side.sign() * self.size_percent.abs() / 100.0
    }

    /// Returns true when the summary describes an open position.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.side != PositionSide::Flat && self.size_percent.abs() > 0.0
    }
}
