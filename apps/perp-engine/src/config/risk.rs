//! Risk limit configuration.

use serde::{Deserialize, Serialize};

use crate::domain::risk_management::RiskLimits;

/// Risk limits as read from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Fraction of equity risked per trade.
    #[serde(default = "default_max_trade_risk")]
    pub max_trade_risk: f64,
    /// Daily drawdown that halts new risk.
    #[serde(default = "default_max_daily_loss")]
    pub max_daily_loss: f64,
    /// Cap on absolute exposure per symbol.
    #[serde(default = "default_max_exposure")]
    pub max_exposure: f64,
    /// Confidence at or above which the full risk budget applies.
    #[serde(default = "default_confidence_full_risk")]
    pub confidence_full_risk: f64,
    /// Confidence at or above which half the risk budget applies.
    #[serde(default = "default_confidence_half_risk")]
    pub confidence_half_risk: f64,
    /// UTC hour at which a trading day starts.
    #[serde(default)]
    pub daily_loss_reset_hour: u32,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_trade_risk: default_max_trade_risk(),
            max_daily_loss: default_max_daily_loss(),
            max_exposure: default_max_exposure(),
            confidence_full_risk: default_confidence_full_risk(),
            confidence_half_risk: default_confidence_half_risk(),
            daily_loss_reset_hour: 0,
        }
    }
}

impl RiskConfig {
    /// Domain limits for the evaluator and ledger.
    #[must_use]
    pub const fn limits(&self) -> RiskLimits {
        RiskLimits {
            max_trade_risk: self.max_trade_risk,
            max_daily_loss: self.max_daily_loss,
            max_exposure: self.max_exposure,
            confidence_full_risk: self.confidence_full_risk,
            confidence_half_risk: self.confidence_half_risk,
            daily_loss_reset_hour: self.daily_loss_reset_hour,
        }
    }
}

const fn default_max_trade_risk() -> f64 {
    0.01
}

const fn default_max_daily_loss() -> f64 {
    0.03
}

const fn default_max_exposure() -> f64 {
    0.2
}

const fn default_confidence_full_risk() -> f64 {
    0.8
}

const fn default_confidence_half_risk() -> f64 {
    0.6
}
