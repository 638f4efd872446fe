//! Risk limits.

use serde::{Deserialize, Serialize};

use crate::domain::risk_management::errors::RiskError;

/// Limits applied by the risk evaluator and the daily ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Fraction of equity risked per trade at full confidence.
    pub max_trade_risk: f64,
    /// Daily drawdown that trips the halt, as a fraction of start equity.
    pub max_daily_loss: f64,
    /// Maximum absolute exposure per symbol, as a fraction of equity.
    pub max_exposure: f64,
    /// Confidence at or above which the full risk budget applies.
    pub confidence_full_risk: f64,
    /// Confidence at or above which half the risk budget applies.
    pub confidence_half_risk: f64,
    /// UTC hour at which a new trading day starts.
    pub daily_loss_reset_hour: u32,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_trade_risk: 0.01,
            max_daily_loss: 0.03,
            max_exposure: 0.20,
            confidence_full_risk: 0.8,
            confidence_half_risk: 0.6,
            daily_loss_reset_hour: 0,
        }
    }
}

impl RiskLimits {
    /// Check every limit is within its allowed range.
    pub fn validate(&self) -> Result<(), RiskError> {
        unit_interval("max_trade_risk", self.max_trade_risk)?;
        unit_interval("max_daily_loss", self.max_daily_loss)?;
        unit_interval("max_exposure", self.max_exposure)?;
        unit_interval("confidence_full_risk", self.confidence_full_risk)?;
        unit_interval("confidence_half_risk", self.confidence_half_risk)?;

        if self.confidence_half_risk >= self.confidence_full_risk {
            return Err(RiskError::invalid(
                "confidence_half_risk",
                format!(
                    "must be below confidence_full_risk ({})",
                    self.confidence_full_risk
                ),
            ));
        }

        LedgerSettings::new(self.max_daily_loss, self.daily_loss_reset_hour)?;
        Ok(())
    }

    /// Settings for the daily ledger.
    pub fn ledger_settings(&self) -> Result<LedgerSettings, RiskError> {
        LedgerSettings::new(self.max_daily_loss, self.daily_loss_reset_hour)
    }
}

/// Validated settings for a daily risk ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSettings {
    max_daily_loss: f64,
    reset_hour: u32,
}

impl LedgerSettings {
    /// Create ledger settings, rejecting out-of-range values.
    pub fn new(max_daily_loss: f64, reset_hour: u32) -> Result<Self, RiskError> {
        unit_interval("max_daily_loss", max_daily_loss)?;
        if reset_hour > 23 {
            return Err(RiskError::invalid(
                "daily_loss_reset_hour",
                format!("must be within [0, 23], got {reset_hour}"),
            ));
        }
        Ok(Self {
            max_daily_loss,
            reset_hour,
        })
    }

    /// Daily drawdown limit.
    #[must_use]
    pub const fn max_daily_loss(&self) -> f64 {
        self.max_daily_loss
    }

    /// Trading day reset hour (UTC).
    #[must_use]
    pub const fn reset_hour(&self) -> u32 {
        self.reset_hour
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), RiskError> {
    if value.is_nan() || value <= 0.0 || value > 1.0 {
        return Err(RiskError::invalid(
            field,
            format!("must be within (0, 1], got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_valid() {
        assert!(RiskLimits::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_trade_risk() {
        let limits = RiskLimits {
            max_trade_risk: 0.0,
            ..RiskLimits::default()
        };
        let err = limits.validate().unwrap_err();
        assert!(err.to_string().contains("max_trade_risk"));
    }

    #[test]
    fn rejects_inverted_confidence_thresholds() {
        let limits = RiskLimits {
            confidence_full_risk: 0.6,
            confidence_half_risk: 0.7,
            ..RiskLimits::default()
        };
        let err = limits.validate().unwrap_err();
        assert!(err.to_string().contains("confidence_half_risk"));
    }

    #[test]
    fn ledger_settings_reject_bad_reset_hour() {
        assert!(LedgerSettings::new(0.03, 24).is_err());
        assert!(LedgerSettings::new(0.03, 23).is_ok());
    }
}
