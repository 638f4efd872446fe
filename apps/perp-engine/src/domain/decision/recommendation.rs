//! The trade recommendation as received from the decision source.

use serde::{Deserialize, Serialize};

use super::errors::DecisionError;
use super::value_objects::{Direction, Intent, OrderPreference};

/// A trade recommendation for one symbol.
///
/// Text fields are kept exactly as received; accessors normalize them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Contract symbol.
    pub symbol: String,
    /// Raw intent (OPEN, ADJUST, CLOSE, HEDGE, OBSERVE).
    #[serde(default)]
    pub intent: String,
    /// Raw direction (LONG, SHORT, FLAT, AUTO).
    #[serde(default)]
    pub direction: String,
    /// Absolute target exposure as a fraction of equity, in [0, 1].
    #[serde(default)]
    pub target_exposure_pct: f64,
    /// Relative exposure change as a fraction of equity, in [-1, 1].
    #[serde(default)]
    pub adjustment_pct: f64,
    /// Model confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
    /// Free-form rationale.
    #[serde(default)]
    pub reasoning: String,
    /// Raw order preference (MARKET, LIMIT, AUTO, or blank).
    #[serde(default)]
    pub order_preference: String,
    /// Suggested stop-loss price as a decimal string.
    #[serde(default, rename = "new_stop_loss", alias = "stop_loss")]
    pub stop_loss: String,
    /// Suggested take-profit price as a decimal string.
    #[serde(default, rename = "new_take_profit", alias = "take_profit")]
    pub take_profit: String,
    /// Free-form risk commentary.
    #[serde(default)]
    pub risk_comment: String,
}

impl Decision {
    /// Normalized intent; blank or unknown values read as ADJUST.
    #[must_use]
    pub fn intent(&self) -> Intent {
        Intent::parse(&self.intent).unwrap_or(Intent::Adjust)
    }

    /// Normalized direction; blank or unknown values read as AUTO.
    #[must_use]
    pub fn direction(&self) -> Direction {
        Direction::parse(&self.direction).unwrap_or(Direction::Auto)
    }

    /// Normalized order preference; blank or unknown values read as AUTO.
    #[must_use]
    pub fn order_preference(&self) -> OrderPreference {
        OrderPreference::parse(&self.order_preference).unwrap_or(OrderPreference::Auto)
    }

    /// Validate the recommendation against the decision source contract.
    pub fn validate(&self) -> Result<(), DecisionError> {
        if self.symbol.trim().is_empty() {
            return Err(DecisionError::MissingField { field: "symbol" });
        }

        if self.intent.trim().is_empty() {
            return Err(DecisionError::MissingField { field: "intent" });
        }
        let intent = Intent::parse(&self.intent).ok_or_else(|| DecisionError::InvalidValue {
            field: "intent",
            value: self.intent.clone(),
        })?;

        if self.direction.trim().is_empty() {
            return Err(DecisionError::MissingField { field: "direction" });
        }
        if Direction::parse(&self.direction).is_none() {
            return Err(DecisionError::InvalidValue {
                field: "direction",
                value: self.direction.clone(),
            });
        }

        check_range("target_exposure_pct", self.target_exposure_pct, 0.0, 1.0)?;
        check_range("adjustment_pct", self.adjustment_pct, -1.0, 1.0)?;
        check_range("confidence", self.confidence, 0.0, 1.0)?;

        if self.reasoning.trim().is_empty() {
            return Err(DecisionError::MissingField { field: "reasoning" });
        }

        if !self.order_preference.trim().is_empty()
            && OrderPreference::parse(&self.order_preference).is_none()
        {
            return Err(DecisionError::InvalidValue {
                field: "order_preference",
                value: self.order_preference.clone(),
            });
        }

        if intent.requires_protection() {
            if self.stop_loss.trim().is_empty() {
                return Err(DecisionError::MissingField {
                    field: "new_stop_loss",
                });
            }
            if self.take_profit.trim().is_empty() {
                return Err(DecisionError::MissingField {
                    field: "new_take_profit",
                });
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), DecisionError> {
    if value.is_nan() || value < min || value > max {
        return Err(DecisionError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
