//! Risk Evaluator
//!
//! Sizes a recommendation against the per-trade risk budget, the exposure cap
//! and the daily halt. The evaluator is pure: ledger state arrives as a
//! [`DailyStatus`] snapshot and nothing is written back.

use crate::domain::decision::{Decision, Direction, Intent};
use crate::domain::market::PositionSide;
use crate::domain::risk_management::errors::RiskError;
use crate::domain::risk_management::value_objects::{
    DailyStatus, EvaluationResult, EvaluationStatus, RiskInput, RiskLimits,
};
use crate::domain::shared::{EPSILON, approx_eq, approx_zero, same_direction, sign};

/// Risk Evaluator - turns a recommendation into a vetted target exposure.
#[derive(Debug, Clone)]
pub struct RiskEvaluator {
    limits: RiskLimits,
}

impl RiskEvaluator {
    /// Create an evaluator, rejecting invalid limits.
    pub fn new(limits: RiskLimits) -> Result<Self, RiskError> {
        limits.validate()?;
        Ok(Self { limits })
    }

    /// Limits in force.
    #[must_use]
    pub const fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Evaluate one recommendation.
    ///
    /// Every early exit is a denial carrying the reason as its last note.
    #[must_use]
    pub fn evaluate(&self, input: &RiskInput<'_>, daily: &DailyStatus) -> EvaluationResult {
        let decision = input.decision;
        let mut result = EvaluationResult::denied(decision.symbol.as_str(), daily.clone());

        let ai_stop = parse_level("stop loss", &decision.stop_loss, &mut result.notes);
        result.recommended_take_profit =
            parse_level("take profit", &decision.take_profit, &mut result.notes);

        note_unrecognized(decision, &mut result.notes);
        let intent = decision.intent();
        let direction = decision.direction();

        if intent == Intent::Observe {
            result.notes.push("observe intent, nothing to trade".to_string());
            return result;
        }

        let current = input.account.current_exposure_percent;
        let mut desired = desired_exposure(decision, intent, direction, input.position.side, current);

        // Full close. Allowed even when halted.
        if approx_zero(desired) {
            if approx_zero(current) {
                result.notes.push("already flat, nothing to do".to_string());
                return result;
            }
            result.status = EvaluationStatus::Proceed;
            result.target_exposure_percent = 0.0;
            result.recommended_stop_loss = ai_stop;
            result
                .notes
                .push(format!("closing position of {:+.2}%", current * 100.0));
            return result;
        }

        let max_exposure = self.limits.max_exposure;
        if desired.abs() > max_exposure {
            result.notes.push(format!(
                "desired exposure {:.2}% exceeds cap {:.2}%, clamped",
                desired.abs() * 100.0,
                max_exposure * 100.0
            ));
            desired = max_exposure.copysign(desired);
        }

        let equity = input.account.equity;
        if equity <= 0.0 {
            result
                .notes
                .push(format!("account equity {equity} is invalid"));
            return result;
        }
        let price = input.market_price;
        if price <= 0.0 {
            result.notes.push(format!("market price {price} is invalid"));
            return result;
        }

        let flips = !approx_zero(current) && sign(desired) != sign(current);
        let increasing = desired.abs() > current.abs() + EPSILON;

        if daily.halted && (increasing || flips) {
            result.notes.push(format!(
                "daily loss limit halted trading on {}, exposure increase blocked",
                daily.trading_date
            ));
            return result;
        }

        let side = if desired < 0.0 {
            PositionSide::Short
        } else {
            PositionSide::Long
        };

        let Some(stop) = select_stop(side, ai_stop, input.features.atr_absolute, price) else {
            result
                .notes
                .push("no valid stop loss for target direction".to_string());
            return result;
        };
        result.recommended_stop_loss = Some(stop);

        let distance = stop_distance(side, price, stop);
        if distance <= 0.0 {
            result
                .notes
                .push(format!("stop {stop} gives non-positive distance {distance}"));
            return result;
        }

        let factor = confidence_factor(decision.confidence, &self.limits);
        result.confidence_applied = factor;

        let target = if increasing {
            if factor <= 0.0 {
                result.notes.push(format!(
                    "confidence {:.2} below threshold {:.2}, increase denied",
                    decision.confidence, self.limits.confidence_half_risk
                ));
                return result;
            }

            let risk_per_trade = self.limits.max_trade_risk * factor;
            let risk_amount = equity * risk_per_trade;
            result.risk_amount = risk_amount;
            if risk_amount <= 0.0 {
                result.notes.push("risk budget is zero".to_string());
                return result;
            }

            let by_risk = (risk_per_trade * price / distance).min(max_exposure);
            let magnitude = desired.abs().min(by_risk);
            if magnitude.is_nan() || magnitude <= EPSILON {
                result
                    .notes
                    .push("risk budget allows no exposure".to_string());
                return result;
            }

            let target = magnitude.copysign(desired);
            if approx_eq(target, current) {
                result
                    .notes
                    .push("no-op after risk clamp".to_string());
                return result;
            }
            if same_direction(target, current) && magnitude <= current.abs() + EPSILON {
                result.notes.push(format!(
                    "risk budget leaves no room to increase beyond {:+.2}%",
                    current * 100.0
                ));
                return result;
            }
            target
        } else {
            result.risk_amount = 0.0;
            if approx_eq(desired, current) {
                result
                    .notes
                    .push("target matches current exposure, no-op".to_string());
                return result;
            }
            desired
        };

        result.status = EvaluationStatus::Proceed;
        result.target_exposure_percent = target;
        result.notes.push(format!(
            "target exposure {:+.2}% approved, risk amount {:.2}",
            target * 100.0,
            result.risk_amount
        ));
        result
    }
}

/// Fraction of the per-trade risk budget a confidence level unlocks.
#[must_use]
pub fn confidence_factor(confidence: f64, limits: &RiskLimits) -> f64 {
    if confidence >= limits.confidence_full_risk {
        1.0
    } else if confidence >= limits.confidence_half_risk {
        0.5
    } else {
        0.0
    }
}

/// Pick the protective stop for a target direction.
///
/// Long: the tighter (higher) of the recommended stop, when below price, and
/// `price - 2 * ATR`, when positive. Short: the tighter (lower) of the
/// recommended stop, when above price, and `price + 2 * ATR`.
#[must_use]
pub fn select_stop(side: PositionSide, recommended: Option<f64>, atr: f64, price: f64) -> Option<f64> {
    let (from_decision, from_atr) = if side == PositionSide::Short {
        (
            recommended.filter(|stop| *stop > price),
            (atr > 0.0).then(|| price + 2.0 * atr),
        )
    } else {
        (
            recommended.filter(|stop| *stop > 0.0 && *stop < price),
            (atr > 0.0)
                .then(|| price - 2.0 * atr)
                .filter(|stop| *stop > 0.0),
        )
    };

    match (from_decision, from_atr) {
        (Some(a), Some(b)) if side == PositionSide::Short => Some(a.min(b)),
        (Some(a), Some(b)) => Some(a.max(b)),
        (Some(stop), None) | (None, Some(stop)) => Some(stop),
        (None, None) => None,
    }
}

/// Distance from price to stop in the losing direction.
#[must_use]
pub fn stop_distance(side: PositionSide, price: f64, stop: f64) -> f64 {
    if side == PositionSide::Short {
        stop - price
    } else {
        price - stop
    }
}

fn desired_exposure(
    decision: &Decision,
    intent: Intent,
    direction: Direction,
    position_side: PositionSide,
    current: f64,
) -> f64 {
    if intent == Intent::Close || direction == Direction::Flat {
        return 0.0;
    }

    let direction_sign = match direction {
        Direction::Long => 1.0,
        Direction::Short => -1.0,
        Direction::Flat | Direction::Auto => match position_side {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
            PositionSide::Flat if intent == Intent::Hedge && !approx_zero(current) => {
                -sign(current)
            }
            PositionSide::Flat => 1.0,
        },
    };

    if decision.target_exposure_pct > EPSILON || approx_zero(current) {
        direction_sign * decision.target_exposure_pct.abs()
    } else {
        current + decision.adjustment_pct * direction_sign
    }
}

fn parse_level(label: &str, raw: &str, notes: &mut Vec<String>) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Some(value),
        Ok(_) => {
            notes.push(format!("unusable {label} '{trimmed}': must be finite and positive"));
            None
        }
        Err(e) => {
            notes.push(format!("unparsable {label} '{trimmed}': {e}"));
            None
        }
    }
}

fn note_unrecognized(decision: &Decision, notes: &mut Vec<String>) {
    if !decision.intent.trim().is_empty() && Intent::parse(&decision.intent).is_none() {
        notes.push(format!(
            "unrecognized intent '{}', treated as ADJUST",
            decision.intent.trim()
        ));
    }
    if !decision.direction.trim().is_empty() && Direction::parse(&decision.direction).is_none() {
        notes.push(format!(
            "unrecognized direction '{}', treated as AUTO",
            decision.direction.trim()
        ));
    }
}
