//! Execution Planner
//!
//! Turns an approved exposure change into a primary order plus protective
//! exits.

use serde::{Deserialize, Serialize};

use crate::domain::order_execution::aggregate::{ExecutionPlan, OrderRequest};
use crate::domain::order_execution::errors::PlanError;
use crate::domain::order_execution::value_objects::{
    OrderParameters, OrderSide, ProtectionMode, TimeInForce, TriggerType,
};
use crate::domain::shared::{EPSILON, approx_zero, same_direction};

/// Execution settings the planner stamps onto every order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerSettings {
    /// Maximum slippage as a fraction of price.
    pub slippage: f64,
    /// Time in force for the primary order.
    pub time_in_force: TimeInForce,
    /// Post-only flag for the primary order.
    pub post_only: bool,
    /// How protective exits are attached.
    pub protection: ProtectionMode,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            slippage: 0.005,
            time_in_force: TimeInForce::Gtc,
            post_only: false,
            protection: ProtectionMode::Separate,
        }
    }
}

/// Execution Planner - builds the order set for one plan.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlanner {
    settings: PlannerSettings,
}

impl ExecutionPlanner {
    /// Create a planner.
    #[must_use]
    pub const fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    /// Settings in force.
    #[must_use]
    pub const fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Build the ordered order set for a plan.
    ///
    /// The primary order always comes first. With separate protection the
    /// stop-loss order precedes the take-profit order.
    pub fn build(&self, plan: &ExecutionPlan) -> Result<Vec<OrderRequest>, PlanError> {
        if !plan.risk.is_proceed() {
            return Err(PlanError::RiskNotAllowed {
                status: plan.risk.status,
            });
        }

        let price = plan.market_price;
        if price.is_nan() || price <= 0.0 {
            return Err(PlanError::InvalidPrice { price });
        }

        let current = plan.current_exposure;
        let target = plan.target_exposure;
        let delta = target - current;
        if approx_zero(delta) {
            return Err(PlanError::AlreadyAtTarget { current, target });
        }

        let equity = plan.account.equity;
        if equity.is_nan() || equity <= 0.0 {
            return Err(PlanError::InvalidEquity { equity });
        }

        let amount = delta.abs() * equity / price;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PlanError::InvalidAmount { amount });
        }

        let close_all = approx_zero(target);
        let reduce_only = close_all
            || (same_direction(target, current) && target.abs() <= current.abs() + EPSILON);

        let mut params = OrderParameters {
            reduce_only,
            close_position: close_all,
            slippage: Some(self.settings.slippage),
            time_in_force: Some(self.settings.time_in_force),
            post_only: self.settings.post_only,
            ..OrderParameters::default()
        };

        let stop = plan.stop_loss.filter(|p| p.is_finite() && *p > 0.0);
        let take = plan.take_profit.filter(|p| p.is_finite() && *p > 0.0);
        let protect = !close_all && (stop.is_some() || take.is_some());

        if protect && self.settings.protection == ProtectionMode::Embedded {
            params.stop_loss_price = stop;
            params.take_profit_price = take;
        }

        let mut orders = Vec::with_capacity(3);
        orders.push(OrderRequest::market(
            OrderSide::for_delta(delta),
            amount,
            price,
            params,
        ));

        if protect && self.settings.protection == ProtectionMode::Separate {
            let exit_side = OrderSide::for_delta(-target);
            let exit_amount = target.abs() * equity / price;

            if let Some(level) = stop {
                orders.push(OrderRequest::protective(
                    TriggerType::StopLoss,
                    exit_side,
                    exit_amount,
                    level,
                    self.protective_params(Some(level), None),
                ));
            }
            if let Some(level) = take {
                orders.push(OrderRequest::protective(
                    TriggerType::TakeProfit,
                    exit_side,
                    exit_amount,
                    level,
                    self.protective_params(None, Some(level)),
                ));
            }
        }

        Ok(orders)
    }

    fn protective_params(&self, stop: Option<f64>, take: Option<f64>) -> OrderParameters {
        OrderParameters {
            reduce_only: true,
            slippage: Some(self.settings.slippage),
            stop_loss_price: stop,
            take_profit_price: take,
            ..OrderParameters::default()
        }
    }
}
