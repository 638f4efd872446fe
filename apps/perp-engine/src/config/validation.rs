//! Configuration validation.
//!
//! Every violation is collected so an operator sees all of them at once.

use std::collections::HashSet;

use super::{Config, ConfigError};

/// Validate a loaded configuration.
pub(crate) fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut violations = Vec::new();

    let risk = &config.risk;
    for (name, value) in [
        ("risk.max_trade_risk", risk.max_trade_risk),
        ("risk.max_daily_loss", risk.max_daily_loss),
        ("risk.max_exposure", risk.max_exposure),
        ("risk.confidence_full_risk", risk.confidence_full_risk),
        ("risk.confidence_half_risk", risk.confidence_half_risk),
    ] {
        if !in_unit_interval(value) {
            violations.push(format!("{name} must be within (0, 1], got {value}"));
        }
    }
    if risk.confidence_half_risk >= risk.confidence_full_risk {
        violations.push(format!(
            "risk.confidence_half_risk ({}) must be below risk.confidence_full_risk ({})",
            risk.confidence_half_risk, risk.confidence_full_risk
        ));
    }
    if risk.daily_loss_reset_hour > 23 {
        violations.push(format!(
            "risk.daily_loss_reset_hour must be within [0, 23], got {}",
            risk.daily_loss_reset_hour
        ));
    }

    let execution = &config.execution;
    if !(0.0..=0.2).contains(&execution.slippage) {
        violations.push(format!(
            "execution.slippage must be within [0, 0.2], got {}",
            execution.slippage
        ));
    }
    if execution.max_retry_attempts == 0 {
        violations.push("execution.max_retry_attempts must be at least 1".to_string());
    }

    let scheduler = &config.scheduler;
    if scheduler.loop_interval_secs == 0 {
        violations.push("scheduler.loop_interval_secs must be positive".to_string());
    }
    if scheduler.decision_interval_secs < scheduler.loop_interval_secs {
        violations.push(format!(
            "scheduler.decision_interval_secs ({}) must not be below scheduler.loop_interval_secs ({})",
            scheduler.decision_interval_secs, scheduler.loop_interval_secs
        ));
    }

    if !config.persistence.in_memory && config.persistence.db_path.trim().is_empty() {
        violations.push("persistence.db_path must be set unless persistence.in_memory".to_string());
    }

    let metrics = &config.observability.metrics;
    if metrics.enabled && metrics.socket_addr().is_err() {
        violations.push(format!(
            "observability.metrics.listen_addr '{}' is not a socket address",
            metrics.listen_addr
        ));
    }

    let mut symbols = HashSet::new();
    for (index, asset) in config.assets.iter().enumerate() {
        let symbol = asset.symbol.trim();
        if symbol.is_empty() {
            violations.push(format!("assets[{index}].symbol must not be empty"));
        } else if !symbols.insert(symbol.to_uppercase()) {
            violations.push(format!("assets[{index}].symbol '{symbol}' is duplicated"));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(violations.join("; ")))
    }
}

fn in_unit_interval(value: f64) -> bool {
    value > 0.0 && value <= 1.0
}
