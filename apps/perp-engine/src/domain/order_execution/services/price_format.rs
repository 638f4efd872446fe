//! Price strings for venue parameters.

use crate::domain::order_execution::errors::PlanError;

/// Shortest decimal string that parses back to the same float.
///
/// No exponent and no trailing zeros: `45000.0` becomes `"45000"`,
/// `0.000123` stays `"0.000123"`.
#[must_use]
pub fn format_price(value: f64) -> String {
    format!("{value}")
}

/// Slippage as a fixed six-decimal string.
#[must_use]
pub fn format_slippage(value: f64) -> String {
    format!("{value:.6}")
}

/// Parse a price string, requiring a finite value above zero.
pub fn parse_price_string(raw: &str) -> Result<f64, PlanError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(PlanError::InvalidPriceString {
            raw: trimmed.to_string(),
        }),
    }
}
