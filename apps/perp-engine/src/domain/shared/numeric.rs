//! Exposure arithmetic helpers.
//!
//! Exposures are signed fractions of equity. Every comparison between
//! exposures, prices and amounts goes through the same tolerance.

/// Tolerance for exposure, price and amount comparisons.
pub const EPSILON: f64 = 1e-6;

/// Returns true when `value` is within [`EPSILON`] of zero.
#[must_use]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Returns true when `a` and `b` differ by less than [`EPSILON`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    approx_zero(a - b)
}

/// Sign of an exposure: `1.0`, `-1.0`, or `0.0` inside the tolerance band.
#[must_use]
pub fn sign(value: f64) -> f64 {
    if value > EPSILON {
        1.0
    } else if value < -EPSILON {
        -1.0
    } else {
        0.0
    }
}

/// Returns true when both exposures are non-zero and point the same way.
#[must_use]
pub fn same_direction(a: f64, b: f64) -> bool {
    let sa = sign(a);
    sa != 0.0 && sa == sign(b)
}
