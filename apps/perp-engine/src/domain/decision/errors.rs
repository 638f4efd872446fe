//! Decision validation errors.

use thiserror::Error;

/// Reasons a recommendation is rejected before it reaches risk evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecisionError {
    /// A required field is blank.
    #[error("{field} must not be empty")]
    MissingField {
        /// Field name.
        field: &'static str,
    },

    /// A field holds a value outside its vocabulary.
    #[error("{field} has invalid value '{value}'")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// A numeric field is outside its allowed range.
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}
