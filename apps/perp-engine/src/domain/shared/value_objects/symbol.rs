//! Symbol value object for perpetual contract identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A perpetual contract symbol in unified `BASE/QUOTE:SETTLE` form.
///
/// Examples:
/// - "BTC/USDC:USDC"
/// - "ETH/USDC:USDC"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a new Symbol.
    ///
    /// The symbol is trimmed and normalized to uppercase.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_uppercase())
    }

    /// Get the symbol string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Base asset key, e.g. "BTC" for "BTC/USDC:USDC".
    ///
    /// Symbols without a quote separator are returned whole.
    #[must_use]
    pub fn asset(&self) -> &str {
        let base = self.0.split('/').next().unwrap_or_default();
        base.split(':').next().unwrap_or_default()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
