//! Recommendation vocabularies.
//!
//! Incoming values are free-form strings; parsing trims and uppercases them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the recommendation asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Open a new position.
    Open,
    /// Adjust the existing position.
    Adjust,
    /// Close the position entirely.
    Close,
    /// Hedge the existing position.
    Hedge,
    /// Do nothing.
    Observe,
}

impl Intent {
    /// Parse a raw intent string, returning `None` for blank or unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "OPEN" => Some(Self::Open),
            "ADJUST" => Some(Self::Adjust),
            "CLOSE" => Some(Self::Close),
            "HEDGE" => Some(Self::Hedge),
            "OBSERVE" => Some(Self::Observe),
            _ => None,
        }
    }

    /// Whether a recommendation with this intent must carry stop and take levels.
    #[must_use]
    pub const fn requires_protection(&self) -> bool {
        matches!(self, Self::Open | Self::Adjust | Self::Hedge)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Adjust => write!(f, "ADJUST"),
            Self::Close => write!(f, "CLOSE"),
            Self::Hedge => write!(f, "HEDGE"),
            Self::Observe => write!(f, "OBSERVE"),
        }
    }
}

/// Which way the target exposure should point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Net long.
    Long,
    /// Net short.
    Short,
    /// No exposure.
    Flat,
    /// Let the evaluator infer the direction.
    Auto,
}

impl Direction {
    /// Parse a raw direction string, returning `None` for blank or unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "LONG" => Some(Self::Long),
            "SHORT" => Some(Self::Short),
            "FLAT" => Some(Self::Flat),
            "AUTO" => Some(Self::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
            Self::Flat => write!(f, "FLAT"),
            Self::Auto => write!(f, "AUTO"),
        }
    }
}

/// Preferred order type for the primary order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderPreference {
    /// Market order.
    Market,
    /// Limit order.
    Limit,
    /// No preference.
    Auto,
}

impl OrderPreference {
    /// Parse a raw preference string, returning `None` for blank or unknown values.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "MARKET" => Some(Self::Market),
            "LIMIT" => Some(Self::Limit),
            "AUTO" => Some(Self::Auto),
            _ => None,
        }
    }
}
