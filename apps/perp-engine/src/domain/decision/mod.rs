//! Decision Bounded Context
//!
//! The validated trade recommendation consumed by risk evaluation.
//!
//! # Key Concepts
//!
//! - **Intent**: What the recommendation wants to do (open, adjust, close, hedge, observe)
//! - **Direction**: Which way the resulting exposure should point
//! - **Target / Adjustment**: Absolute target or relative change of exposure

pub mod errors;
pub mod recommendation;
pub mod value_objects;

pub use errors::DecisionError;
pub use recommendation::Decision;
pub use value_objects::{Direction, Intent, OrderPreference};
