//! Shared Domain Types
//!
//! Value objects and numeric helpers shared across bounded contexts.

pub mod numeric;
pub mod value_objects;

pub use numeric::{EPSILON, approx_eq, approx_zero, same_direction, sign};
pub use value_objects::Symbol;
