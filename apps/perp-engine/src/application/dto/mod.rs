//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for use case inputs/outputs.

mod cycle_dto;

pub use cycle_dto::{AssetSnapshot, CycleOutcome};
