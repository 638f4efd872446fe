//! Market & Account State
//!
//! Read-only inputs supplied by external collaborators: the feature snapshot
//! produced by indicator computation and the account/position summaries
//! produced by account polling.

mod account;
mod features;
mod position;

pub use account::AccountState;
pub use features::FeatureSnapshot;
pub use position::{PositionSide, PositionSummary};
