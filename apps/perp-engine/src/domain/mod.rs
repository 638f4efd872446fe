//! Domain Layer
//!
//! The innermost layer containing business logic with zero infrastructure dependencies.
//! This layer defines:
//!
//! - **Value Objects**: Immutable domain types with equality by value
//! - **Domain Services**: Stateless business logic
//! - **Repository Traits**: Persistence abstractions (implemented in adapters)
//!
//! # Bounded Contexts
//!
//! - [`decision`]: The trade recommendation and its vocabularies
//! - [`market`]: Read-only market, account and position inputs
//! - [`risk_management`]: Daily drawdown ledger and risk evaluation
//! - [`order_execution`]: Execution planning and order requests

pub mod decision;
pub mod market;
pub mod order_execution;
pub mod risk_management;
pub mod shared;
