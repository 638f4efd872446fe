//! Broker Adapters
//!
//! Implementations of `BrokerPort` and the venue wire format.

mod simulated;
mod wire;

pub use simulated::SimulatedBroker;
pub use wire::{WireOrder, wire_params};
