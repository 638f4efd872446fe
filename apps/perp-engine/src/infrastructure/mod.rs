//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**:
//!   - `persistence/`: Daily risk ledger and audit table (Turso, in-memory)
//!   - `broker/`: Venue wire format and the simulated broker
//!   - `source/`: Snapshot file reader for cycle inputs

pub mod broker;
pub mod persistence;
pub mod source;
