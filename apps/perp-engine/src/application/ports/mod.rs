//! Application Ports (Driver and Driven)
//!
//! Ports define interfaces for interacting with external systems.
//! - **Driven Ports** (Secondary/Outbound): Broker, audit sink, snapshot source

mod audit_sink_port;
mod broker_port;
mod snapshot_source_port;

pub use audit_sink_port::{AuditError, AuditEvent, AuditSinkPort, NoOpAuditSink, TracingAuditSink};
pub use broker_port::{BrokerError, BrokerPort, OrderAck};
pub use snapshot_source_port::{SnapshotSourcePort, SourceError};
