//! Persistence Adapters
//!
//! Turso-backed and in-memory implementations of the daily risk ledger, and
//! the Turso audit table.

mod in_memory;
mod turso_audit;
mod turso_ledger;
mod turso_store;

pub use in_memory::InMemoryRiskLedger;
pub use turso_audit::TursoAuditSink;
pub use turso_ledger::TursoRiskLedger;
pub use turso_store::{PersistenceError, TursoStore};
