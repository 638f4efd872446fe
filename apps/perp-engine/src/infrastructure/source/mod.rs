//! Snapshot Sources
//!
//! Implementations of `SnapshotSourcePort`.

mod snapshot_file;

pub use snapshot_file::JsonFileSource;
