//! Snapshot Source Port (Driven Port)
//!
//! Interface for the collaborators that supply a cycle's inputs: decisions,
//! features, positions and account state.

use async_trait::async_trait;

use crate::application::dto::AssetSnapshot;

/// Snapshot source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The source could not be read.
    #[error("Snapshot source unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The source content is malformed.
    #[error("Malformed snapshot: {message}")]
    Malformed {
        /// Error details.
        message: String,
    },
}

/// Port for loading the inputs of one cycle.
#[async_trait]
pub trait SnapshotSourcePort: Send + Sync {
    /// Load the latest snapshot for every asset.
    async fn load(&self) -> Result<Vec<AssetSnapshot>, SourceError>;
}
