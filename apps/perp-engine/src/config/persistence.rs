//! Ledger persistence configuration.

use serde::{Deserialize, Serialize};

/// Where the daily ledger and audit table live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Database file path.
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// Keep everything in memory; nothing survives a restart.
    #[serde(default)]
    pub in_memory: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            in_memory: false,
        }
    }
}

fn default_db_path() -> String {
    "./data/perp-engine.db".to_string()
}
