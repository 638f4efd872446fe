//! Cycle input configuration.

use serde::{Deserialize, Serialize};

/// Where cycle inputs are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

/// One traded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Asset key, e.g. "BTC".
    pub asset: String,
    /// Contract symbol, e.g. "BTC/USDC:USDC".
    pub symbol: String,
}

fn default_snapshot_path() -> String {
    "./data/snapshot.json".to_string()
}
