//! JSON snapshot file source.
//!
//! Stands in for the market-data, decision and account collaborators. The
//! file is re-read on every tick so an external process can rewrite it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::dto::AssetSnapshot;
use crate::application::ports::{SnapshotSourcePort, SourceError};
use crate::domain::shared::approx_zero;

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    assets: Vec<AssetSnapshot>,
}

/// Reads asset snapshots from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source for the given file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Parse snapshot JSON.
    ///
    /// Decisions that fail validation are dropped with a warning, so the
    /// asset reports "no decision" instead of trading on bad input. When the
    /// account carries no exposure but the position summary does, the
    /// position's signed exposure is used.
    pub fn parse(content: &str) -> Result<Vec<AssetSnapshot>, SourceError> {
        let file: SnapshotFile =
            serde_json::from_str(content).map_err(|e| SourceError::Malformed {
                message: e.to_string(),
            })?;

        Ok(file.assets.into_iter().map(normalize).collect())
    }
}

fn normalize(mut snapshot: AssetSnapshot) -> AssetSnapshot {
    if let Some(decision) = snapshot.decision.as_ref()
        && let Err(e) = decision.validate()
    {
        tracing::warn!(asset = %snapshot.asset, error = %e, "Discarding invalid decision");
        snapshot.decision = None;
    }

    if approx_zero(snapshot.account.current_exposure_percent) && snapshot.position.is_open() {
        snapshot.account.current_exposure_percent = snapshot.position.signed_exposure();
    }
    snapshot
}

#[async_trait]
impl SnapshotSourcePort for JsonFileSource {
    async fn load(&self) -> Result<Vec<AssetSnapshot>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Unavailable {
                message: format!("{}: {e}", self.path.display()),
            })?;
        Self::parse(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SNAPSHOT: &str = r#"{
        "assets": [
            {
                "asset": "BTC",
                "symbol": "BTC/USDC:USDC",
                "market_price": 50000.0,
                "decision": {
                    "symbol": "BTC/USDC:USDC",
                    "intent": "OPEN",
                    "direction": "LONG",
                    "target_exposure_pct": 0.1,
                    "confidence": 0.85,
                    "reasoning": "breakout",
                    "new_stop_loss": "45000",
                    "new_take_profit": "52000"
                },
                "features": { "symbol": "BTC/USDC:USDC", "generated_at": "2024-05-01T12:00:00Z", "atr_absolute": 1000.0 },
                "account": { "equity": 100000.0, "timestamp": "2024-05-01T12:00:00Z" }
            },
            {
                "asset": "ETH",
                "symbol": "ETH/USDC:USDC",
                "market_price": 3000.0,
                "decision": { "symbol": "ETH/USDC:USDC", "intent": "OPEN", "direction": "LONG", "reasoning": "" },
                "features": { "symbol": "ETH/USDC:USDC", "generated_at": "2024-05-01T12:00:00Z" },
                "position": { "side": "SHORT", "size_percent": 5.0 },
                "account": { "equity": 100000.0, "timestamp": "2024-05-01T12:00:00Z" }
            }
        ]
    }"#;

    #[test]
    fn parses_and_normalizes() {
        let assets = JsonFileSource::parse(SNAPSHOT).unwrap();
        assert_eq!(assets.len(), 2);

        let btc = &assets[0];
        assert_eq!(btc.decision.as_ref().unwrap().stop_loss, "45000");
        assert_eq!(btc.features.atr_absolute, 1000.0);

        let eth = &assets[1];
        assert!(eth.decision.is_none());
        assert!((eth.account.current_exposure_percent + 0.05).abs() < 1e-12);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = JsonFileSource::parse("{ not json").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let assets = JsonFileSource::new(file.path()).load().await.unwrap();
        assert_eq!(assets[0].asset, "BTC");
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("absent.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }
}
