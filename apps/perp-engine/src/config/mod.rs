//! Engine configuration.
//!
//! One YAML document with a section per concern. `${VAR}` and
//! `${VAR:-default}` placeholders are expanded before parsing, and every
//! section is validated before anything is built from it.
//!
//! ```rust,ignore
//! use perp_engine::config::load_config;
//!
//! let config = load_config(Some("deploy/perp-engine.yaml"))?;
//! let limits = config.risk.limits();
//! ```

mod execution;
mod observability;
mod persistence;
mod risk;
mod scheduler;
mod source;
mod validation;

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use execution::ExecutionConfig;
pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use risk::RiskConfig;
pub use scheduler::SchedulerConfig;
pub use source::{AssetConfig, SourceConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    Validation(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Risk limits.
    #[serde(default)]
    pub risk: RiskConfig,
    /// Order building and submission.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Ledger storage.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Loop cadence.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Cycle inputs.
    #[serde(default)]
    pub source: SourceConfig,
    /// Traded assets.
    #[serde(default)]
    pub assets: Vec<AssetConfig>,
}

/// File read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Read, interpolate, parse and validate the config file at `path`.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    std::fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadError {
            path: path.to_string(),
            source,
        })
        .and_then(|contents| load_config_from_string(&contents))
}

/// [`load_config`] for a YAML document already in memory.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml_bw::from_str(&interpolate_env_vars(yaml))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Expand `${VAR}` and `${VAR:-default}`. Unset and empty variables both
/// take the default, or nothing when there is none.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("placeholder pattern")
    });

    PLACEHOLDER
        .replace_all(input, |cap: &Captures<'_>| {
            std::env::var(&cap[1])
                .ok()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| cap.get(2).map_or_else(String::new, |m| m.as_str().to_string()))
        })
        .into_owned()
}

pub(crate) const fn default_true() -> bool {
    true
}
