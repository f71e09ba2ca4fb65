//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use atlas_types::params::{
    ALLOWED_SOURCE_PREFIXES, DEFAULT_CONFIRMATION_THRESHOLD, MAX_KWH, MIN_KWH, TOKENS_PER_KWH,
};
use atlas_types::LedgerParams;
use atlas_utils::LogFormat;

use crate::NodeError;

/// Configuration for an Atlas node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Where the world is persisted between runs.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,

    /// Confirmations required before a contribution is minted.
    #[serde(default = "default_confirmation_threshold")]
    pub confirmation_threshold: u64,

    /// Tokens credited per confirmed kWh.
    #[serde(default = "default_tokens_per_kwh")]
    pub tokens_per_kwh: f64,

    /// Smallest contribution eligible for minting.
    #[serde(default = "default_min_kwh")]
    pub min_kwh: f64,

    /// Largest contribution eligible for minting.
    #[serde(default = "default_max_kwh")]
    pub max_kwh: f64,

    /// Accepted energy source prefixes.
    #[serde(default = "default_allowed_source_prefixes")]
    pub allowed_source_prefixes: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_state_file() -> PathBuf {
    PathBuf::from(atlas_store::DEFAULT_STATE_FILE)
}

fn default_confirmation_threshold() -> u64 {
    DEFAULT_CONFIRMATION_THRESHOLD
}

fn default_tokens_per_kwh() -> f64 {
    TOKENS_PER_KWH
}

fn default_min_kwh() -> f64 {
    MIN_KWH
}

fn default_max_kwh() -> f64 {
    MAX_KWH
}

fn default_allowed_source_prefixes() -> Vec<String> {
    ALLOWED_SOURCE_PREFIXES.iter().map(|p| p.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject values the ledger cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        if !(self.tokens_per_kwh.is_finite() && self.tokens_per_kwh > 0.0) {
            return Err(NodeError::Config(format!(
                "tokens_per_kwh must be positive, got {}",
                self.tokens_per_kwh
            )));
        }
        if !(self.min_kwh.is_finite() && self.max_kwh.is_finite() && self.min_kwh <= self.max_kwh) {
            return Err(NodeError::Config(format!(
                "min_kwh ({}) must not exceed max_kwh ({})",
                self.min_kwh, self.max_kwh
            )));
        }
        Ok(())
    }

    /// The policy values shared by confirmation, validation and minting.
    pub fn ledger_params(&self) -> LedgerParams {
        LedgerParams {
            confirmation_threshold: self.confirmation_threshold,
            tokens_per_kwh: self.tokens_per_kwh,
            min_kwh: self.min_kwh,
            max_kwh: self.max_kwh,
            allowed_source_prefixes: self.allowed_source_prefixes.clone(),
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            confirmation_threshold: default_confirmation_threshold(),
            tokens_per_kwh: default_tokens_per_kwh(),
            min_kwh: default_min_kwh(),
            max_kwh: default_max_kwh(),
            allowed_source_prefixes: default_allowed_source_prefixes(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}
