//! Ledger policy parameters.
//!
//! The confirmation threshold is shared by the confirmation query and the
//! minting settlement; both read it from the same `LedgerParams` value.

use serde::{Deserialize, Serialize};

/// Confirmations a transaction needs before it is eligible for settlement.
pub const DEFAULT_CONFIRMATION_THRESHOLD: u64 = 3;

/// Tokens minted per confirmed kWh.
pub const TOKENS_PER_KWH: f64 = 10.0;

/// Smallest accepted contribution (kWh, inclusive).
pub const MIN_KWH: f64 = 0.1;

/// Largest accepted contribution (kWh, inclusive).
pub const MAX_KWH: f64 = 10_000.0;

/// Source-type prefixes an energy source id must start with.
pub const ALLOWED_SOURCE_PREFIXES: [&str; 4] = ["solar", "wind", "hydro", "geothermal"];

/// Policy values for confirmation, validation and minting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Minimum confirmation count for a transaction to count as confirmed.
    pub confirmation_threshold: u64,

    /// Conversion rate applied at settlement.
    pub tokens_per_kwh: f64,

    /// Inclusive lower bound on a single contribution.
    pub min_kwh: f64,

    /// Inclusive upper bound on a single contribution.
    pub max_kwh: f64,

    /// Accepted source-type prefixes.
    pub allowed_source_prefixes: Vec<String>,
}

impl LedgerParams {
    pub fn atlas_defaults() -> Self {
        Self {
            confirmation_threshold: DEFAULT_CONFIRMATION_THRESHOLD,
            tokens_per_kwh: TOKENS_PER_KWH,
            min_kwh: MIN_KWH,
            max_kwh: MAX_KWH,
            allowed_source_prefixes: ALLOWED_SOURCE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self::atlas_defaults()
    }
}
