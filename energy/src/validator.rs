//! Business rules for energy contributions.

use atlas_types::LedgerParams;
use thiserror::Error;

use crate::contribution::EnergyContribution;

/// Decides which contributions may be minted.
pub trait EnergyValidator: Send + Sync {
    fn name(&self) -> &str;

    fn validate_contribution(&self, contribution: &EnergyContribution) -> bool;

    /// Keep the contributions that pass, preserving order.
    fn validate_batch(&self, contributions: Vec<EnergyContribution>) -> Vec<EnergyContribution> {
        contributions
            .into_iter()
            .filter(|c| self.validate_contribution(c))
            .collect()
    }
}

/// Why [`RuleValidator`] turned a contribution down.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Rejection {
    #[error("{amount} kWh is outside [{min}, {max}]")]
    AmountOutOfRange { amount: f64, min: f64, max: f64 },

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("source '{0}' has no allowed prefix")]
    UnknownSource(String),
}

/// Range and source-prefix rules driven by [`LedgerParams`].
#[derive(Clone, Debug)]
pub struct RuleValidator {
    min_kwh: f64,
    max_kwh: f64,
    allowed_prefixes: Vec<String>,
}

impl RuleValidator {
    pub fn new(params: &LedgerParams) -> Self {
        Self {
            min_kwh: params.min_kwh,
            max_kwh: params.max_kwh,
            allowed_prefixes: params.allowed_source_prefixes.clone(),
        }
    }

    pub fn check(&self, c: &EnergyContribution) -> Result<(), Rejection> {
        if !(c.amount_kwh > 0.0 && c.amount_kwh >= self.min_kwh && c.amount_kwh <= self.max_kwh) {
            return Err(Rejection::AmountOutOfRange {
                amount: c.amount_kwh,
                min: self.min_kwh,
                max: self.max_kwh,
            });
        }
        if c.node_id.is_empty() {
            return Err(Rejection::MissingField("node_id"));
        }
        if c.source_id.is_empty() {
            return Err(Rejection::MissingField("source_id"));
        }
        if c.transaction_hash.is_genesis() {
            return Err(Rejection::MissingField("transaction_hash"));
        }
        if !self
            .allowed_prefixes
            .iter()
            .any(|p| c.source_id.starts_with(p.as_str()))
        {
            return Err(Rejection::UnknownSource(c.source_id.clone()));
        }
        Ok(())
    }
}

impl Default for RuleValidator {
    fn default() -> Self {
        Self::new(&LedgerParams::default())
    }
}

impl EnergyValidator for RuleValidator {
    fn name(&self) -> &str {
        "rules"
    }

    fn validate_contribution(&self, contribution: &EnergyContribution) -> bool {
        match self.check(contribution) {
            Ok(()) => true,
            Err(reason) => {
                tracing::debug!(
                    hash = %contribution.transaction_hash.short(12),
                    %reason,
                    "contribution not eligible for minting"
                );
                false
            }
        }
    }
}
