//! Stateless transaction checks.
//!
//! Parent existence and duplicate detection need the graph and live in the
//! ledger crate. Business rules on energy amounts and sources belong to the
//! energy validator and are applied at settlement, not admission.

use crate::error::TransactionError;
use crate::payload::Payload;
use crate::Transaction;

/// Reject transactions that could not be persisted faithfully.
pub fn validate_transaction(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.node_id().is_empty() {
        return Err(TransactionError::EmptyNodeId);
    }

    match tx.payload() {
        Payload::EnergyContribution { amount_kwh, .. } => {
            // JSON has no representation for NaN or infinity.
            if !amount_kwh.is_finite() {
                return Err(TransactionError::InvalidAmount(*amount_kwh));
            }
        }
    }

    Ok(())
}
