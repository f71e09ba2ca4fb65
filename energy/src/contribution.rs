use atlas_transactions::{Payload, Transaction};
use atlas_types::{NodeId, TxHash};
use serde::Serialize;

/// Energy reported by one transaction. Derived on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnergyContribution {
    pub node_id: NodeId,
    pub amount_kwh: f64,
    pub source_id: String,
    pub transaction_hash: TxHash,
}

impl EnergyContribution {
    /// Project a transaction; `None` unless it carries an energy payload.
    pub fn from_transaction(tx: &Transaction) -> Option<Self> {
        match tx.payload() {
            Payload::EnergyContribution {
                amount_kwh,
                source_id,
            } => Some(Self {
                node_id: tx.node_id().clone(),
                amount_kwh: *amount_kwh,
                source_id: source_id.clone(),
                transaction_hash: *tx.hash(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_transactions::TransactionBuilder;

    #[test]
    fn projects_energy_fields() {
        let tx = TransactionBuilder::energy("node_a", 50.0, "solar_panel_1")
            .build()
            .unwrap();
        let c = EnergyContribution::from_transaction(&tx).unwrap();
        assert_eq!(c.node_id.as_str(), "node_a");
        assert_eq!(c.amount_kwh, 50.0);
        assert_eq!(c.source_id, "solar_panel_1");
        assert_eq!(&c.transaction_hash, tx.hash());
    }
}
