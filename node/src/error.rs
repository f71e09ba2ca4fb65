use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("ledger error: {0}")]
    Ledger(#[from] atlas_ledger::LedgerError),

    #[error("transaction error: {0}")]
    Transaction(#[from] atlas_transactions::TransactionError),

    #[error("store error: {0}")]
    Store(#[from] atlas_store::StoreError),

    #[error("compute error: {0}")]
    Compute(#[from] atlas_compute::ComputeError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),
}
