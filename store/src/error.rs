use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("persisted state is corrupted: {0}")]
    Corruption(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<atlas_ledger::LedgerError> for StoreError {
    fn from(err: atlas_ledger::LedgerError) -> Self {
        Self::Corruption(err.to_string())
    }
}

impl From<atlas_tokens::TokenError> for StoreError {
    fn from(err: atlas_tokens::TokenError) -> Self {
        Self::Corruption(err.to_string())
    }
}
