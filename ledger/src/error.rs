use atlas_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("transaction {hash} is already in the tangle")]
    DuplicateTransaction { hash: TxHash },

    #[error("transaction {hash} references unknown parent {parent}")]
    UnknownParent { hash: TxHash, parent: TxHash },

    #[error("inconsistent graph state: {0}")]
    Corruption(String),
}

impl LedgerError {
    /// True for the admission rejections a caller may retry with fresh tips.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTransaction { .. } | Self::UnknownParent { .. }
        )
    }
}
