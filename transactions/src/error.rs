use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransactionError {
    #[error("transaction has no originating node id")]
    EmptyNodeId,

    #[error("energy amount must be a finite number, got {0}")]
    InvalidAmount(f64),

    #[error("canonical serialization failed: {0}")]
    Encoding(String),
}
