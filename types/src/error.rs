//! Parse and conversion errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid token amount: {0}")]
    InvalidAmount(f64),

    #[error("unparsable token amount: {0:?}")]
    UnparsableAmount(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),
}
