use atlas_types::{NodeId, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TokenError {
    #[error("insufficient balance for {node}: need {requested}, have {available}")]
    InsufficientBalance {
        node: NodeId,
        requested: TokenAmount,
        available: TokenAmount,
    },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("token amount overflow")]
    Overflow,

    #[error("{0} tokens is not a representable amount")]
    InvalidAmount(f64),

    #[error("recorded supply {recorded} does not match balance total {computed}")]
    SupplyMismatch {
        recorded: TokenAmount,
        computed: TokenAmount,
    },
}
