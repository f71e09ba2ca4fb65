//! Token balances and minting.
//!
//! [`TokenLedger`] keeps per-node balances and the aggregate supply in step.
//! [`MintingSettlement`] turns confirmed energy contributions into credits,
//! remembering every settled transaction hash so nothing is minted twice.

pub mod error;
pub mod ledger;
pub mod minting;

pub use error::TokenError;
pub use ledger::TokenLedger;
pub use minting::MintingSettlement;
