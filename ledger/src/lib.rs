//! Tangle ledger.
//!
//! Transactions form a hash-linked DAG rooted at the all-zero genesis hash.
//! Every admitted transaction references two parents; referencing a parent
//! counts as one implicit confirmation of it. A transaction that nothing
//! references yet is a *tip*, and new transactions attach to tips.

pub mod confirmation;
pub mod error;
pub mod graph;
pub mod restore;

pub use confirmation::{confirmed, unconfirmed, ConfirmationPolicy};
pub use error::LedgerError;
pub use graph::LedgerGraph;
pub use restore::GraphParts;
