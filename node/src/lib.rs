//! Atlas node: the coordinator that owns one energy-ledger world.
//!
//! The coordinator admits energy reports into the tangle, advances
//! confirmations, settles confirmed contributions into tokens exactly once,
//! runs compute jobs paid for in tokens, and saves or restores the whole
//! world through a [`atlas_store::StateStore`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod stats;
pub mod tracing_spans;

pub use config::NodeConfig;
pub use coordinator::Coordinator;
pub use error::NodeError;
pub use stats::WorldStats;
