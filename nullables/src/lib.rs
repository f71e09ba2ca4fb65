//! Nullable infrastructure for deterministic testing.
//!
//! The clock and the state store are the only outside dependencies of the
//! coordinator. This crate provides stand-ins that:
//! - return deterministic values
//! - can be controlled programmatically
//! - never touch the filesystem
//!
//! Usage: hand these to the coordinator in tests instead of the real ones.

pub mod clock;
pub mod store;

pub use clock::NullClock;
pub use store::NullStore;
