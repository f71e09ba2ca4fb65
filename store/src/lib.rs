//! Persisted world state.
//!
//! The durable form of a running ledger is one JSON document ([`PersistedState`]).
//! [`PersistenceCodec`] converts between it and the in-memory [`World`],
//! rebuilding every derived index on the way in. Where the bytes live is
//! behind the [`StateStore`] trait.

pub mod codec;
pub mod error;
pub mod file;
pub mod schema;

pub use codec::{PersistenceCodec, World};
pub use error::StoreError;
pub use file::{JsonFileStore, DEFAULT_STATE_FILE};
pub use schema::{PersistedDag, PersistedState};

/// Byte-level storage for one serialized world.
pub trait StateStore {
    /// The stored bytes, or `None` when nothing has been saved yet.
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the stored bytes.
    fn write(&self, bytes: &[u8]) -> Result<(), StoreError>;

    /// Forget the stored state. Returns whether anything was removed.
    fn clear(&self) -> Result<bool, StoreError>;
}
