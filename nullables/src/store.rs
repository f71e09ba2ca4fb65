//! Nullable store: in-memory state storage for testing.

use atlas_store::{StateStore, StoreError};
use std::sync::Mutex;

/// Holds the last written state in memory.
#[derive(Default)]
pub struct NullStore {
    bytes: Mutex<Option<Vec<u8>>>,
    writes: Mutex<usize>,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `bytes`, e.g. a hand-edited state.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            writes: Mutex::new(0),
        }
    }

    /// The stored bytes, if any.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.lock().unwrap().clone()
    }

    /// Overwrite the stored bytes without counting a write.
    pub fn replace(&self, bytes: impl Into<Vec<u8>>) {
        *self.bytes.lock().unwrap() = Some(bytes.into());
    }

    /// Number of successful `write` calls.
    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl StateStore for NullStore {
    fn read(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), StoreError> {
        *self.bytes.lock().unwrap() = Some(bytes.to_vec());
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }

    fn clear(&self) -> Result<bool, StoreError> {
        Ok(self.bytes.lock().unwrap().take().is_some())
    }
}
