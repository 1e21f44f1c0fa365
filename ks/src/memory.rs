//! In-memory store

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use crate::{KeyValueStore, StoreResult};

/// Process-local key-value store
///
/// Wrap it in an `Rc` to share one store between several owners; every
/// owner observes the others' writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }

    /// Stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl KeyValueStore for MemoryStore {
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        debug!(%key, "MemoryStore::read_blob: called");
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn write_blob(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        debug!(%key, len = bytes.len(), "MemoryStore::write_blob: called");
        self.blobs.borrow_mut().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove_blob(&self, key: &str) -> StoreResult<()> {
        debug!(%key, "MemoryStore::remove_blob: called");
        self.blobs.borrow_mut().remove(key);
        Ok(())
    }
}
