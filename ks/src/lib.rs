//! KeyStore - synchronous key-value settings store
//!
//! Stores opaque blobs under string keys. Encoding is the caller's concern;
//! the store only moves bytes.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - process-local map, shareable behind an `Rc`
//! - [`FileStore`] - one file per key under a directory, replaced atomically
//!
//! # Example
//!
//! ```ignore
//! use keystore::{FileStore, KeyValueStore};
//!
//! let store = FileStore::open("/tmp/settings")?;
//! store.write_blob("app.states", b"{}")?;
//! let blob = store.read_blob("app.states")?;
//! ```

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A synchronous key-value blob store
///
/// Methods take `&self`: stores are shared handles, the way a platform
/// settings store is shared by every component of a process.
pub trait KeyValueStore {
    /// Read the blob stored under `key`, `None` when absent
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous blob
    fn write_blob(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Remove the blob under `key`; removing an absent key is not an error
    fn remove_blob(&self, key: &str) -> StoreResult<()>;
}
