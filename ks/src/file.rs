//! File-backed store
//!
//! Each key maps to `{dir}/{key}.blob`. Writes go to a temporary file in the
//! same directory and are renamed over the target, so a reader never sees a
//! half-written blob.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::{KeyValueStore, StoreError, StoreResult};

const BLOB_EXTENSION: &str = "blob";

/// Directory-backed key-value store
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open or create a store rooted at `dir`
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!(?dir, "FileStore::open: opened store");
        Ok(Self { dir })
    }

    /// Root directory of the store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    ///
    /// Keys are restricted to ASCII alphanumerics, `.`, `_` and `-`, and may
    /// not start with `.`, so a key can never escape the store directory.
    pub fn blob_path(&self, key: &str) -> StoreResult<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.{}", key, BLOB_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn read_blob(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let path = self.blob_path(key)?;
        debug!(?path, "FileStore::read_blob: called");
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("FileStore::read_blob: no blob for key");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_blob(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        let path = self.blob_path(key)?;
        debug!(?path, len = bytes.len(), "FileStore::write_blob: called");

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!("FileStore::write_blob: blob written");
        Ok(())
    }

    fn remove_blob(&self, key: &str) -> StoreResult<()> {
        let path = self.blob_path(key)?;
        debug!(?path, "FileStore::remove_blob: called");
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
