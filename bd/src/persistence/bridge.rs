//! Persistence bridge between live badge state and a key-value store

use std::collections::BTreeMap;
use std::rc::Rc;

use keystore::KeyValueStore;
use tracing::{debug, info, warn};

use super::document;
use super::record::PersistedRecord;
use crate::domain::{BadgeId, BadgeState};
use crate::error::BadgeError;

/// In-memory copy of the persisted records plus the store they live in
///
/// Mutations only touch the in-memory copy and mark it dirty; [`flush`]
/// writes the whole mapping under the storage key.
///
/// A stored document of an unsupported schema version is copied to
/// [`backup_key`] before anything may overwrite it. If that copy fails the
/// bridge stops writing until the next [`load`].
///
/// [`flush`]: PersistenceBridge::flush
/// [`load`]: PersistenceBridge::load
/// [`backup_key`]: PersistenceBridge::backup_key
pub struct PersistenceBridge {
    store: Rc<dyn KeyValueStore>,
    storage_key: String,
    records: BTreeMap<BadgeId, PersistedRecord>,
    dirty: bool,
    writes_blocked: bool,
}

impl PersistenceBridge {
    /// Create a bridge with no records loaded yet
    pub fn new(store: Rc<dyn KeyValueStore>, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();
        debug!(%storage_key, "PersistenceBridge::new: called");
        Self {
            store,
            storage_key,
            records: BTreeMap::new(),
            dirty: false,
            writes_blocked: false,
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Key an unsupported document of `version` is preserved under
    pub fn backup_key(&self, version: u32) -> String {
        format!("{}.v{}", self.storage_key, version)
    }

    /// True while an unsupported document could not be preserved
    pub fn is_write_blocked(&self) -> bool {
        self.writes_blocked
    }

    /// Replace the in-memory records with what the store holds
    ///
    /// On any failure the record set is left empty and the error returned.
    /// Returns the number of records loaded.
    pub fn load(&mut self) -> Result<usize, BadgeError> {
        debug!(storage_key = %self.storage_key, "PersistenceBridge::load: called");
        self.records.clear();
        self.dirty = false;
        self.writes_blocked = false;

        let Some(bytes) = self.store.read_blob(&self.storage_key)? else {
            debug!("PersistenceBridge::load: nothing stored yet");
            return Ok(0);
        };

        let doc = match document::decode(&bytes) {
            Ok(doc) => doc,
            Err(BadgeError::UnsupportedSchema { found, supported }) => {
                self.preserve_unsupported(&bytes, found)?;
                return Err(BadgeError::UnsupportedSchema { found, supported });
            }
            Err(e) => return Err(e),
        };
        if doc.needs_upgrade() {
            info!(
                from = doc.version,
                to = document::SCHEMA_VERSION,
                "PersistenceBridge::load: upgrading stored badge records"
            );
            self.dirty = true;
        }
        self.records = doc.records;

        info!(count = self.records.len(), "PersistenceBridge::load: records loaded");
        Ok(self.records.len())
    }

    fn preserve_unsupported(&mut self, bytes: &[u8], version: u32) -> Result<(), BadgeError> {
        let backup_key = self.backup_key(version);
        if let Err(e) = self.store.write_blob(&backup_key, bytes) {
            warn!(%backup_key, error = %e, "PersistenceBridge::load: could not preserve unsupported document, writes blocked");
            self.writes_blocked = true;
            return Err(e.into());
        }
        info!(version, %backup_key, "PersistenceBridge::load: unsupported document preserved");
        Ok(())
    }

    pub fn record(&self, id: &str) -> Option<&PersistedRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> &BTreeMap<BadgeId, PersistedRecord> {
        &self.records
    }

    /// Record the current live state of `id`; returns true if the record changed
    pub fn upsert(&mut self, id: &BadgeId, state: &BadgeState) -> bool {
        let record = PersistedRecord::from_state(state);
        if self.records.get(id.as_str()) == Some(&record) {
            return false;
        }
        debug!(%id, status = %record.status, "PersistenceBridge::upsert: record changed");
        self.records.insert(id.clone(), record);
        self.dirty = true;
        true
    }

    /// Turn the record for `id` into a tombstone, or delete it outright when
    /// `remove_record` is set. Returns true if anything changed.
    ///
    /// The tombstone keeps the last known text and alignment, preferring the
    /// live state that was just cleared over what was already persisted.
    pub fn mark_removed(&mut self, id: &BadgeId, last_state: Option<&BadgeState>, remove_record: bool) -> bool {
        debug!(%id, remove_record, "PersistenceBridge::mark_removed: called");
        if remove_record {
            let removed = self.records.remove(id.as_str()).is_some();
            self.dirty |= removed;
            return removed;
        }

        let existing = self.records.get(id.as_str());
        let alignment = last_state
            .map(|s| s.payload.alignment)
            .or_else(|| existing.and_then(|r| r.alignment))
            .unwrap_or_default();
        let mut record = PersistedRecord::tombstone(alignment);
        record.text = last_state
            .map(|s| s.payload.text.clone())
            .or_else(|| existing.and_then(|r| r.text.clone()));

        if existing == Some(&record) {
            return false;
        }
        self.records.insert(id.clone(), record);
        self.dirty = true;
        true
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write all records to the store if anything changed since the last
    /// successful write. Returns true if a write happened.
    ///
    /// A failed write keeps the bridge dirty so the next flush retries.
    pub fn flush(&mut self) -> Result<bool, BadgeError> {
        if !self.dirty {
            return Ok(false);
        }
        if self.writes_blocked {
            debug!("PersistenceBridge::flush: writes blocked, keeping records in memory");
            return Ok(false);
        }
        let bytes = document::encode(&self.records)?;
        self.store.write_blob(&self.storage_key, &bytes)?;
        self.dirty = false;
        debug!(count = self.records.len(), "PersistenceBridge::flush: records written");
        Ok(true)
    }
}
