//! Badge state persistence
//!
//! Mirrors live badge state into a [`keystore::KeyValueStore`] so badges
//! survive process restarts, and keeps tombstones for cleared badges so a
//! reload does not bring them back.

mod bridge;
mod document;
mod record;

pub use bridge::PersistenceBridge;
pub use document::{LoadedDocument, SCHEMA_VERSION, decode, encode};
pub use record::PersistedRecord;
