//! Stored document format
//!
//! Version 2 wraps the records in an envelope:
//!
//! ```text
//! {"version": 2, "saved_at": 1760000000000, "records": {"cart": {"text": "3", "status": "displayed", "alignment": "center"}}}
//! ```
//!
//! Version 1 is the bare `{identifier: record}` mapping, written before the
//! envelope and the `alignment` field existed. It is read transparently and
//! upgraded on the next write.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::record::PersistedRecord;
use crate::domain::BadgeId;
use crate::error::BadgeError;

/// Schema version written by this crate
pub const SCHEMA_VERSION: u32 = 2;

/// Version of the legacy envelope-less mapping
const LEGACY_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentOut<'a> {
    version: u32,
    saved_at: i64,
    records: &'a BTreeMap<BadgeId, PersistedRecord>,
}

#[derive(Deserialize)]
struct DocumentIn {
    #[serde(default)]
    saved_at: Option<i64>,
    records: BTreeMap<BadgeId, PersistedRecord>,
}

/// Records decoded from a stored blob
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// Schema version the blob was written with
    pub version: u32,
    /// Unix milliseconds of the last save, when recorded
    pub saved_at: Option<i64>,
    pub records: BTreeMap<BadgeId, PersistedRecord>,
}

impl LoadedDocument {
    /// True when the blob predates the current schema
    pub fn needs_upgrade(&self) -> bool {
        self.version < SCHEMA_VERSION
    }
}

/// Encode records as a current-version document
pub fn encode(records: &BTreeMap<BadgeId, PersistedRecord>) -> Result<Vec<u8>, BadgeError> {
    let doc = DocumentOut {
        version: SCHEMA_VERSION,
        saved_at: chrono::Utc::now().timestamp_millis(),
        records,
    };
    serde_json::to_vec(&doc).map_err(BadgeError::Encode)
}

/// Decode a stored blob of any supported version
pub fn decode(bytes: &[u8]) -> Result<LoadedDocument, BadgeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(BadgeError::Decode)?;

    let version = match value.get("version") {
        Some(Value::Number(n)) => {
            let found = n.as_u64().and_then(|v| u32::try_from(v).ok()).unwrap_or(u32::MAX);
            Some(found)
        }
        _ => None,
    };

    match version {
        Some(found) if found != SCHEMA_VERSION => Err(BadgeError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        }),
        Some(found) => {
            let doc: DocumentIn = serde_json::from_value(value).map_err(BadgeError::Decode)?;
            debug!(version = found, count = doc.records.len(), "decode: versioned document");
            Ok(LoadedDocument {
                version: found,
                saved_at: doc.saved_at,
                records: doc.records,
            })
        }
        None => {
            let records: BTreeMap<BadgeId, PersistedRecord> =
                serde_json::from_value(value).map_err(BadgeError::Decode)?;
            debug!(count = records.len(), "decode: legacy mapping");
            Ok(LoadedDocument {
                version: LEGACY_VERSION,
                saved_at: None,
                records,
            })
        }
    }
}
