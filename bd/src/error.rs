//! Badge coordinator error types
//!
//! None of these reach callers of the coordinator's public operations; they
//! are logged and handed to the diagnostic handler, and the coordinator
//! carries on with in-memory state.

use keystore::StoreError;
use thiserror::Error;

/// Errors from the persistence side of the coordinator
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("Failed to encode badge records: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode badge records: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Unsupported badge record schema version {found} (supported up to {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl BadgeError {
    /// Check if the stored document itself was unreadable
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, BadgeError::Decode(_) | BadgeError::UnsupportedSchema { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    #[test]
    fn test_is_corrupt_data() {
        assert!(BadgeError::Decode(json_error()).is_corrupt_data());
        assert!(
            BadgeError::UnsupportedSchema {
                found: 9,
                supported: 2
            }
            .is_corrupt_data()
        );
        assert!(!BadgeError::Encode(json_error()).is_corrupt_data());
        assert!(!BadgeError::Store(StoreError::InvalidKey("..".to_string())).is_corrupt_data());
    }

    #[test]
    fn test_unsupported_schema_message() {
        let err = BadgeError::UnsupportedSchema {
            found: 3,
            supported: 2,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported badge record schema version 3 (supported up to 2)"
        );
    }
}
