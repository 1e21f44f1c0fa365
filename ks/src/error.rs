//! Store error types

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl StoreError {
    /// Check if this error was caused by the key rather than the backend
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, StoreError::InvalidKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_invalid_key() {
        assert!(StoreError::InvalidKey("../etc".to_string()).is_invalid_key());
        assert!(!StoreError::Io(std::io::Error::other("disk full")).is_invalid_key());
    }

    #[test]
    fn test_display() {
        let err = StoreError::InvalidKey("a/b".to_string());
        assert_eq!(err.to_string(), "Invalid key: \"a/b\"");
    }
}
