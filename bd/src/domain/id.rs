//! Badge identifiers

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Caller-chosen key for one logical badge
///
/// Not unique per visual: every view showing the same logical entity shares
/// one identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeId(String);

impl BadgeId {
    /// Create an identifier from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BadgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BadgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BadgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<&BadgeId> for BadgeId {
    fn from(id: &BadgeId) -> Self {
        id.clone()
    }
}

impl AsRef<str> for BadgeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BadgeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
