//! Badge lifecycle state

use serde::{Deserialize, Serialize};

use super::payload::BadgePayload;

/// Badge lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BadgeStatus {
    /// Scheduled, not yet painted on any live attachment point
    #[default]
    Pending,
    /// Painted on at least one attachment point
    Displayed,
    /// Explicitly cleared; kept as a persisted tombstone
    Removed,
}

impl BadgeStatus {
    /// Check if this is the removed tombstone status
    pub fn is_removed(&self) -> bool {
        matches!(self, BadgeStatus::Removed)
    }
}

impl std::fmt::Display for BadgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Displayed => write!(f, "displayed"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Live state of one scheduled badge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeState {
    pub payload: BadgePayload,
    pub status: BadgeStatus,
}

impl BadgeState {
    /// Create a freshly scheduled state
    pub fn pending(payload: BadgePayload) -> Self {
        Self {
            payload,
            status: BadgeStatus::Pending,
        }
    }

    /// Mark as painted; returns true if the status changed
    pub fn mark_displayed(&mut self) -> bool {
        if self.status == BadgeStatus::Displayed {
            return false;
        }
        self.status = BadgeStatus::Displayed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(BadgeStatus::Pending.to_string(), "pending");
        assert_eq!(BadgeStatus::Displayed.to_string(), "displayed");
        assert_eq!(BadgeStatus::Removed.to_string(), "removed");
    }

    #[test]
    fn test_status_serde_names() {
        assert_eq!(serde_json::to_string(&BadgeStatus::Removed).unwrap(), "\"removed\"");
        let parsed: BadgeStatus = serde_json::from_str("\"displayed\"").unwrap();
        assert_eq!(parsed, BadgeStatus::Displayed);
    }

    #[test]
    fn test_mark_displayed_is_idempotent() {
        let mut state = BadgeState::pending(BadgePayload::new("1"));
        assert_eq!(state.status, BadgeStatus::Pending);

        assert!(state.mark_displayed());
        assert!(!state.mark_displayed());
        assert_eq!(state.status, BadgeStatus::Displayed);
    }

    #[test]
    fn test_is_removed() {
        assert!(BadgeStatus::Removed.is_removed());
        assert!(!BadgeStatus::Pending.is_removed());
        assert!(!BadgeStatus::Displayed.is_removed());
    }
}
