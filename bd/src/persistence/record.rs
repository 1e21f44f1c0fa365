//! Persisted badge record

use serde::{Deserialize, Serialize};

use crate::domain::{BadgePayload, BadgeState, BadgeStatus, VerticalAlignment};

/// Durable projection of one badge's state
///
/// A `removed` record without text is a valid tombstone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    pub status: BadgeStatus,

    /// Absent in records written before alignment existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<VerticalAlignment>,
}

impl PersistedRecord {
    /// Project a live state
    pub fn from_state(state: &BadgeState) -> Self {
        Self {
            text: Some(state.payload.text.clone()),
            status: state.status,
            alignment: Some(state.payload.alignment),
        }
    }

    /// A removed record carrying no text
    pub fn tombstone(alignment: VerticalAlignment) -> Self {
        Self {
            text: None,
            status: BadgeStatus::Removed,
            alignment: Some(alignment),
        }
    }

    /// Live state this record restores, if any
    ///
    /// Tombstones and records without text restore nothing.
    pub fn to_state(&self) -> Option<BadgeState> {
        if self.status.is_removed() {
            return None;
        }
        let text = self.text.clone()?;
        let payload = BadgePayload::new(text).with_alignment(self.alignment.unwrap_or_default());
        Some(BadgeState {
            payload,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_state() {
        let mut state = BadgeState::pending(BadgePayload::new("5").with_alignment(VerticalAlignment::Bottom));
        state.mark_displayed();

        let record = PersistedRecord::from_state(&state);
        assert_eq!(record.text.as_deref(), Some("5"));
        assert_eq!(record.status, BadgeStatus::Displayed);
        assert_eq!(record.alignment, Some(VerticalAlignment::Bottom));
    }

    #[test]
    fn test_to_state_restores_status_and_defaults_alignment() {
        let record = PersistedRecord {
            text: Some("9+".to_string()),
            status: BadgeStatus::Displayed,
            alignment: None,
        };

        let state = record.to_state().unwrap();
        assert_eq!(state.payload, BadgePayload::new("9+"));
        assert_eq!(state.status, BadgeStatus::Displayed);
    }

    #[test]
    fn test_tombstone_restores_nothing() {
        assert!(PersistedRecord::tombstone(VerticalAlignment::Center).to_state().is_none());

        let removed_with_text = PersistedRecord {
            text: Some("3".to_string()),
            status: BadgeStatus::Removed,
            alignment: None,
        };
        assert!(removed_with_text.to_state().is_none());
    }

    #[test]
    fn test_record_without_text_restores_nothing() {
        let record = PersistedRecord {
            text: None,
            status: BadgeStatus::Pending,
            alignment: Some(VerticalAlignment::Top),
        };
        assert!(record.to_state().is_none());
    }

    #[test]
    fn test_tombstone_serializes_without_text() {
        let json = serde_json::to_string(&PersistedRecord::tombstone(VerticalAlignment::Center)).unwrap();
        assert_eq!(json, r#"{"status":"removed","alignment":"center"}"#);
    }
}
