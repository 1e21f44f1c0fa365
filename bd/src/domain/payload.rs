//! Badge payload: the text to render and where to put it

use serde::{Deserialize, Serialize};

/// Vertical placement of the badge relative to its host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

impl std::fmt::Display for VerticalAlignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Center => write!(f, "center"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// Immutable display payload of a badge
///
/// The text is opaque: the coordinator never interprets it as a count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgePayload {
    /// Text shown in the badge
    pub text: String,

    /// Vertical placement
    #[serde(default)]
    pub alignment: VerticalAlignment,
}

impl BadgePayload {
    /// Create a centered payload
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            alignment: VerticalAlignment::default(),
        }
    }

    /// Set the vertical alignment
    pub fn with_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alignment_is_center() {
        let payload = BadgePayload::new("3");
        assert_eq!(payload.text, "3");
        assert_eq!(payload.alignment, VerticalAlignment::Center);
    }

    #[test]
    fn test_with_alignment() {
        let payload = BadgePayload::new("new").with_alignment(VerticalAlignment::Top);
        assert_eq!(payload.alignment, VerticalAlignment::Top);
    }

    #[test]
    fn test_alignment_serde() {
        assert_eq!(serde_json::to_string(&VerticalAlignment::Bottom).unwrap(), "\"bottom\"");
        let parsed: VerticalAlignment = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(parsed, VerticalAlignment::Top);
    }

    #[test]
    fn test_alignment_display() {
        assert_eq!(VerticalAlignment::Top.to_string(), "top");
        assert_eq!(VerticalAlignment::Center.to_string(), "center");
        assert_eq!(VerticalAlignment::Bottom.to_string(), "bottom");
    }
}
