//! Badge domain types
//!
//! - [`BadgeId`] scopes one logical badge to any number of attachment points
//! - [`BadgePayload`] is what to render, with no notion of where
//! - [`BadgeStatus`] tracks the lifecycle of a scheduled badge

mod id;
mod payload;
mod state;

pub use id::BadgeId;
pub use payload::{BadgePayload, VerticalAlignment};
pub use state::{BadgeState, BadgeStatus};
