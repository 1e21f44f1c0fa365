//! BadgeDisplay - badge state coordination for UI attachment points
//!
//! Associates a logical badge (an unread-count pill, a "new" marker) with
//! any number of views or bar-button items, keeps recycled views consistent
//! with the current badge state, and optionally persists that state across
//! restarts.
//!
//! # Core Concepts
//!
//! - **Identifier, not view**: badges are scheduled against a [`BadgeId`];
//!   every attachment point registered under it shows the same payload
//! - **Weak attachment**: the coordinator never keeps a view alive; dropped
//!   views silently leave the registry
//! - **Tombstones**: cleared badges are remembered as removed so a reload
//!   does not resurrect them
//!
//! # Modules
//!
//! - [`domain`] - identifiers, payloads, lifecycle status
//! - [`render`] - traits implemented by attachment points
//! - [`registry`] - weak attachment registry
//! - [`persistence`] - persisted records and the store bridge
//! - [`coordinator`] - the [`BadgeCoordinator`] tying it together
//! - [`config`] - configuration types and loading
//!
//! # Example
//!
//! ```ignore
//! use badgedisplay::{BadgeCoordinator, BadgePayload};
//!
//! let mut badges = BadgeCoordinator::new();
//! badges.schedule_badge("cart", BadgePayload::new("3"));
//! badges.attach_badge_if_needed(cart_view.clone(), "cart");
//! ```

pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod registry;
pub mod render;

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "BadgeDisplayCoordinator.states";

// Re-export commonly used types
pub use config::{Config, PersistenceConfig};
pub use coordinator::{BadgeCoordinator, DiagnosticHandler};
pub use domain::{BadgeId, BadgePayload, BadgeState, BadgeStatus, VerticalAlignment};
pub use error::BadgeError;
pub use persistence::{PersistedRecord, PersistenceBridge};
pub use registry::{AttachmentRegistry, WeakSet};
pub use render::{BadgeView, BarButtonItem, ContentTarget};

pub use keystore::{FileStore, KeyValueStore, MemoryStore, StoreError};
