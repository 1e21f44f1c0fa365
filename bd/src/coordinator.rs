//! Badge coordinator
//!
//! Owns the identifier → state map, the weak attachment registry and the
//! optional persistence bridge, and keeps every registered attachment point
//! visually consistent with the state map.
//!
//! The coordinator is single-threaded by construction (`Rc` handles,
//! `&mut self` operations): it lives on the thread that owns the UI tree.
//! Operations never fail from the caller's point of view; persistence
//! problems are logged and handed to the diagnostic handler.

use std::collections::HashMap;
use std::rc::Rc;

use eyre::{Context, Result};
use keystore::{FileStore, KeyValueStore};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{BadgeId, BadgePayload, BadgeState, BadgeStatus};
use crate::error::BadgeError;
use crate::persistence::PersistenceBridge;
use crate::registry::AttachmentRegistry;
use crate::render::{self, BadgeView, BarButtonItem};

/// Callback receiving non-fatal persistence errors
pub type DiagnosticHandler = Box<dyn Fn(&BadgeError)>;

/// Coordinates badge state with the views displaying it
#[derive(Default)]
pub struct BadgeCoordinator {
    states: HashMap<BadgeId, BadgeState>,
    registry: AttachmentRegistry,
    persistence: Option<PersistenceBridge>,
    diagnostics: Option<DiagnosticHandler>,
}

impl BadgeCoordinator {
    /// Create a coordinator without persistence
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a coordinator from configuration, backed by a [`FileStore`]
    /// when persistence is enabled
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut coordinator = Self::new();

        let persistence = &config.persistence;
        if persistence.enabled {
            let store = FileStore::open(&persistence.store_path).context(format!(
                "Failed to open badge store at {}",
                persistence.store_path.display()
            ))?;
            coordinator.configure_persistence(Rc::new(store), persistence.storage_key.clone());
        } else {
            info!("BadgeCoordinator::from_config: persistence disabled");
        }

        Ok(coordinator)
    }

    /// Install the handler that receives non-fatal persistence errors
    pub fn set_diagnostic_handler(&mut self, handler: impl Fn(&BadgeError) + 'static) {
        self.diagnostics = Some(Box::new(handler));
    }

    pub fn is_persistence_configured(&self) -> bool {
        self.persistence.is_some()
    }

    /// Storage key in use, when persistence is configured
    pub fn storage_key(&self) -> Option<&str> {
        self.persistence.as_ref().map(|p| p.storage_key())
    }

    /// Persist badge state in `store` under the default storage key
    pub fn configure_default_persistence(&mut self, store: Rc<dyn KeyValueStore>) {
        self.configure_persistence(store, crate::DEFAULT_STORAGE_KEY);
    }

    /// Persist badge state in `store` under `storage_key`
    ///
    /// Loads the stored records, restores live state for every persisted
    /// badge that is neither live already nor a tombstone, and writes the
    /// current live states back. Configuring again reloads and re-merges.
    /// An unreadable stored document is treated as empty.
    pub fn configure_persistence(&mut self, store: Rc<dyn KeyValueStore>, storage_key: impl Into<String>) {
        // Pending writes belong to the previous store
        self.flush_persistence();

        let mut bridge = PersistenceBridge::new(store, storage_key);
        info!(storage_key = %bridge.storage_key(), "BadgeCoordinator::configure_persistence: called");

        if let Err(e) = bridge.load() {
            self.report(&e);
        }

        let mut restored = Vec::new();
        for (id, record) in bridge.records() {
            if self.states.contains_key(id.as_str()) {
                continue;
            }
            if let Some(state) = record.to_state() {
                debug!(%id, status = %state.status, "BadgeCoordinator::configure_persistence: restoring badge");
                self.states.insert(id.clone(), state);
                restored.push(id.clone());
            }
        }

        // Live state is the source of truth for this session
        for (id, state) in &self.states {
            bridge.upsert(id, state);
        }

        self.persistence = Some(bridge);
        info!(restored = restored.len(), "BadgeCoordinator::configure_persistence: merged persisted badges");

        for id in &restored {
            self.refresh_attachments(id);
        }
        self.flush_persistence();
    }

    /// Schedule `payload` for `id` and paint it on every registered point
    ///
    /// Scheduling always re-activates an identifier, including one that was
    /// cleared and left as a tombstone.
    pub fn schedule_badge(&mut self, id: impl Into<BadgeId>, payload: BadgePayload) {
        let id = id.into();
        debug!(%id, text = %payload.text, alignment = %payload.alignment, "BadgeCoordinator::schedule_badge: called");

        let state = BadgeState::pending(payload);
        if let Some(bridge) = self.persistence.as_mut() {
            bridge.upsert(&id, &state);
        }
        self.states.insert(id.clone(), state);

        self.refresh_attachments(&id);
        self.flush_persistence();
    }

    /// Schedule unless `id` was cleared before; returns false when skipped
    ///
    /// For one-shot badges ("new feature" markers) that must stay gone once
    /// the user dismissed them, across restarts when persistence is
    /// configured.
    pub fn schedule_badge_once(&mut self, id: impl Into<BadgeId>, payload: BadgePayload) -> bool {
        let id = id.into();
        if self.status(id.as_str()).is_some_and(|s| s.is_removed()) {
            debug!(%id, "BadgeCoordinator::schedule_badge_once: identifier was removed, skipping");
            return false;
        }
        self.schedule_badge(id, payload);
        true
    }

    /// True iff a live badge exists for `id`
    pub fn has_badge_scheduled(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Status of `id`: live state first, then the persisted record
    pub fn status(&self, id: &str) -> Option<BadgeStatus> {
        if let Some(state) = self.states.get(id) {
            return Some(state.status);
        }
        self.persistence
            .as_ref()
            .and_then(|p| p.record(id))
            .map(|r| r.status)
    }

    /// Payload of the live badge for `id`
    pub fn payload(&self, id: &str) -> Option<&BadgePayload> {
        self.states.get(id).map(|s| &s.payload)
    }

    /// Identifiers with a live badge, sorted
    pub fn scheduled_identifiers(&self) -> Vec<BadgeId> {
        let mut ids: Vec<BadgeId> = self.states.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Register `view` under `id` and make its visual match the current state
    ///
    /// Safe to call on every reuse of a recycled view.
    pub fn attach_badge_if_needed(&mut self, view: Rc<dyn BadgeView>, id: impl Into<BadgeId>) {
        let id = id.into();
        debug!(%id, "BadgeCoordinator::attach_badge_if_needed: called");
        self.registry.register_view(&id, &view);

        match self.live_payload(id.as_str()) {
            Some(payload) => {
                render::apply_to_view(&view, &payload);
                self.mark_displayed(&id);
            }
            None => render::clear_view(&view),
        }
        self.flush_persistence();
    }

    /// Register a bar-button item under `id` and make its badge match the
    /// current state
    pub fn attach_bar_button_badge_if_needed(&mut self, item: Rc<dyn BarButtonItem>, id: impl Into<BadgeId>) {
        let id = id.into();
        debug!(%id, "BadgeCoordinator::attach_bar_button_badge_if_needed: called");
        self.registry.register_bar_button(&id, &item);

        match self.live_payload(id.as_str()) {
            Some(payload) => {
                item.show_badge(&payload);
                self.mark_displayed(&id);
            }
            None => item.remove_badge(),
        }
        self.flush_persistence();
    }

    /// Unregister `view` from every identifier and remove its visual;
    /// returns the identifiers it was registered under
    pub fn detach_view(&mut self, view: Rc<dyn BadgeView>) -> Vec<BadgeId> {
        let owners = self.registry.detach_view(&view);
        if !owners.is_empty() {
            debug!(?owners, "BadgeCoordinator::detach_view: detached");
            render::clear_view(&view);
        }
        owners
    }

    /// Unregister a bar-button item from every identifier and remove its badge
    pub fn detach_bar_button(&mut self, item: Rc<dyn BarButtonItem>) -> Vec<BadgeId> {
        let owners = self.registry.detach_bar_button(&item);
        if !owners.is_empty() {
            debug!(?owners, "BadgeCoordinator::detach_bar_button: detached");
            item.remove_badge();
        }
        owners
    }

    /// Clear the badge for `id` from the state map and every attachment point
    ///
    /// With persistence configured the record becomes a tombstone, or is
    /// deleted outright when `remove_persistence` is set.
    pub fn clear_badge(&mut self, id: &str, remove_persistence: bool) {
        debug!(%id, remove_persistence, "BadgeCoordinator::clear_badge: called");
        let last_state = self.states.remove(id);

        if let Some(bridge) = self.persistence.as_mut() {
            bridge.mark_removed(&BadgeId::from(id), last_state.as_ref(), remove_persistence);
        }

        self.clear_attachments(id);
        self.flush_persistence();
    }

    /// Clear every live badge, then every registered attachment point,
    /// including points registered under identifiers with no live badge
    pub fn clear_all(&mut self, remove_persistence: bool) {
        let states = std::mem::take(&mut self.states);
        debug!(count = states.len(), remove_persistence, "BadgeCoordinator::clear_all: called");

        if let Some(bridge) = self.persistence.as_mut() {
            for (id, state) in &states {
                bridge.mark_removed(id, Some(state), remove_persistence);
            }
        }

        for id in self.registry.identifiers() {
            self.clear_attachments(id.as_str());
        }
        self.flush_persistence();
    }

    /// Drop registry entries whose attachment point no longer exists;
    /// returns the number dropped
    pub fn compact_attachments(&mut self) -> usize {
        self.registry.compact()
    }

    /// Payload to paint for `id`, if it has a live, non-removed badge
    fn live_payload(&self, id: &str) -> Option<BadgePayload> {
        self.states
            .get(id)
            .filter(|s| !s.status.is_removed())
            .map(|s| s.payload.clone())
    }

    fn mark_displayed(&mut self, id: &BadgeId) {
        let Some(state) = self.states.get_mut(id.as_str()) else {
            return;
        };
        if state.mark_displayed() {
            debug!(%id, "BadgeCoordinator::mark_displayed: pending -> displayed");
        }
        if let Some(bridge) = self.persistence.as_mut() {
            bridge.upsert(id, state);
        }
    }

    /// Make every registered point for `id` consistent with its state
    fn refresh_attachments(&mut self, id: &BadgeId) {
        let Some(payload) = self.live_payload(id.as_str()) else {
            self.clear_attachments(id.as_str());
            return;
        };

        let views = self.registry.live_views(id.as_str());
        let items = self.registry.live_bar_buttons(id.as_str());
        for view in &views {
            render::apply_to_view(view, &payload);
        }
        for item in &items {
            item.show_badge(&payload);
        }

        if views.is_empty() && items.is_empty() {
            debug!(%id, "BadgeCoordinator::refresh_attachments: no live attachment points, badge stays pending");
            return;
        }
        debug!(%id, views = views.len(), items = items.len(), "BadgeCoordinator::refresh_attachments: painted");
        self.mark_displayed(id);
    }

    /// Remove the visual from every registered point for `id` and tear down
    /// its registry tables
    fn clear_attachments(&mut self, id: &str) {
        let (views, items) = self.registry.take(id);
        debug!(%id, views = views.len(), items = items.len(), "BadgeCoordinator::clear_attachments: clearing");
        for view in &views {
            render::clear_view(view);
        }
        for item in &items {
            item.remove_badge();
        }
    }

    fn flush_persistence(&mut self) {
        let Some(bridge) = self.persistence.as_mut() else {
            return;
        };
        if let Err(e) = bridge.flush() {
            self.report(&e);
        }
    }

    fn report(&self, err: &BadgeError) {
        warn!(error = %err, "BadgeCoordinator: persistence error, continuing with in-memory state");
        if let Some(handler) = &self.diagnostics {
            handler(err);
        }
    }
}
