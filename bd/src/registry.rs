//! Attachment registry
//!
//! Maps each badge identifier to the attachment points currently showing it.
//! Points are held weakly: the UI tree owns them, and a point dropped without
//! explicit detach simply stops being yielded. Dead entries are compacted
//! whenever a table is enumerated.

use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::domain::BadgeId;
use crate::render::{BadgeView, BarButtonItem};

/// A deduplicated set of weak references
///
/// Identity is the referent's allocation address, so two handles to the same
/// object count once.
pub struct WeakSet<T: ?Sized> {
    entries: Vec<Weak<T>>,
}

impl<T: ?Sized> std::fmt::Debug for WeakSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakSet").field("len", &self.entries.len()).finish()
    }
}

impl<T: ?Sized> Default for WeakSet<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T: ?Sized> WeakSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `item`; returns false if it was already present
    pub fn insert(&mut self, item: &Rc<T>) -> bool {
        self.compact();
        if self.contains(item) {
            return false;
        }
        self.entries.push(Rc::downgrade(item));
        true
    }

    pub fn contains(&self, item: &Rc<T>) -> bool {
        let target = Rc::as_ptr(item);
        self.entries.iter().any(|w| std::ptr::addr_eq(w.as_ptr(), target))
    }

    /// Remove `item`; returns true if it was present
    pub fn remove(&mut self, item: &Rc<T>) -> bool {
        let target = Rc::as_ptr(item);
        let before = self.entries.len();
        self.entries.retain(|w| !std::ptr::addr_eq(w.as_ptr(), target));
        self.entries.len() != before
    }

    /// Drop dead entries; returns how many were dropped
    pub fn compact(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|w| w.strong_count() > 0);
        before - self.entries.len()
    }

    /// Strong handles to every live entry, compacting dead ones
    pub fn live(&mut self) -> Vec<Rc<T>> {
        self.compact();
        self.entries.iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of entries, dead ones included until the next compaction
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One identifier → weak set table per attachment kind
struct KindTable<T: ?Sized> {
    kind: &'static str,
    tables: HashMap<BadgeId, WeakSet<T>>,
}

impl<T: ?Sized> KindTable<T> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            tables: HashMap::new(),
        }
    }

    /// Every identifier `item` is registered under, sorted
    fn owners_of(&self, item: &Rc<T>) -> Vec<BadgeId> {
        let mut owners: Vec<BadgeId> = self
            .tables
            .iter()
            .filter(|(_, set)| set.contains(item))
            .map(|(id, _)| id.clone())
            .collect();
        owners.sort();
        owners
    }

    fn register(&mut self, id: &BadgeId, item: &Rc<T>) -> bool {
        for owner in self.owners_of(item).iter().filter(|owner| *owner != id) {
            warn!(kind = self.kind, %owner, %id, "AttachmentRegistry::register: point already registered under another identifier");
        }
        let added = self.tables.entry(id.clone()).or_default().insert(item);
        debug!(kind = self.kind, %id, added, "AttachmentRegistry::register: done");
        added
    }

    fn live(&mut self, id: &str) -> Vec<Rc<T>> {
        let Some(set) = self.tables.get_mut(id) else {
            return Vec::new();
        };
        let live = set.live();
        if set.is_empty() {
            debug!(kind = self.kind, %id, "AttachmentRegistry::live: table empty, tearing down");
            self.tables.remove(id);
        }
        live
    }

    fn take(&mut self, id: &str) -> Vec<Rc<T>> {
        self.tables.remove(id).map(|mut set| set.live()).unwrap_or_default()
    }

    /// Remove `item` from every table of this kind
    fn detach(&mut self, item: &Rc<T>) -> Vec<BadgeId> {
        let owners = self.owners_of(item);
        for owner in &owners {
            if let Some(set) = self.tables.get_mut(owner.as_str()) {
                set.remove(item);
                if set.is_empty() {
                    self.tables.remove(owner.as_str());
                }
            }
        }
        owners
    }

    fn compact(&mut self) -> usize {
        let mut dropped = 0;
        self.tables.retain(|_, set| {
            dropped += set.compact();
            !set.is_empty()
        });
        dropped
    }
}

/// Weak registry of attachment points, per identifier and kind
pub struct AttachmentRegistry {
    views: KindTable<dyn BadgeView>,
    bar_buttons: KindTable<dyn BarButtonItem>,
}

impl Default for AttachmentRegistry {
    fn default() -> Self {
        Self {
            views: KindTable::new("view"),
            bar_buttons: KindTable::new("bar_button"),
        }
    }
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view under `id`; returns false if it was already there
    pub fn register_view(&mut self, id: &BadgeId, view: &Rc<dyn BadgeView>) -> bool {
        self.views.register(id, view)
    }

    /// Register a bar-button item under `id`; returns false if it was already there
    pub fn register_bar_button(&mut self, id: &BadgeId, item: &Rc<dyn BarButtonItem>) -> bool {
        self.bar_buttons.register(id, item)
    }

    /// Live views registered under `id`
    pub fn live_views(&mut self, id: &str) -> Vec<Rc<dyn BadgeView>> {
        self.views.live(id)
    }

    /// Live bar-button items registered under `id`
    pub fn live_bar_buttons(&mut self, id: &str) -> Vec<Rc<dyn BarButtonItem>> {
        self.bar_buttons.live(id)
    }

    /// Tear down both tables for `id`, returning the points that were still alive
    pub fn take(&mut self, id: &str) -> (Vec<Rc<dyn BadgeView>>, Vec<Rc<dyn BarButtonItem>>) {
        (self.views.take(id), self.bar_buttons.take(id))
    }

    /// Every identifier with a table of either kind, sorted
    pub fn identifiers(&self) -> Vec<BadgeId> {
        let ids: BTreeSet<&BadgeId> = self.views.tables.keys().chain(self.bar_buttons.tables.keys()).collect();
        ids.into_iter().cloned().collect()
    }

    /// Identifiers the view is registered under, sorted
    ///
    /// More than one only when the caller re-registered the view without
    /// detaching it first.
    pub fn owners_of_view(&self, view: &Rc<dyn BadgeView>) -> Vec<BadgeId> {
        self.views.owners_of(view)
    }

    /// Identifiers the bar-button item is registered under, sorted
    pub fn owners_of_bar_button(&self, item: &Rc<dyn BarButtonItem>) -> Vec<BadgeId> {
        self.bar_buttons.owners_of(item)
    }

    /// Unregister a view from every identifier; returns those identifiers
    pub fn detach_view(&mut self, view: &Rc<dyn BadgeView>) -> Vec<BadgeId> {
        self.views.detach(view)
    }

    /// Unregister a bar-button item from every identifier; returns those identifiers
    pub fn detach_bar_button(&mut self, item: &Rc<dyn BarButtonItem>) -> Vec<BadgeId> {
        self.bar_buttons.detach(item)
    }

    /// Drop dead entries and empty tables; returns the number of dead entries
    pub fn compact(&mut self) -> usize {
        let dropped = self.views.compact() + self.bar_buttons.compact();
        debug!(dropped, "AttachmentRegistry::compact: done");
        dropped
    }

    /// Number of identifiers with at least one table
    pub fn len(&self) -> usize {
        self.identifiers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.tables.is_empty() && self.bar_buttons.tables.is_empty()
    }
}
