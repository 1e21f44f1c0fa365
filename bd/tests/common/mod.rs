//! Shared attachment points and stores for integration tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use badgedisplay::{BadgePayload, BadgeView, BarButtonItem, ContentTarget, KeyValueStore, StoreError};

/// A view that records the overlay it currently shows
#[derive(Default)]
pub struct RecordingView {
    shown: RefCell<Option<BadgePayload>>,
    pub paints: Cell<u32>,
    pub removals: Cell<u32>,
}

impl RecordingView {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn shown(&self) -> Option<BadgePayload> {
        self.shown.borrow().clone()
    }

    pub fn text(&self) -> Option<String> {
        self.shown.borrow().as_ref().map(|p| p.text.clone())
    }
}

impl BadgeView for RecordingView {
    fn show_badge(&self, payload: &BadgePayload) {
        *self.shown.borrow_mut() = Some(payload.clone());
        self.paints.set(self.paints.get() + 1);
    }

    fn remove_badge(&self) {
        *self.shown.borrow_mut() = None;
        self.removals.set(self.removals.get() + 1);
    }
}

/// A bar-button item that records its badge
#[derive(Default)]
pub struct RecordingItem {
    badge: RefCell<Option<String>>,
}

impl RecordingItem {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn text(&self) -> Option<String> {
        self.badge.borrow().clone()
    }
}

impl BarButtonItem for RecordingItem {
    fn show_badge(&self, payload: &BadgePayload) {
        *self.badge.borrow_mut() = Some(payload.text.clone());
    }

    fn remove_badge(&self) {
        *self.badge.borrow_mut() = None;
    }
}

/// A list cell whose badge belongs on its content view
pub struct TableCell {
    pub content: Rc<RecordingView>,
    pub own: Rc<RecordingView>,
}

impl TableCell {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            content: RecordingView::new(),
            own: RecordingView::new(),
        })
    }
}

impl BadgeView for TableCell {
    fn show_badge(&self, payload: &BadgePayload) {
        self.own.show_badge(payload);
    }

    fn remove_badge(&self) {
        self.own.remove_badge();
    }

    fn as_content_target(&self) -> Option<&dyn ContentTarget> {
        Some(self)
    }
}

impl ContentTarget for TableCell {
    fn content_view(&self) -> Rc<dyn BadgeView> {
        self.content.clone()
    }
}

/// A store whose reads succeed with fixed content and whose writes fail
pub struct BrokenStore {
    pub blob: Option<Vec<u8>>,
    pub writes_attempted: Cell<u32>,
}

impl BrokenStore {
    pub fn new(blob: Option<Vec<u8>>) -> Rc<Self> {
        Rc::new(Self {
            blob,
            writes_attempted: Cell::new(0),
        })
    }
}

impl KeyValueStore for BrokenStore {
    fn read_blob(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blob.clone())
    }

    fn write_blob(&self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        self.writes_attempted.set(self.writes_attempted.get() + 1);
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn remove_blob(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}
