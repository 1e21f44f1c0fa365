//! Attachment point traits
//!
//! The coordinator never draws anything itself. Attachment points paint and
//! remove their own badge overlay; the coordinator only decides when.
//!
//! All methods take `&self`: UI objects are shared `Rc` handles owned by the
//! UI tree, and mutate their presentation through interior mutability.

use std::rc::Rc;

use tracing::warn;

use crate::domain::BadgePayload;

/// Maximum number of content-target hops followed when resolving a view
pub const MAX_CONTENT_DEPTH: usize = 8;

/// A generic view that can host a badge overlay
pub trait BadgeView {
    /// Paint (or repaint) the overlay with `payload`
    fn show_badge(&self, payload: &BadgePayload);

    /// Remove the overlay; must be harmless when none is shown
    fn remove_badge(&self);

    /// Container views redirect badge placement to a nested content view
    fn as_content_target(&self) -> Option<&dyn ContentTarget> {
        None
    }
}

/// A bar-button-style item that can carry a badge
pub trait BarButtonItem {
    /// Set the item's badge to `payload`
    fn show_badge(&self, payload: &BadgePayload);

    /// Remove the item's badge
    fn remove_badge(&self);
}

/// Capability of a container view (e.g. a list cell) whose badge belongs on
/// a nested content view
pub trait ContentTarget {
    /// The view that actually hosts the overlay
    fn content_view(&self) -> Rc<dyn BadgeView>;
}

/// Follow content-target redirection to the view that hosts the overlay
pub(crate) fn resolve_view(view: Rc<dyn BadgeView>) -> Rc<dyn BadgeView> {
    let mut current = view;
    for _ in 0..MAX_CONTENT_DEPTH {
        let next = current.as_content_target().map(|target| target.content_view());
        match next {
            Some(next) => current = next,
            None => return current,
        }
    }
    warn!(max_depth = MAX_CONTENT_DEPTH, "resolve_view: content target chain too deep, stopping");
    current
}

/// Paint `payload` on a view, honoring content-target redirection
pub(crate) fn apply_to_view(view: &Rc<dyn BadgeView>, payload: &BadgePayload) {
    resolve_view(Rc::clone(view)).show_badge(payload);
}

/// Remove the overlay from a view, honoring content-target redirection
pub(crate) fn clear_view(view: &Rc<dyn BadgeView>) {
    resolve_view(Rc::clone(view)).remove_badge();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Label {
        text: RefCell<Option<String>>,
    }

    impl BadgeView for Label {
        fn show_badge(&self, payload: &BadgePayload) {
            *self.text.borrow_mut() = Some(payload.text.clone());
        }

        fn remove_badge(&self) {
            *self.text.borrow_mut() = None;
        }
    }

    struct Cell {
        content: Rc<Label>,
        own: RefCell<Option<String>>,
    }

    impl BadgeView for Cell {
        fn show_badge(&self, payload: &BadgePayload) {
            *self.own.borrow_mut() = Some(payload.text.clone());
        }

        fn remove_badge(&self) {
            *self.own.borrow_mut() = None;
        }

        fn as_content_target(&self) -> Option<&dyn ContentTarget> {
            Some(self)
        }
    }

    impl ContentTarget for Cell {
        fn content_view(&self) -> Rc<dyn BadgeView> {
            self.content.clone()
        }
    }

    /// A target that redirects to itself forever
    struct Loop {
        me: RefCell<Option<Rc<Loop>>>,
        shown: RefCell<u32>,
    }

    impl BadgeView for Loop {
        fn show_badge(&self, _payload: &BadgePayload) {
            *self.shown.borrow_mut() += 1;
        }

        fn remove_badge(&self) {}

        fn as_content_target(&self) -> Option<&dyn ContentTarget> {
            Some(self)
        }
    }

    impl ContentTarget for Loop {
        fn content_view(&self) -> Rc<dyn BadgeView> {
            self.me.borrow().clone().expect("self reference set")
        }
    }

    #[test]
    fn test_plain_view_paints_itself() {
        let label = Rc::new(Label::default());
        let view: Rc<dyn BadgeView> = label.clone();

        apply_to_view(&view, &BadgePayload::new("7"));
        assert_eq!(label.text.borrow().as_deref(), Some("7"));

        clear_view(&view);
        assert!(label.text.borrow().is_none());
    }

    #[test]
    fn test_container_redirects_to_content() {
        let content = Rc::new(Label::default());
        let cell = Rc::new(Cell {
            content: content.clone(),
            own: RefCell::new(None),
        });
        let view: Rc<dyn BadgeView> = cell.clone();

        apply_to_view(&view, &BadgePayload::new("2"));
        assert_eq!(content.text.borrow().as_deref(), Some("2"));
        assert!(cell.own.borrow().is_none());
    }

    #[test]
    fn test_cyclic_redirection_terminates() {
        let looped = Rc::new(Loop {
            me: RefCell::new(None),
            shown: RefCell::new(0),
        });
        *looped.me.borrow_mut() = Some(looped.clone());
        let view: Rc<dyn BadgeView> = looped.clone();

        apply_to_view(&view, &BadgePayload::new("x"));
        assert_eq!(*looped.shown.borrow(), 1);

        // Break the cycle so the test does not leak
        looped.me.borrow_mut().take();
    }
}
