//! Sequential Keyboard Navigation
//!
//! The host's default Tab / Shift+Tab action: key presses are dispatched to
//! the focused element first, and if no listener prevents the default,
//! focus moves to the next or previous focusable element of the document,
//! wrapping at either end.

use std::cmp::Ordering;
use std::rc::Rc;

use fos_css::StyleSource;
use fos_dom::{Document, KeyboardEvent, Modifiers, NodeId};

use crate::config::FocusableConfig;
use crate::focus_trap::NavigationKey;
use crate::focusable::Focusable;

/// Document-wide Tab order
#[derive(Clone, Default)]
pub struct SequentialNavigator {
    config: FocusableConfig,
    styles: Option<Rc<dyn StyleSource>>,
}

impl SequentialNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: FocusableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_styles(mut self, styles: Rc<dyn StyleSource>) -> Self {
        self.styles = Some(styles);
        self
    }

    /// Tab
    pub fn tab(&self, document: &Document) -> Option<NodeId> {
        self.press(document, "Tab", Modifiers::NONE)
    }

    /// Shift+Tab
    pub fn shift_tab(&self, document: &Document) -> Option<NodeId> {
        self.press(document, "Tab", Modifiers::SHIFT)
    }

    /// Press a key on the focused element (the body when nothing has focus)
    /// and run the default navigation. Returns the element focused afterwards.
    pub fn press(&self, document: &Document, key: &str, modifiers: Modifiers) -> Option<NodeId> {
        let target = document.active_element().unwrap_or_else(|| default_target(document));
        let mut event = KeyboardEvent::key_down(target, key, modifiers);

        if document.dispatch_key_event(&mut event) {
            if let Some(direction) = NavigationKey::from_event(&event) {
                self.advance(document, direction);
            }
        } else {
            tracing::trace!("'{}' on {:?}: default prevented", key, target);
        }
        document.active_element()
    }

    fn advance(&self, document: &Document, direction: NavigationKey) {
        let order = self.focusable(document).focusables(document);
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return;
        };

        let next = match document.active_element() {
            Some(current) => step(document, &order, current, direction),
            None if direction == NavigationKey::Forward => first,
            None => last,
        };
        tracing::trace!("Sequential navigation {:?} -> {:?}", direction, next);
        document.focus(next);
    }

    fn focusable(&self, document: &Document) -> Focusable {
        let focusable = Focusable::for_document(document, Some(self.config.clone()));
        match &self.styles {
            Some(styles) => focusable.with_styles(Rc::clone(styles)),
            None => focusable,
        }
    }
}

fn default_target(document: &Document) -> NodeId {
    [document.body(), document.document_element()]
        .into_iter()
        .find(|node| node.is_valid())
        .unwrap_or_else(|| document.root())
}

/// Neighbour of `current` in a non-empty tab order. An element outside the
/// order steps to the nearest focusable after (or before) it.
fn step(document: &Document, order: &[NodeId], current: NodeId, direction: NavigationKey) -> NodeId {
    let len = order.len();
    if let Some(index) = order.iter().position(|&node| node == current) {
        return match direction {
            NavigationKey::Forward => order[(index + 1) % len],
            NavigationKey::Backward => order[(index + len - 1) % len],
        };
    }

    let tree = document.tree();
    match direction {
        NavigationKey::Forward => order
            .iter()
            .copied()
            .find(|&node| tree.compare_document_order(current, node) == Some(Ordering::Less))
            .unwrap_or(order[0]),
        NavigationKey::Backward => order
            .iter()
            .rev()
            .copied()
            .find(|&node| tree.compare_document_order(node, current) == Some(Ordering::Less))
            .unwrap_or(order[len - 1]),
    }
}
