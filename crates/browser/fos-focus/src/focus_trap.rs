//! Focus Trap
//!
//! Keeps Tab / Shift+Tab navigation inside a container: tabbing forward
//! from the last focusable element wraps to the first, and backward from
//! the first wraps to the last. Boundaries are recomputed on every key
//! press, so the trap follows changes to the tree.

use fos_dom::{Document, KeyboardEvent, ListenerId, NodeId};

use crate::config::FocusableConfig;
use crate::focusable::Focusable;

/// Sequential navigation direction of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    /// Tab
    Forward,
    /// Shift+Tab
    Backward,
}

impl NavigationKey {
    /// Classify a key press. Only the key identity and shift are inspected.
    pub fn from_event(event: &KeyboardEvent) -> Option<Self> {
        if event.key != "Tab" {
            return None;
        }
        Some(if event.shift_key() { Self::Backward } else { Self::Forward })
    }
}

/// Trap lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapState {
    Installed,
    Uninstalled,
}

/// Focus trap bound to one container
#[derive(Debug)]
pub struct FocusTrap {
    container: NodeId,
    focusable: Focusable,
    listener: Option<ListenerId>,
}

impl FocusTrap {
    /// Install a trap on `container` and focus its first focusable element
    pub fn new(document: &Document, container: NodeId, config: Option<FocusableConfig>) -> Self {
        Self::with_focusable(document, Focusable::new(container, config))
    }

    /// Install a trap around an existing `Focusable`
    pub fn with_focusable(document: &Document, focusable: Focusable) -> Self {
        let container = focusable.container();
        let handler = focusable.clone();
        let listener = document.add_key_listener(container, move |document, event| {
            handle_key(&handler, document, event);
        });
        tracing::debug!("Focus trap installed on {:?}", container);

        if let Some(first) = focusable.first_focusable(document) {
            document.focus(first);
        }

        Self {
            container,
            focusable,
            listener: Some(listener),
        }
    }

    /// Remove the key listener. Focus stays where it is; calling this again
    /// does nothing.
    pub fn uninstall(&mut self, document: &Document) {
        if let Some(listener) = self.listener.take() {
            document.remove_key_listener(listener);
            tracing::debug!("Focus trap uninstalled from {:?}", self.container);
        }
    }

    pub fn state(&self) -> TrapState {
        if self.listener.is_some() {
            TrapState::Installed
        } else {
            TrapState::Uninstalled
        }
    }

    pub fn is_installed(&self) -> bool {
        self.state() == TrapState::Installed
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The underlying focusable tracker
    pub fn focusable(&self) -> &Focusable {
        &self.focusable
    }
}

fn handle_key(focusable: &Focusable, document: &Document, event: &mut KeyboardEvent) {
    match NavigationKey::from_event(event) {
        Some(NavigationKey::Forward) if focusable.is_last_focusable(document, event.target) => {
            wrap_to(document, event, focusable.first_focusable(document));
        }
        Some(NavigationKey::Backward) if focusable.is_first_focusable(document, event.target) => {
            wrap_to(document, event, focusable.last_focusable(document));
        }
        _ => {}
    }
}

fn wrap_to(document: &Document, event: &mut KeyboardEvent, destination: Option<NodeId>) {
    if let Some(node) = destination {
        tracing::debug!("Focus trap wraps {:?} -> {:?}", event.target, node);
        document.focus(node);
    }
    event.prevent_default();
}
