//! DOM Events
//!
//! Keyboard events and the per-node listener registry they are
//! dispatched through.

use std::fmt;
use std::rc::Rc;

use crate::{Document, NodeId};

/// DOM event types handled by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
}

/// Modifier keys held during a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false, meta: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false, meta: false };

    pub fn none() -> Self { Self::NONE }
    pub fn shift() -> Self { Self::SHIFT }
}

/// Keyboard event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub event_type: EventType,
    /// Logical key identity ("Tab", "Enter", "a", ...)
    pub key: String,
    pub modifiers: Modifiers,
    /// Origin element
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: Option<NodeId>,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl KeyboardEvent {
    /// Create a keydown event
    pub fn key_down(target: NodeId, key: &str, modifiers: Modifiers) -> Self {
        Self {
            event_type: EventType::KeyDown,
            key: key.to_string(),
            modifiers,
            target,
            current_target: None,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    #[inline]
    pub fn shift_key(&self) -> bool {
        self.modifiers.shift
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Key event listener. Receives the document so it can query the live tree
/// and move focus while the event is in flight.
pub type KeyListener = Rc<dyn Fn(&Document, &mut KeyboardEvent)>;

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    listener: KeyListener,
}

/// Listeners by target node, kept in registration order
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    entries: Vec<ListenerEntry>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener on a node
    pub fn add(&mut self, node: NodeId, event_type: EventType, listener: KeyListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(ListenerEntry { id, node, event_type, listener });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Snapshot of the listeners registered on `node` for `event_type`
    pub fn listeners_for(&self, node: NodeId, event_type: EventType) -> Vec<(ListenerId, KeyListener)> {
        self.entries
            .iter()
            .filter(|e| e.node == node && e.event_type == event_type)
            .map(|e| (e.id, Rc::clone(&e.listener)))
            .collect()
    }

    /// Number of registered listeners on a node
    pub fn count_on(&self, node: NodeId) -> usize {
        self.entries.iter().filter(|e| e.node == node).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field("listeners", &self.entries.len())
            .finish()
    }
}
