//! Document - High-level document API
//!
//! Owns the tree plus the interaction state layered on top of it: which
//! element has focus and which key listeners are attached where. Reads and
//! event dispatch work through `&Document`; only structural edits need
//! `&mut Document`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::{
    DomTree, EventType, KeyListener, KeyboardEvent, ListenerId, ListenerRegistry, NodeId,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Currently focused element
    focused: Cell<Option<NodeId>>,
    /// Event listeners by node
    listeners: RefCell<ListenerRegistry>,
}

impl Document {
    /// Create a new document with `<html><head></head><body></body></html>`
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            focused: Cell::new(None),
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            focused: Cell::new(None),
            listeners: RefCell::new(ListenerRegistry::new()),
        }
    }

    /// Locate `<html>`, `<head>` and `<body>` after the tree was built externally
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        self.html_element = tree
            .element_children(tree.root())
            .find(|&id| tree.is_element_named(id, "html"))
            .unwrap_or(NodeId::NONE);
        self.head_element = tree
            .element_children(self.html_element)
            .find(|&id| tree.is_element_named(id, "head"))
            .unwrap_or(NodeId::NONE);
        self.body_element = tree
            .element_children(self.html_element)
            .find(|&id| tree.is_element_named(id, "body"))
            .unwrap_or(NodeId::NONE);
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.is_element_named(id, "title"))
            .map(|title| self.tree.text_content(title).trim().to_string())
            .unwrap_or_default()
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element, falling back to the document node
    pub fn document_element(&self) -> NodeId {
        if self.html_element.is_valid() {
            self.html_element
        } else {
            self.tree.root()
        }
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, "id") == Some(id))
    }

    /// First element carrying `attr="value"`
    pub fn find_by_attribute(&self, attr: &str, value: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.get_attribute(node, attr) == Some(value))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Move focus to an element. Returns false for non-elements.
    pub fn focus(&self, node: NodeId) -> bool {
        if !self.tree.is_element(node) {
            return false;
        }
        tracing::trace!("focus {:?} <{}>", node, self.tree.tag_name(node).unwrap_or_default());
        self.focused.set(Some(node));
        true
    }

    /// Drop focus
    pub fn blur(&self) {
        self.focused.set(None);
    }

    /// Currently focused element, if it is still attached to the document
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
            .get()
            .filter(|&node| self.tree.contains(self.tree.root(), node))
    }

    // ---------------------------------------------------------------------
    // Events
    // ---------------------------------------------------------------------

    /// Register a listener for an event type on a node
    pub fn add_event_listener(&self, node: NodeId, event_type: EventType, listener: KeyListener) -> ListenerId {
        self.listeners.borrow_mut().add(node, event_type, listener)
    }

    /// Register a keydown listener on a node
    pub fn add_key_listener<F>(&self, node: NodeId, listener: F) -> ListenerId
    where
        F: Fn(&Document, &mut KeyboardEvent) + 'static,
    {
        self.add_event_listener(node, EventType::KeyDown, Rc::new(listener))
    }

    /// Unregister a listener. Removing an unknown listener is a no-op.
    pub fn remove_key_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow_mut().remove(id)
    }

    /// Check if a listener is still registered
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.borrow().contains(id)
    }

    /// Number of listeners attached to a node
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.listeners.borrow().count_on(node)
    }

    /// Dispatch a key event from its target up through the ancestors.
    /// Returns false if a listener prevented the default action.
    pub fn dispatch_key_event(&self, event: &mut KeyboardEvent) -> bool {
        let path: Vec<NodeId> = std::iter::once(event.target)
            .chain(self.tree.ancestors(event.target))
            .collect();
        tracing::trace!("dispatch {:?} '{}' through {} nodes", event.event_type, event.key, path.len());

        for node in path {
            event.current_target = Some(node);
            let listeners = self.listeners.borrow().listeners_for(node, event.event_type);
            for (id, listener) in listeners {
                // Removed by an earlier listener during this dispatch
                if !self.has_listener(id) {
                    continue;
                }
                listener(self, event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        !event.is_default_prevented()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
