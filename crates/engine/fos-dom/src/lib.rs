//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree used as the host tree for focus management:
//! traversal, attribute access, selector queries, native tab order
//! reflection, focus state and keyboard event dispatch.

mod node;
mod tree;
mod document;
mod element;
mod selector;
mod dom_events;

pub use node::{Node, NodeData, ElementData, Attribute};
pub use tree::{DomTree, Children, Ancestors, Descendants};
pub use document::Document;
pub use element::{ElementQuery, InputType};
pub use selector::{SelectorList, SelectorError, Specificity};
pub use dom_events::{
    EventType, KeyboardEvent, KeyListener, ListenerId, ListenerRegistry, Modifiers,
};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
