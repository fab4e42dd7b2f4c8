//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node detaches it, so any `NodeId`
//! handed out stays valid (and simply becomes unreachable from the root).

use crate::{ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena (detached ones included)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(Node::element(name))
    }

    /// Create a detached element with attributes
    pub fn create_element_with_attrs(&mut self, name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut node = Node::element(name);
        if let Some(elem) = node.as_element_mut() {
            for (attr, value) in attrs {
                elem.set_attr(attr, value);
            }
        }
        self.push(node)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, NodeId::NONE);
    }

    /// Insert `child` before `reference` (append when `reference` is NONE)
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if parent == child || reference == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        if reference.is_valid() && self.parent(reference) != Some(parent) {
            return;
        }
        // Inserting an ancestor below its own descendant would create a cycle
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);

        let prev = if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling
        } else {
            self.nodes[parent.index()].last_child
        };

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        if reference.is_valid() {
            self.nodes[reference.index()].prev_sibling = child;
        } else {
            self.nodes[parent.index()].last_child = child;
        }
    }

    /// Remove `child` from `parent`. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    /// Unlink a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Parent if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let next = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children { tree: self, next }
    }

    /// Iterate over direct element children
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    /// Strict ancestors, nearest first (document node included)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
        Ancestors { tree: self, next }
    }

    /// Descendants of `root` in pre-order (document order), `root` excluded
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let next = self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants { tree: self, root, next }
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Relative pre-order position of two nodes, `None` if they are in different trees
    pub fn compare_document_order(&self, a: NodeId, b: NodeId) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering;

        if a == b {
            return self.get(a).map(|_| Ordering::Equal);
        }
        let path_a = self.path_from_top(a);
        let path_b = self.path_from_top(b);
        if path_a.first() != path_b.first() {
            return None;
        }

        let common = path_a.iter().zip(&path_b).take_while(|(x, y)| x == y).count();
        match (path_a.get(common), path_b.get(common)) {
            // One node is an ancestor of the other; ancestors come first
            (None, _) => Some(Ordering::Less),
            (_, None) => Some(Ordering::Greater),
            (Some(&child_a), Some(&child_b)) => {
                let a_first = self
                    .children(path_a[common - 1])
                    .map(|(child, _)| child)
                    .find(|&child| child == child_a || child == child_b)
                    == Some(child_a);
                Some(if a_first { Ordering::Less } else { Ordering::Greater })
            }
        }
    }

    /// Inclusive ancestor chain, topmost first
    fn path_from_top(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = std::iter::once(id).chain(self.ancestors(id)).collect();
        path.reverse();
        path
    }

    /// Check if a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Element data of a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Mutable element data of a node
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Lowercase local name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.name.as_str())
    }

    /// Check if a node is an element with the given local name
    pub fn is_element_named(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(name))
    }

    /// Get an attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|e| e.get_attr(name))
    }

    /// Check attribute presence
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute. Returns false for non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        match self.element_mut(id) {
            Some(elem) => {
                elem.set_attr(name, value);
                true
            }
            None => false,
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id).and_then(|e| e.remove_attr(name))
    }

    /// Text content of a node and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.get(d).and_then(Node::as_text))
            .collect()
    }

    /// Check if a node is the document node
    pub fn is_document(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Document))
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the strict ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Descendants<'_> {
    /// Next node in pre-order that is still inside `root`
    fn following(&self, id: NodeId) -> NodeId {
        let Some(node) = self.tree.get(id) else { return NodeId::NONE };
        if node.first_child.is_valid() {
            return node.first_child;
        }
        let mut current = id;
        loop {
            if current == self.root {
                return NodeId::NONE;
            }
            let Some(node) = self.tree.get(current) else { return NodeId::NONE };
            if node.next_sibling.is_valid() {
                return node.next_sibling;
            }
            current = node.parent;
            if !current.is_valid() {
                return NodeId::NONE;
            }
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next;
        self.tree.get(id)?;
        self.next = self.following(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, [NodeId; 5]) {
        // root > div > (span > b), p
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        let b = tree.create_element("b");
        let p = tree.create_element("p");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), div);
        tree.append_child(div, span);
        tree.append_child(span, b);
        tree.append_child(div, p);
        tree.append_child(p, text);
        (tree, [div, span, b, p, text])
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, [div, span, b, p, text]) = sample();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, span, b, p, text]);

        let inner: Vec<_> = tree.descendants(span).collect();
        assert_eq!(inner, vec![b]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, [div, span, b, ..]) = sample();
        let chain: Vec<_> = tree.ancestors(b).collect();
        assert_eq!(chain, vec![span, div, tree.root()]);
    }

    #[test]
    fn test_insert_before_and_remove() {
        let (mut tree, [div, span, _, p, _]) = sample();
        let em = tree.create_element("em");
        tree.insert_before(div, em, p);

        let kids: Vec<_> = tree.element_children(div).collect();
        assert_eq!(kids, vec![span, em, p]);

        assert!(tree.remove_child(div, span));
        assert!(!tree.remove_child(div, span));
        let kids: Vec<_> = tree.element_children(div).collect();
        assert_eq!(kids, vec![em, p]);
        assert_eq!(tree.parent(span), None);
    }

    #[test]
    fn test_append_moves_existing_child() {
        let (mut tree, [div, span, b, p, _]) = sample();
        tree.append_child(p, b);

        assert_eq!(tree.parent(b), Some(p));
        assert_eq!(tree.children(span).count(), 0);
        assert!(tree.contains(div, b));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, [div, _, b, ..]) = sample();
        tree.append_child(b, div);
        assert_eq!(tree.parent(div), Some(tree.root()));
    }

    #[test]
    fn test_text_content() {
        let (tree, [div, ..]) = sample();
        assert_eq!(tree.text_content(div), "hi");
    }

    #[test]
    fn test_compare_document_order() {
        use std::cmp::Ordering;

        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element("div");
        let first = tree.create_element("a");
        let second = tree.create_element("b");
        let after = tree.create_element("p");
        tree.append_child(root, div);
        tree.append_child(div, first);
        tree.append_child(div, second);
        tree.append_child(root, after);
        let detached = tree.create_element("span");

        assert_eq!(tree.compare_document_order(first, second), Some(Ordering::Less));
        assert_eq!(tree.compare_document_order(after, second), Some(Ordering::Greater));
        assert_eq!(tree.compare_document_order(div, second), Some(Ordering::Less));
        assert_eq!(tree.compare_document_order(second, div), Some(Ordering::Greater));
        assert_eq!(tree.compare_document_order(first, first), Some(Ordering::Equal));
        assert_eq!(tree.compare_document_order(first, detached), None);
    }
}
