//! Focusable Elements
//!
//! Ordered keyboard-focusable descendants of a container, recomputed from
//! the live document on every query.

use std::fmt;
use std::rc::Rc;

use fos_css::{StyleResolver, StyleSource};
use fos_dom::{Document, ElementQuery, NodeId};

use crate::config::FocusableConfig;
use crate::rules::FocusContext;

/// Tracks the focusable descendants of a container
#[derive(Clone)]
pub struct Focusable {
    container: NodeId,
    config: FocusableConfig,
    /// Explicit style source; `None` resolves styles from the document's
    /// own `<style>` elements on every query
    styles: Option<Rc<dyn StyleSource>>,
}

impl Focusable {
    /// Track `container` with `config` (or the built-in configuration)
    pub fn new(container: NodeId, config: Option<FocusableConfig>) -> Self {
        Self {
            container,
            config: config.unwrap_or_default(),
            styles: None,
        }
    }

    /// Track the whole document
    pub fn for_document(document: &Document, config: Option<FocusableConfig>) -> Self {
        Self::new(document.document_element(), config)
    }

    /// Use a fixed style source instead of the document's stylesheets
    pub fn with_styles(mut self, styles: Rc<dyn StyleSource>) -> Self {
        self.styles = Some(styles);
        self
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn config(&self) -> &FocusableConfig {
        &self.config
    }

    /// All focusable descendants in document order
    pub fn focusables(&self, document: &Document) -> Vec<NodeId> {
        self.with_context(document, |ctx| {
            let candidates = self.candidates(document);
            let total = candidates.len();
            let focusables: Vec<NodeId> = candidates
                .into_iter()
                .filter(|&node| self.config.accepts(ctx, node))
                .collect();
            tracing::trace!(
                "{:?}: {} of {} candidates focusable",
                self.container,
                focusables.len(),
                total
            );
            focusables
        })
    }

    /// First focusable descendant
    pub fn first_focusable(&self, document: &Document) -> Option<NodeId> {
        self.with_context(document, |ctx| {
            self.candidates(document)
                .into_iter()
                .find(|&node| self.config.accepts(ctx, node))
        })
    }

    /// Last focusable descendant
    pub fn last_focusable(&self, document: &Document) -> Option<NodeId> {
        self.with_context(document, |ctx| {
            self.candidates(document)
                .into_iter()
                .rev()
                .find(|&node| self.config.accepts(ctx, node))
        })
    }

    pub fn is_first_focusable(&self, document: &Document, node: NodeId) -> bool {
        self.first_focusable(document) == Some(node)
    }

    pub fn is_last_focusable(&self, document: &Document, node: NodeId) -> bool {
        self.last_focusable(document) == Some(node)
    }

    /// Check a single node: a candidate inside the container that passes the predicate
    pub fn is_focusable(&self, document: &Document, node: NodeId) -> bool {
        let tree = document.tree();
        node != self.container
            && tree.contains(self.container, node)
            && tree.matches(node, &self.config.selectors)
            && self.with_context(document, |ctx| self.config.accepts(ctx, node))
    }

    fn candidates(&self, document: &Document) -> Vec<NodeId> {
        document
            .tree()
            .query_selector_all(self.container, &self.config.selectors)
    }

    fn with_context<R>(&self, document: &Document, f: impl FnOnce(&FocusContext<'_>) -> R) -> R {
        match &self.styles {
            Some(styles) => f(&FocusContext::new(document, styles.as_ref())),
            None => {
                let resolver = StyleResolver::for_document(document.tree());
                f(&FocusContext::new(document, &resolver))
            }
        }
    }
}

impl fmt::Debug for Focusable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Focusable")
            .field("container", &self.container)
            .field("config", &self.config)
            .field("custom_styles", &self.styles.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_css::ComputedStyle;
    use fos_dom::DomTree;

    fn build() -> (Document, NodeId, [NodeId; 3]) {
        let mut doc = Document::new("about:blank");
        let body = doc.body();
        let tree = doc.tree_mut();

        let container = tree.create_element("div");
        tree.append_child(body, container);
        let first = tree.create_element_with_attrs("a", &[("href", "#")]);
        let middle = tree.create_element_with_attrs("span", &[("tabindex", "-1")]);
        let last = tree.create_element("button");
        for node in [first, middle, last] {
            tree.append_child(container, node);
        }
        (doc, container, [first, middle, last])
    }

    #[test]
    fn test_first_and_last() {
        let (doc, container, [first, middle, last]) = build();
        let focusable = Focusable::new(container, None);

        assert_eq!(focusable.focusables(&doc), vec![first, last]);
        assert_eq!(focusable.first_focusable(&doc), Some(first));
        assert_eq!(focusable.last_focusable(&doc), Some(last));
        assert!(focusable.is_first_focusable(&doc, first));
        assert!(focusable.is_last_focusable(&doc, last));
        assert!(!focusable.is_focusable(&doc, middle));
        assert!(!focusable.is_focusable(&doc, container));
    }

    #[test]
    fn test_empty_container() {
        let mut doc = Document::new("about:blank");
        let body = doc.body();
        let empty = doc.tree_mut().create_element("div");
        doc.tree_mut().append_child(body, empty);

        let focusable = Focusable::new(empty, None);
        assert!(focusable.focusables(&doc).is_empty());
        assert_eq!(focusable.first_focusable(&doc), None);
        assert_eq!(focusable.last_focusable(&doc), None);
        assert!(!focusable.is_first_focusable(&doc, empty));
    }

    #[test]
    fn test_document_stylesheets_are_honored() {
        let (mut doc, container, [first, _, last]) = build();
        let head = doc.head();
        let tree = doc.tree_mut();
        let style = tree.create_element("style");
        let css = tree.create_text("a { display: none; }");
        tree.append_child(style, css);
        tree.append_child(head, style);

        let focusable = Focusable::new(container, None);
        assert_eq!(focusable.focusables(&doc), vec![last]);
        assert!(!focusable.is_focusable(&doc, first));
    }

    struct EverythingHidden;

    impl StyleSource for EverythingHidden {
        fn compute_style(&self, _tree: &DomTree, _node: NodeId) -> ComputedStyle {
            ComputedStyle {
                display: fos_css::Display::None,
                ..ComputedStyle::default()
            }
        }
    }

    #[test]
    fn test_custom_style_source() {
        let (doc, container, _) = build();
        let focusable = Focusable::new(container, None).with_styles(Rc::new(EverythingHidden));
        assert!(focusable.focusables(&doc).is_empty());
    }

    #[test]
    fn test_custom_predicate() {
        let (doc, container, [first, middle, last]) = build();
        let config = FocusableConfig::default_config()
            .with_predicate(|ctx, node| ctx.tree().tag_name(node) != Some("a"));
        let focusable = Focusable::new(container, Some(config));

        assert_eq!(focusable.focusables(&doc), vec![middle, last]);
        assert!(!focusable.is_focusable(&doc, first));
    }
}
