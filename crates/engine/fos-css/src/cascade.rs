//! Style Cascade & Resolver
//!
//! Computes the final styles for DOM elements by:
//! 1. Matching selectors against elements
//! 2. Sorting by cascade level, specificity and source order
//! 3. Inheriting `visibility` from the nearest ancestor that sets it

use fos_dom::{DomTree, NodeId, SelectorList, Specificity};

use crate::computed::{ComputedStyle, Visibility};
use crate::{CssError, CssParser, Declaration, PropertyValue, Stylesheet};

/// Source of computed styles for elements of a tree.
///
/// Answers are read fresh on every call, so they always reflect the
/// current attributes and structure.
pub trait StyleSource {
    fn compute_style(&self, tree: &DomTree, node: NodeId) -> ComputedStyle;
}

/// User agent stylesheet (browser defaults)
const UA_STYLESHEET: &str = r#"
html, body, address, article, aside, blockquote, details, dialog, dd, div, dl,
dt, fieldset, figcaption, figure, footer, form, h1, h2, h3, h4, h5, h6, header,
hgroup, hr, legend, li, main, menu, nav, ol, p, pre, search, section, summary,
table, ul {
    display: block;
}

[hidden], area, base, datalist, head, link, meta, noscript, param, rp, script,
style, template, title {
    display: none;
}

input[type="hidden" i] {
    display: none !important;
}
"#;

/// Cascade levels, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CascadeLevel {
    UserAgent,
    Author,
    Inline,
    AuthorImportant,
    InlineImportant,
    UserAgentImportant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    UserAgent,
    Author,
}

impl Origin {
    fn level(self, important: bool) -> CascadeLevel {
        match (self, important) {
            (Origin::UserAgent, false) => CascadeLevel::UserAgent,
            (Origin::UserAgent, true) => CascadeLevel::UserAgentImportant,
            (Origin::Author, false) => CascadeLevel::Author,
            (Origin::Author, true) => CascadeLevel::AuthorImportant,
        }
    }
}

/// A rule whose selector was compiled for matching
#[derive(Debug)]
struct CompiledRule {
    selectors: SelectorList,
    declarations: Vec<Declaration>,
    origin: Origin,
}

/// Cascaded (pre-inheritance) values of one element
#[derive(Debug, Default)]
struct Cascaded {
    style: ComputedStyle,
    visibility_set: bool,
}

/// Style resolver - computes styles for DOM elements
#[derive(Debug)]
pub struct StyleResolver {
    /// User agent rules followed by author rules, in source order
    rules: Vec<CompiledRule>,
    parser: CssParser,
}

impl StyleResolver {
    /// Resolver with the user agent defaults only
    pub fn new() -> Self {
        let mut resolver = Self {
            rules: Vec::new(),
            parser: CssParser::new(),
        };
        match resolver.parser.parse(UA_STYLESHEET) {
            Ok(sheet) => resolver.compile(sheet, Origin::UserAgent),
            Err(err) => tracing::warn!("User agent stylesheet failed to parse: {}", err),
        }
        resolver
    }

    /// Resolver with the user agent defaults plus every `<style>` element of the tree
    pub fn for_document(tree: &DomTree) -> Self {
        let mut resolver = Self::new();
        let style_elements: Vec<NodeId> = tree
            .descendants(tree.root())
            .filter(|&id| tree.is_element_named(id, "style"))
            .collect();
        for style in style_elements {
            if let Err(err) = resolver.add_stylesheet(&tree.text_content(style)) {
                tracing::warn!("Ignoring <style> element {:?}: {}", style, err);
            }
        }
        resolver
    }

    /// Parse and add an author stylesheet
    pub fn add_stylesheet(&mut self, css: &str) -> Result<(), CssError> {
        let sheet = self.parser.parse(css)?;
        self.add_parsed(sheet);
        Ok(())
    }

    /// Add an already parsed author stylesheet
    pub fn add_parsed(&mut self, sheet: Stylesheet) {
        self.compile(sheet, Origin::Author);
    }

    /// Number of rules taking part in the cascade
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    fn compile(&mut self, sheet: Stylesheet, origin: Origin) {
        for rule in sheet.rules {
            if rule.declarations.is_empty() {
                continue;
            }
            match SelectorList::parse(&rule.selectors) {
                Ok(selectors) => self.rules.push(CompiledRule {
                    selectors,
                    declarations: rule.declarations,
                    origin,
                }),
                Err(err) => tracing::warn!("Skipping unsupported selector '{}': {}", rule.selectors, err),
            }
        }
    }

    /// Cascade the declarations that apply directly to an element
    fn cascade(&self, tree: &DomTree, node: NodeId) -> Cascaded {
        let mut matches: Vec<(CascadeLevel, Specificity, usize, Declaration)> = Vec::new();

        for (order, rule) in self.rules.iter().enumerate() {
            if let Some(specificity) = rule.selectors.matching_specificity(tree, node) {
                for decl in &rule.declarations {
                    matches.push((rule.origin.level(decl.important), specificity, order, *decl));
                }
            }
        }

        if let Some(style) = tree.get_attribute(node, "style") {
            match self.parser.parse_inline(style) {
                Ok(declarations) => {
                    for decl in declarations {
                        let level = if decl.important {
                            CascadeLevel::InlineImportant
                        } else {
                            CascadeLevel::Inline
                        };
                        matches.push((level, Specificity::default(), self.rules.len(), decl));
                    }
                }
                Err(err) => tracing::warn!("Ignoring malformed style attribute on {:?}: {}", node, err),
            }
        }

        // Stable sort keeps declaration order within a rule
        matches.sort_by_key(|&(level, specificity, order, _)| (level, specificity, order));

        let mut cascaded = Cascaded::default();
        for (_, _, _, decl) in &matches {
            cascaded.style.apply_declaration(decl);
            if matches!(decl.value, PropertyValue::Visibility(_)) {
                cascaded.visibility_set = true;
            }
        }
        cascaded
    }
}

impl StyleSource for StyleResolver {
    fn compute_style(&self, tree: &DomTree, node: NodeId) -> ComputedStyle {
        if !tree.is_element(node) {
            return ComputedStyle::default();
        }

        let own = self.cascade(tree, node);
        let mut style = own.style;
        if !own.visibility_set {
            style.visibility = tree
                .ancestors(node)
                .filter(|&ancestor| tree.is_element(ancestor))
                .map(|ancestor| self.cascade(tree, ancestor))
                .find(|cascaded| cascaded.visibility_set)
                .map_or(Visibility::Visible, |cascaded| cascaded.style.visibility);
        }
        style
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computed::Display;

    fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = tree.create_element_with_attrs(tag, attrs);
        tree.append_child(parent, id);
        id
    }

    #[test]
    fn test_ua_defaults() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = element(&mut tree, root, "div", &[]);
        let span = element(&mut tree, root, "span", &[]);
        let area = element(&mut tree, root, "area", &[]);
        let resolver = StyleResolver::new();

        assert_eq!(resolver.compute_style(&tree, div).display, Display::Block);
        assert_eq!(resolver.compute_style(&tree, span).display, Display::Inline);
        assert!(resolver.compute_style(&tree, area).is_display_none());
    }

    #[test]
    fn test_hidden_attribute_yields_to_inline_display() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let hidden = element(&mut tree, root, "div", &[("hidden", "")]);
        let shown = element(&mut tree, root, "div", &[("hidden", ""), ("style", "display: block")]);
        let resolver = StyleResolver::new();

        assert!(resolver.compute_style(&tree, hidden).is_display_none());
        assert_eq!(resolver.compute_style(&tree, shown).display, Display::Block);
    }

    #[test]
    fn test_hidden_input_cannot_be_shown() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let input = element(&mut tree, root, "input", &[("type", "HIDDEN"), ("style", "display: inline-block !important")]);
        let resolver = StyleResolver::new();

        assert!(resolver.compute_style(&tree, input).is_display_none());
    }

    #[test]
    fn test_visibility_inherits() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let outer = element(&mut tree, root, "div", &[("style", "visibility: hidden")]);
        let middle = element(&mut tree, outer, "div", &[]);
        let inner = element(&mut tree, middle, "div", &[("style", "visibility: visible")]);
        let deepest = element(&mut tree, inner, "span", &[]);
        let resolver = StyleResolver::new();

        assert!(resolver.compute_style(&tree, middle).is_visibility_hidden());
        assert!(!resolver.compute_style(&tree, inner).is_visibility_hidden());
        assert!(!resolver.compute_style(&tree, deepest).is_visibility_hidden());
    }

    #[test]
    fn test_author_specificity_and_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = element(&mut tree, root, "div", &[("class", "panel"), ("id", "main")]);

        let mut resolver = StyleResolver::new();
        resolver
            .add_stylesheet("#main { display: flex; } .panel { display: none; } div { display: grid; }")
            .unwrap();
        assert_eq!(resolver.compute_style(&tree, div).display, Display::Flex);

        resolver.add_stylesheet(".panel { display: none !important; }").unwrap();
        assert!(resolver.compute_style(&tree, div).is_display_none());
    }

    #[test]
    fn test_unsupported_selectors_are_skipped() {
        let mut resolver = StyleResolver::new();
        let before = resolver.rule_count();
        resolver
            .add_stylesheet("a:hover { display: none; } p { display: none; } q { color: red; }")
            .unwrap();
        assert_eq!(resolver.rule_count(), before + 1);
    }

    #[test]
    fn test_for_document_reads_style_elements() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let style = element(&mut tree, root, "style", &[]);
        let css = tree.create_text(".gone { visibility: collapse }");
        tree.append_child(style, css);
        let div = element(&mut tree, root, "div", &[("class", "gone")]);

        let resolver = StyleResolver::for_document(&tree);
        assert_eq!(resolver.compute_style(&tree, div).visibility, Visibility::Collapse);
    }
}
