//! Edge case and stress tests for fos-css
//!
//! Tests rare CSS scenarios, malformed input, and stress conditions.

use fos_css::{parse_stylesheet, CssParser, Display, StyleResolver, StyleSource, Visibility};
use fos_dom::{DomTree, NodeId};

fn append(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let id = tree.create_element_with_attrs(tag, attrs);
    tree.append_child(parent, id);
    id
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_whitespace_only() {
    let css = "   \t\n\r\n   ";
    let result = CssParser::new().parse(css).unwrap();
    assert_eq!(result.len(), 0);
}

#[test]
fn test_parse_comment_only() {
    let css = "/* just a comment */";
    let result = CssParser::new().parse(css).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_parse_empty_rule() {
    let result = parse_stylesheet("div { }").unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.rules[0].declarations.is_empty());
}

#[test]
fn test_at_rules_are_ignored() {
    let css = r#"
        @media print { div { display: none; } }
        @keyframes spin { from { opacity: 0; } to { opacity: 1; } }
        p { display: none; }
    "#;
    let result = parse_stylesheet(css).unwrap();
    assert_eq!(result.len(), 1);
}

// ============================================================================
// INLINE STYLE EDGE CASES
// ============================================================================

#[test]
fn test_inline_style_empty() {
    let declarations = CssParser::new().parse_inline("").unwrap();
    assert!(declarations.is_empty());
}

#[test]
fn test_inline_style_last_declaration_wins() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = append(&mut tree, root, "div", &[("style", "display: none; display: flex")]);

    let resolver = StyleResolver::new();
    assert_eq!(resolver.compute_style(&tree, div).display, Display::Flex);
}

#[test]
fn test_inline_style_with_unknown_properties() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = append(&mut tree, root, "div", &[("style", "made-up: 12; visibility: hidden")]);

    let resolver = StyleResolver::new();
    assert_eq!(resolver.compute_style(&tree, div).visibility, Visibility::Hidden);
}

#[test]
fn test_style_attribute_is_read_live() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = append(&mut tree, root, "div", &[]);
    let resolver = StyleResolver::new();

    assert!(!resolver.compute_style(&tree, div).is_display_none());
    tree.set_attribute(div, "style", "display: none");
    assert!(resolver.compute_style(&tree, div).is_display_none());
    tree.remove_attribute(div, "style");
    assert!(!resolver.compute_style(&tree, div).is_display_none());
}

// ============================================================================
// CASCADE EDGE CASES
// ============================================================================

#[test]
fn test_text_nodes_get_initial_style() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = append(&mut tree, root, "div", &[("style", "visibility: hidden")]);
    let text = tree.create_text("hello");
    tree.append_child(div, text);

    let style = StyleResolver::new().compute_style(&tree, text);
    assert_eq!(style.visibility, Visibility::Visible);
}

#[test]
fn test_display_is_not_inherited() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let outer = append(&mut tree, root, "div", &[("style", "display: none")]);
    let inner = append(&mut tree, outer, "span", &[]);

    let style = StyleResolver::new().compute_style(&tree, inner);
    assert_eq!(style.display, Display::Inline);
}

#[test]
fn test_author_rule_beats_user_agent() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let area = append(&mut tree, root, "area", &[]);
    let hidden = append(&mut tree, root, "p", &[("hidden", "")]);

    let mut resolver = StyleResolver::new();
    resolver.add_stylesheet("area, p { display: block; }").unwrap();

    assert_eq!(resolver.compute_style(&tree, area).display, Display::Block);
    assert_eq!(resolver.compute_style(&tree, hidden).display, Display::Block);
}

#[test]
fn test_later_stylesheet_wins_at_equal_specificity() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = append(&mut tree, root, "div", &[("class", "a b")]);

    let mut resolver = StyleResolver::new();
    resolver.add_stylesheet(".a { visibility: hidden; }").unwrap();
    resolver.add_stylesheet(".b { visibility: visible; }").unwrap();

    assert_eq!(resolver.compute_style(&tree, div).visibility, Visibility::Visible);
}

#[test]
fn test_descendant_rules_follow_structure() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let nav = append(&mut tree, root, "nav", &[]);
    let link = append(&mut tree, nav, "a", &[("href", "#")]);
    let other = append(&mut tree, root, "a", &[("href", "#")]);

    let mut resolver = StyleResolver::new();
    resolver.add_stylesheet("nav > a { display: none; }").unwrap();

    assert!(resolver.compute_style(&tree, link).is_display_none());
    assert!(!resolver.compute_style(&tree, other).is_display_none());

    // Moving the link out of the nav changes the answer
    tree.append_child(root, link);
    assert!(!resolver.compute_style(&tree, link).is_display_none());
}

// ============================================================================
// STRESS
// ============================================================================

#[test]
fn test_many_rules() {
    let css: String = (0..500)
        .map(|i| format!(".c{i} {{ display: block; }}\n"))
        .collect();
    let mut resolver = StyleResolver::new();
    let before = resolver.rule_count();
    resolver.add_stylesheet(&css).unwrap();
    assert_eq!(resolver.rule_count(), before + 500);
}

#[test]
fn test_deep_visibility_inheritance() {
    let mut tree = DomTree::new();
    let mut parent = append(&mut tree, NodeId::ROOT, "div", &[("style", "visibility: hidden")]);
    for _ in 0..200 {
        parent = append(&mut tree, parent, "div", &[]);
    }

    let style = StyleResolver::new().compute_style(&tree, parent);
    assert_eq!(style.visibility, Visibility::Hidden);
}
