//! Edge case tests for fos-html
//!
//! Malformed markup, implied structure and the pieces of the tree the focus
//! engine relies on (attributes, nesting, template exclusion).

use fos_dom::{ElementQuery, SelectorList};
use fos_html::{parse, parse_with_url};

#[test]
fn test_empty_input_gets_implied_structure() {
    let doc = parse("");
    assert!(doc.document_element().is_valid());
    assert!(doc.head().is_valid());
    assert!(doc.body().is_valid());
    assert_eq!(doc.tree().element_children(doc.body()).count(), 0);
}

#[test]
fn test_url_is_recorded() {
    let doc = parse_with_url("<p>hi</p>", "https://example.test/page");
    assert_eq!(doc.url(), "https://example.test/page");
}

#[test]
fn test_whitespace_text_is_dropped() {
    let doc = parse("<div>\n    <span> x </span>\n</div>");
    let div = doc.tree().element_children(doc.body()).next().unwrap();

    assert_eq!(doc.tree().children(div).count(), 1);
    assert_eq!(doc.tree().text_content(div), " x ");
}

#[test]
fn test_unclosed_tags_are_repaired() {
    let doc = parse("<ul><li>one<li>two</ul><p>after");
    let items = doc.tree().get_elements_by_tag_name(doc.root(), "li");
    assert_eq!(items.len(), 2);
    assert_eq!(doc.tree().get_elements_by_tag_name(doc.body(), "p").len(), 1);
}

#[test]
fn test_template_contents_are_not_in_tree() {
    let doc = parse(r#"<template><button data-testid="inside">x</button></template><button>y</button>"#);
    assert!(doc.find_by_attribute("data-testid", "inside").is_none());
    assert_eq!(doc.tree().get_elements_by_tag_name(doc.root(), "button").len(), 1);
}

#[test]
fn test_image_map_structure() {
    let doc = parse(
        r##"<map name="nav"><area href="#a" data-testid="area"></map>
            <img usemap="#nav" src="x.png" data-testid="img">"##,
    );
    let area = doc.find_by_attribute("data-testid", "area").unwrap();
    let map = doc.tree().parent_element(area).unwrap();

    assert_eq!(doc.tree().tag_name(map), Some("map"));
    assert_eq!(doc.tree().get_attribute(map, "name"), Some("nav"));

    let selector = SelectorList::parse(r##"img[usemap="#nav"]"##).unwrap();
    assert_eq!(
        doc.tree().query_selector(doc.root(), &selector),
        doc.find_by_attribute("data-testid", "img")
    );
}

#[test]
fn test_fieldset_legend_nesting() {
    let doc = parse(
        r#"<fieldset disabled><legend><input data-testid="in-legend"></legend>
           <input data-testid="in-fieldset"></fieldset>"#,
    );
    let in_legend = doc.find_by_attribute("data-testid", "in-legend").unwrap();
    let legend = doc.tree().parent_element(in_legend).unwrap();
    let fieldset = doc.tree().parent_element(legend).unwrap();

    assert_eq!(doc.tree().tag_name(legend), Some("legend"));
    assert!(doc.tree().has_attribute(fieldset, "disabled"));
}

#[test]
fn test_checked_attribute_and_boolean_attributes() {
    let doc = parse(r#"<input type="radio" name="g" checked data-testid="r"><details open></details>"#);
    let radio = doc.find_by_attribute("data-testid", "r").unwrap();
    assert!(doc.tree().is_checked(radio));
    assert_eq!(doc.tree().get_attribute(radio, "checked"), Some(""));
}

#[test]
fn test_deeply_nested_markup() {
    let html = format!("{}<a href='#'>deep</a>{}", "<div>".repeat(300), "</div>".repeat(300));
    let doc = parse(&html);
    let links = doc.tree().get_elements_by_tag_name(doc.root(), "a");
    assert_eq!(links.len(), 1);
    assert_eq!(doc.tree().text_content(links[0]), "deep");
}
