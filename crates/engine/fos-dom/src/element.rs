//! Element Query and Methods
//!
//! querySelector / querySelectorAll / closest / matches, plus the element
//! state the host reflects to scripts: `tabIndex`, `checked`, input `type`.

use crate::{DomTree, NodeId, SelectorList};

/// Element query trait
pub trait ElementQuery {
    /// First descendant of `root` matching the selector, in document order
    fn query_selector(&self, root: NodeId, selector: &SelectorList) -> Option<NodeId>;

    /// All descendants of `root` matching the selector, in document order
    fn query_selector_all(&self, root: NodeId, selector: &SelectorList) -> Vec<NodeId>;

    /// Get descendant elements by tag name
    fn get_elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId>;

    /// Find the closest inclusive ancestor matching the selector
    fn closest(&self, element: NodeId, selector: &SelectorList) -> Option<NodeId>;

    /// Check if element matches selector
    fn matches(&self, element: NodeId, selector: &SelectorList) -> bool;
}

impl ElementQuery for DomTree {
    fn query_selector(&self, root: NodeId, selector: &SelectorList) -> Option<NodeId> {
        self.descendants(root).find(|&id| selector.matches(self, id))
    }

    fn query_selector_all(&self, root: NodeId, selector: &SelectorList) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    fn get_elements_by_tag_name(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .filter(|&id| (tag == "*" && self.is_element(id)) || self.is_element_named(id, tag))
            .collect()
    }

    fn closest(&self, element: NodeId, selector: &SelectorList) -> Option<NodeId> {
        std::iter::once(element)
            .chain(self.ancestors(element))
            .find(|&id| selector.matches(self, id))
    }

    fn matches(&self, element: NodeId, selector: &SelectorList) -> bool {
        selector.matches(self, element)
    }
}

/// HTML input types relevant to focus handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    #[default]
    Text,
    Hidden,
    Checkbox,
    Radio,
    Button,
    Other,
}

impl InputType {
    /// Parse from the `type` attribute (missing or unknown means text)
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "hidden" => Self::Hidden,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "button" | "submit" | "reset" | "image" => Self::Button,
            "" | "text" | "search" | "email" | "password" | "tel" | "url" => Self::Text,
            "number" | "range" | "color" | "date" | "time" | "datetime-local" | "month" | "week"
            | "file" => Self::Other,
            _ => Self::Text,
        }
    }
}

impl DomTree {
    /// Reflected `tabIndex`: a valid `tabindex` attribute wins, otherwise the
    /// element's default sequential focus position (0) or -1.
    pub fn tab_index(&self, id: NodeId) -> i32 {
        let Some(elem) = self.element(id) else { return -1 };
        if let Some(value) = elem.get_attr("tabindex").and_then(parse_html_integer) {
            return value;
        }
        match elem.name.as_str() {
            "a" | "area" if elem.has_attr("href") => 0,
            "button" | "input" | "select" | "textarea" | "iframe" | "object" | "embed" => 0,
            "summary" if self.is_summary_for_parent_details(id) => 0,
            _ => -1,
        }
    }

    /// True if `id` is the first `summary` child of a `details` parent
    pub fn is_summary_for_parent_details(&self, id: NodeId) -> bool {
        let Some(parent) = self.parent_element(id) else { return false };
        self.is_element_named(parent, "details")
            && self
                .element_children(parent)
                .find(|&child| self.is_element_named(child, "summary"))
                == Some(id)
    }

    /// Input type of an `input` element
    pub fn input_type(&self, id: NodeId) -> Option<InputType> {
        let elem = self.element(id).filter(|e| e.is("input"))?;
        Some(elem.get_attr("type").map(InputType::parse).unwrap_or_default())
    }

    /// Current checkedness
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| e.is_checked())
    }

    /// Set checkedness the way user interaction does (the attribute is left alone).
    /// Checking a radio button unchecks the rest of its named group.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        let group = if checked && self.input_type(id) == Some(InputType::Radio) {
            self.get_attribute(id, "name").filter(|n| !n.is_empty()).map(str::to_string)
        } else {
            None
        };

        if let Some(name) = group {
            let members: Vec<NodeId> = self
                .descendants(self.root())
                .filter(|&other| {
                    other != id
                        && self.input_type(other) == Some(InputType::Radio)
                        && self.get_attribute(other, "name") == Some(name.as_str())
                })
                .collect();
            for member in members {
                if let Some(elem) = self.element_mut(member) {
                    elem.checkedness = Some(false);
                }
            }
        }

        if let Some(elem) = self.element_mut(id) {
            elem.checkedness = Some(checked);
        }
    }
}

/// HTML "rules for parsing integers"
fn parse_html_integer(value: &str) -> Option<i32> {
    let trimmed = value.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).ok()
}
