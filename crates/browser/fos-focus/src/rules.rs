//! Focusability Rules
//!
//! Each rule is a pure `(context, node) -> bool` check over the live tree and
//! computed styles. `is_focusable` chains them and stops at the first failure:
//!
//! 1. visible: rendered itself and through every ancestor (image map areas
//!    are judged by the image that uses their map)
//! 2. enabled: no disabled control or fieldset applies to it
//! 3. radio exclusivity: one tab stop per named radio group
//! 4. tabbable: native tab order, or one of the elements that are tabbable
//!    without it

use std::cell::OnceCell;
use std::collections::HashMap;
use std::iter;

use fos_css::{ComputedStyle, StyleSource};
use fos_dom::{Document, DomTree, ElementQuery, InputType, NodeId};

/// Elements the `disabled` attribute applies to
const DISABLEABLE: &[&str] = &["button", "fieldset", "input", "select", "textarea"];

/// Form controls that stay enabled inside a legend of a disabled fieldset
const FORM_CONTROLS: &[&str] = &["button", "fieldset", "input", "select", "textarea"];

/// Per-query view of the document.
///
/// Document-wide cross references (image maps, radio groups) are built the
/// first time a rule asks for them and live as long as the context.
pub struct FocusContext<'a> {
    document: &'a Document,
    styles: &'a dyn StyleSource,
    /// `usemap` value -> first image using it
    image_maps: OnceCell<HashMap<String, NodeId>>,
    /// Radio group name -> members in document order
    radio_groups: OnceCell<HashMap<String, Vec<NodeId>>>,
}

impl<'a> FocusContext<'a> {
    pub fn new(document: &'a Document, styles: &'a dyn StyleSource) -> Self {
        Self {
            document,
            styles,
            image_maps: OnceCell::new(),
            radio_groups: OnceCell::new(),
        }
    }

    #[inline]
    pub fn document(&self) -> &'a Document {
        self.document
    }

    #[inline]
    pub fn tree(&self) -> &'a DomTree {
        self.document.tree()
    }

    /// Computed style of a node
    pub fn style(&self, node: NodeId) -> ComputedStyle {
        self.styles.compute_style(self.tree(), node)
    }

    /// First `img` in the document whose `usemap` is exactly `usemap`
    pub fn image_for_map(&self, usemap: &str) -> Option<NodeId> {
        self.image_maps
            .get_or_init(|| {
                let tree = self.tree();
                let mut maps = HashMap::new();
                for node in tree.get_elements_by_tag_name(tree.root(), "img") {
                    if let Some(usemap) = tree.get_attribute(node, "usemap") {
                        maps.entry(usemap.to_string()).or_insert(node);
                    }
                }
                maps
            })
            .get(usemap)
            .copied()
    }

    /// Radio inputs of the document sharing `name`, in document order
    pub fn radio_group(&self, name: &str) -> &[NodeId] {
        self.radio_groups
            .get_or_init(|| {
                let tree = self.tree();
                let mut groups: HashMap<String, Vec<NodeId>> = HashMap::new();
                for node in tree.descendants(tree.root()) {
                    if tree.input_type(node) != Some(InputType::Radio) {
                        continue;
                    }
                    if let Some(group) = tree.get_attribute(node, "name").filter(|n| !n.is_empty()) {
                        groups.entry(group.to_string()).or_default().push(node);
                    }
                }
                groups
            })
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The image an `area` stands for: the image using the area's parent `map`
    pub fn image_of_area(&self, area: NodeId) -> Option<NodeId> {
        let tree = self.tree();
        if !tree.is_element_named(area, "area") {
            return None;
        }
        let map = tree.parent_element(area).filter(|&p| tree.is_element_named(p, "map"))?;
        let name = tree.get_attribute(map, "name").unwrap_or_default();
        self.image_for_map(&format!("#{name}"))
    }
}

/// Default refinement predicate
pub fn is_focusable(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    is_visible(ctx, node)
        && is_enabled(ctx, node)
        && is_selectable_radio(ctx, node)
        && is_tabbable(ctx, node)
}

/// Refinement predicate of the inert-aware configuration
pub fn is_focusable_inert_aware(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    !is_area_image_inert(ctx, node) && is_focusable(ctx, node)
}

/// Rendered and not hidden.
///
/// An `area` has no box of its own: its own display and visibility are
/// ignored and the image using its map must be rendered instead. An area
/// whose map no image uses counts as visible.
pub fn is_visible(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    if ctx.tree().is_element_named(node, "area") {
        return ancestors_displayed(ctx, node)
            && ctx.image_of_area(node).is_none_or(|image| is_rendered(ctx, image));
    }
    is_rendered(ctx, node)
}

fn is_rendered(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let style = ctx.style(node);
    !style.is_display_none() && !style.is_visibility_hidden() && ancestors_displayed(ctx, node)
}

/// `display` is not inherited, so every ancestor box is checked
fn ancestors_displayed(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let tree = ctx.tree();
    tree.ancestors(node)
        .filter(|&ancestor| tree.is_element(ancestor))
        .all(|ancestor| !ctx.style(ancestor).is_display_none())
}

/// Not disabled by itself or by an ancestor.
///
/// A disabled fieldset does not disable a form control whose ancestor path
/// passes through a `legend` before reaching the fieldset.
pub fn is_enabled(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let tree = ctx.tree();
    if is_disabled_element(tree, node) {
        return false;
    }

    let is_form_control = tree.tag_name(node).is_some_and(|tag| FORM_CONTROLS.contains(&tag));
    let mut passed_legend = false;
    for ancestor in tree.ancestors(node) {
        if is_disabled_element(tree, ancestor) {
            let exempt = is_form_control && passed_legend && tree.is_element_named(ancestor, "fieldset");
            if !exempt {
                return false;
            }
        }
        passed_legend |= tree.is_element_named(ancestor, "legend");
    }
    true
}

fn is_disabled_element(tree: &DomTree, node: NodeId) -> bool {
    tree.element(node)
        .is_some_and(|elem| elem.has_attr("disabled") && DISABLEABLE.contains(&elem.name.as_str()))
}

/// Only one radio button of a named group is a tab stop: the checked one,
/// or the first one when none is checked. Groups span the whole document.
/// A checked radio is always a tab stop, named or not.
pub fn is_selectable_radio(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let tree = ctx.tree();
    if tree.input_type(node) != Some(InputType::Radio) || tree.is_checked(node) {
        return true;
    }
    // An unchecked radio outside any named group is never a tab stop
    let Some(name) = tree.get_attribute(node, "name").filter(|n| !n.is_empty()) else {
        return false;
    };

    let group = ctx.radio_group(name);
    group.first() == Some(&node) && group.iter().all(|&member| !tree.is_checked(member))
}

/// Part of the sequential navigation order
pub fn is_tabbable(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let tree = ctx.tree();
    tree.tab_index(node) > -1
        || is_details_without_summary(tree, node)
        || tree.is_element_named(node, "audio")
        || tree.is_element_named(node, "video")
        || is_editing_host(tree, node)
}

fn is_details_without_summary(tree: &DomTree, node: NodeId) -> bool {
    tree.is_element_named(node, "details")
        && !tree
            .element_children(node)
            .any(|child| tree.is_element_named(child, "summary"))
}

fn is_editing_host(tree: &DomTree, node: NodeId) -> bool {
    tree.get_attribute(node, "contenteditable")
        .is_some_and(|value| value.is_empty() || value.eq_ignore_ascii_case("true"))
}

/// True if `node` is an `area` whose image is inert or inside an inert subtree
pub fn is_area_image_inert(ctx: &FocusContext<'_>, node: NodeId) -> bool {
    let tree = ctx.tree();
    ctx.image_of_area(node).is_some_and(|image| {
        iter::once(image)
            .chain(tree.ancestors(image))
            .any(|n| tree.has_attribute(n, "inert"))
    })
}
