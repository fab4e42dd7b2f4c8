//! Computed Styles
//!
//! The final computed style values for an element after cascade.
//! Only the properties that decide whether an element is rendered at all
//! are tracked.

use crate::{Declaration, PropertyValue};

/// Computed style for an element
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
}

impl ComputedStyle {
    /// Apply a single declaration (cascade order is the caller's job)
    pub fn apply_declaration(&mut self, decl: &Declaration) {
        match decl.value {
            PropertyValue::Display(display) => self.display = display,
            PropertyValue::Visibility(visibility) => self.visibility = visibility,
        }
    }

    /// Element generates no box (`display: none`)
    #[inline]
    pub fn is_display_none(&self) -> bool {
        self.display == Display::None
    }

    /// Element is `visibility: hidden` or `collapse`
    #[inline]
    pub fn is_visibility_hidden(&self) -> bool {
        self.visibility != Visibility::Visible
    }
}

/// Display property values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    Block,
    #[default]
    Inline,
    InlineBlock,
    Flex,
    Grid,
    None,
    Contents,
}

/// Visibility property values (inherited)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
    Collapse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_values() {
        let style = ComputedStyle::default();
        assert_eq!(style.display, Display::Inline);
        assert!(!style.is_display_none());
        assert!(!style.is_visibility_hidden());
    }

    #[test]
    fn test_apply_declaration() {
        let mut style = ComputedStyle::default();
        style.apply_declaration(&Declaration::new(PropertyValue::Display(Display::None), false));
        style.apply_declaration(&Declaration::new(PropertyValue::Visibility(Visibility::Collapse), true));

        assert!(style.is_display_none());
        assert!(style.is_visibility_hidden());
    }
}
