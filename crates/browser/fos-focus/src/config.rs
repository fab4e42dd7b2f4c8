//! Focusable Configuration
//!
//! Which elements are candidates (a selector list) and how a candidate is
//! confirmed (a predicate).

use std::fmt;
use std::rc::Rc;

use fos_dom::{NodeId, SelectorList};

use crate::rules::{self, FocusContext};
use crate::FocusError;

/// Refinement predicate applied to every candidate
pub type FocusPredicate = Rc<dyn Fn(&FocusContext<'_>, NodeId) -> bool>;

/// Elements that may be focusable, before refinement
pub const DEFAULT_SELECTORS: &[&str] = &[
    "a[href]",
    "area[href]",
    "button:not([disabled])",
    "summary",
    "details",
    "input:not([disabled])",
    "select:not([disabled])",
    "textarea:not([disabled])",
    "object",
    "audio[controls]",
    "video[controls]",
    "[contenteditable=\"\"]",
    "[contenteditable=\"true\" i]",
    "iframe",
    "[tabindex]",
];

/// Appended to every selector of the inert-aware configuration
pub const INERT_EXCLUSION: &str = ":not([inert]):not([inert] *)";

/// Focusable configuration.
///
/// A plain value: every accessor returns an independent copy, so changing
/// one never affects another or the defaults.
#[derive(Clone)]
pub struct FocusableConfig {
    /// Candidate universe
    pub selectors: SelectorList,
    /// Decides focusability of each candidate
    pub predicate: FocusPredicate,
}

impl FocusableConfig {
    /// Build a configuration from selector text and a predicate
    pub fn new(selectors: &str, predicate: FocusPredicate) -> Result<Self, FocusError> {
        Ok(Self {
            selectors: SelectorList::parse(selectors)?,
            predicate,
        })
    }

    /// A fresh copy of the built-in configuration
    pub fn default_config() -> Self {
        Self {
            selectors: builtin_selectors(DEFAULT_SELECTORS.join(", ")),
            predicate: Rc::new(rules::is_focusable),
        }
    }

    /// Built-in configuration that also skips anything inside an `inert` subtree
    pub fn inert_aware() -> Self {
        let selectors = DEFAULT_SELECTORS
            .iter()
            .map(|selector| format!("{selector}{INERT_EXCLUSION}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            selectors: builtin_selectors(selectors),
            predicate: Rc::new(rules::is_focusable_inert_aware),
        }
    }

    /// Replace the candidate selectors
    pub fn with_selectors(mut self, selectors: &str) -> Result<Self, FocusError> {
        self.selectors = SelectorList::parse(selectors)?;
        Ok(self)
    }

    /// Replace the refinement predicate
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FocusContext<'_>, NodeId) -> bool + 'static,
    {
        self.predicate = Rc::new(predicate);
        self
    }

    /// Run the predicate for a candidate
    #[inline]
    pub fn accepts(&self, ctx: &FocusContext<'_>, node: NodeId) -> bool {
        (self.predicate)(ctx, node)
    }
}

fn builtin_selectors(text: String) -> SelectorList {
    SelectorList::parse(&text).expect("built-in focus selectors are valid")
}

impl Default for FocusableConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl fmt::Debug for FocusableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusableConfig")
            .field("selectors", &self.selectors.to_string())
            .field("predicate", &"<fn>")
            .finish()
    }
}
