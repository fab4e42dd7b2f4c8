//! fOS Focus Management
//!
//! Keyboard focusability for the fOS browser engine.
//!
//! Features:
//! - Candidate selection by configurable selector list
//! - Refinement rules: rendering, disabled inheritance (with the legend
//!   exception), radio group exclusivity, tabbability
//! - Image map areas judged by the image that uses their map
//! - Inert-aware configuration
//! - Focus trap cycling Tab / Shift+Tab inside a container
//! - Sequential (Tab key) navigation as the host default action

mod config;
mod rules;
mod focusable;
mod focus_trap;
mod keyboard_nav;

pub use config::{FocusableConfig, FocusPredicate, DEFAULT_SELECTORS, INERT_EXCLUSION};
pub use rules::{
    FocusContext, is_focusable, is_focusable_inert_aware, is_visible, is_enabled,
    is_selectable_radio, is_tabbable, is_area_image_inert,
};
pub use focusable::Focusable;
pub use focus_trap::{FocusTrap, TrapState, NavigationKey};
pub use keyboard_nav::SequentialNavigator;

/// Focus configuration error
#[derive(Debug, thiserror::Error)]
pub enum FocusError {
    #[error("Invalid candidate selector: {0}")]
    Selector(#[from] fos_dom::SelectorError),
}
