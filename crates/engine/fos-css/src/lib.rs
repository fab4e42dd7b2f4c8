//! fOS CSS Parser & Style System
//!
//! CSS parsing using lightningcss with a style cascade answering one
//! question per element: is it rendered (`display`) and is it painted
//! (`visibility`).

mod parser;
mod cascade;
pub mod computed;

pub use parser::CssParser;
pub use cascade::{StyleResolver, StyleSource};
pub use computed::{ComputedStyle, Display, Visibility};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// CSS style rule (selector list + declarations)
#[derive(Debug, Clone)]
pub struct Rule {
    /// Serialized selector list
    pub selectors: String,
    pub declarations: Vec<Declaration>,
}

/// CSS declaration (property: value)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub value: PropertyValue,
    pub important: bool,
}

impl Declaration {
    pub fn new(value: PropertyValue, important: bool) -> Self {
        Self { value, important }
    }
}

/// Tracked property values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    Display(Display),
    Visibility(Visibility),
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
