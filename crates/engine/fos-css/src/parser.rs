//! CSS Parser using lightningcss
//!
//! Parses stylesheets and inline `style` attributes into our internal
//! representation. Selectors are kept as serialized text and compiled by
//! the cascade against the DOM selector engine.

use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::properties::Property;
use lightningcss::properties::display::{
    Display as CssDisplay, DisplayInside, DisplayKeyword, DisplayOutside,
    Visibility as CssVisibility,
};
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleAttribute, StyleSheet};
use lightningcss::traits::ToCss;

use crate::computed::{Display, Visibility};
use crate::{CssError, Declaration, PropertyValue, Rule, Stylesheet};

/// CSS Parser
#[derive(Debug, Clone, Copy)]
pub struct CssParser;

impl CssParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a CSS stylesheet
    pub fn parse(&self, css: &str) -> Result<Stylesheet, CssError> {
        let stylesheet = StyleSheet::parse(css, ParserOptions::default()).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
            message: e.kind.to_string(),
        })?;

        let mut result = Stylesheet::new();
        for rule in stylesheet.rules.0.iter() {
            if let Some(converted) = self.convert_rule(rule) {
                result.rules.push(converted);
            }
        }

        tracing::trace!("Parsed stylesheet with {} style rules", result.len());
        Ok(result)
    }

    /// Parse the contents of a `style` attribute
    pub fn parse_inline(&self, style: &str) -> Result<Vec<Declaration>, CssError> {
        let attribute = StyleAttribute::parse(style, ParserOptions::default()).map_err(|e| CssError::ParseError {
            line: e.loc.as_ref().map_or(0, |loc| loc.line + 1),
            message: e.kind.to_string(),
        })?;
        Ok(self.convert_declarations(&attribute.declarations))
    }

    fn convert_rule(&self, rule: &CssRule) -> Option<Rule> {
        match rule {
            CssRule::Style(style_rule) => {
                let selectors = match style_rule.selectors.to_css_string(PrinterOptions::default()) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!("Dropping rule with unprintable selector: {}", err);
                        return None;
                    }
                };
                let declarations = self.convert_declarations(&style_rule.declarations);
                Some(Rule { selectors, declarations })
            }
            // Media queries, keyframes etc. don't take part in the cascade
            _ => None,
        }
    }

    fn convert_declarations(&self, declarations: &DeclarationBlock) -> Vec<Declaration> {
        let normal = declarations
            .declarations
            .iter()
            .filter_map(|decl| self.convert_declaration(decl, false));
        let important = declarations
            .important_declarations
            .iter()
            .filter_map(|decl| self.convert_declaration(decl, true));
        normal.chain(important).collect()
    }

    fn convert_declaration(&self, decl: &Property, important: bool) -> Option<Declaration> {
        let value = match decl {
            Property::Display(display) => PropertyValue::Display(convert_display(display)),
            Property::Visibility(visibility) => PropertyValue::Visibility(match visibility {
                CssVisibility::Visible => Visibility::Visible,
                CssVisibility::Hidden => Visibility::Hidden,
                CssVisibility::Collapse => Visibility::Collapse,
            }),
            _ => return None,
        };
        Some(Declaration::new(value, important))
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

fn convert_display(display: &CssDisplay) -> Display {
    match display {
        CssDisplay::Keyword(DisplayKeyword::None) => Display::None,
        CssDisplay::Keyword(DisplayKeyword::Contents) => Display::Contents,
        // Table-internal and ruby boxes
        CssDisplay::Keyword(_) => Display::Block,
        CssDisplay::Pair(pair) => match (&pair.outside, &pair.inside) {
            (_, DisplayInside::Flex(_)) => Display::Flex,
            (_, DisplayInside::Grid) => Display::Grid,
            (DisplayOutside::Inline, DisplayInside::FlowRoot) => Display::InlineBlock,
            (DisplayOutside::Inline, _) => Display::Inline,
            _ => Display::Block,
        },
    }
}
