//! Selector parsing and matching
//!
//! The subset of CSS selectors needed for candidate queries and simple
//! author stylesheets: type and universal selectors, `.class`, `#id`,
//! attribute presence/equality (with the `i` flag), `:not(...)` with full
//! selector lists, and the descendant and child combinators. Tag and
//! attribute names match ASCII case-insensitively.

use std::fmt;

use crate::{DomTree, NodeId};

/// Selector parse error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unsupported pseudo-class ':{0}'")]
    UnsupportedPseudo(String),
}

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList(Vec<ComplexSelector>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// Left to right; `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    compounds: Vec<CompoundSelector>,
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CompoundSelector {
    /// `None` is the universal selector
    tag: Option<String>,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Attribute {
        name: String,
        value: Option<String>,
        case_insensitive: bool,
    },
    Class(String),
    Id(String),
    Not(SelectorList),
}

/// Selector specificity (a, b, c) where:
/// a = ID selectors
/// b = class, attribute, pseudo-class
/// c = type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    fn add(self, other: Specificity) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.trim().is_empty() {
            return Err(SelectorError::Empty);
        }
        let mut parser = Parser { input, pos: 0 };
        parser.parse_list(false)
    }

    /// Check if an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_element(node) && self.0.iter().any(|s| s.matches(tree, node))
    }

    /// Number of complex selectors in the list
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest specificity among the selectors in the list
    pub fn specificity(&self) -> Specificity {
        self.0.iter().map(ComplexSelector::specificity).max().unwrap_or_default()
    }

    /// Specificity of the most specific selector matching `node`, if any
    pub fn matching_specificity(&self, tree: &DomTree, node: NodeId) -> Option<Specificity> {
        if !tree.is_element(node) {
            return None;
        }
        self.0
            .iter()
            .filter(|s| s.matches(tree, node))
            .map(ComplexSelector::specificity)
            .max()
    }
}

impl ComplexSelector {
    fn specificity(&self) -> Specificity {
        self.compounds
            .iter()
            .fold(Specificity::default(), |acc, c| acc.add(c.specificity()))
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.matches_at(tree, node, self.compounds.len() - 1)
    }

    // Right-to-left matching
    fn matches_at(&self, tree: &DomTree, node: NodeId, index: usize) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|parent| self.matches_at(tree, parent, index - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.is_element(a))
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

impl CompoundSelector {
    fn specificity(&self) -> Specificity {
        let mut spec = Specificity(0, 0, u32::from(self.tag.is_some()));
        for condition in &self.conditions {
            spec = spec.add(match condition {
                Condition::Id(_) => Specificity(1, 0, 0),
                Condition::Attribute { .. } | Condition::Class(_) => Specificity(0, 1, 0),
                // :not() takes the specificity of its most specific argument
                Condition::Not(list) => list.specificity(),
            });
        }
        spec
    }

    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        let Some(elem) = tree.element(node) else { return false };
        if let Some(tag) = &self.tag {
            if !elem.is(tag) {
                return false;
            }
        }
        self.conditions.iter().all(|condition| match condition {
            Condition::Attribute { name, value, case_insensitive } => {
                match (elem.get_attr(name), value) {
                    (None, _) => false,
                    (Some(_), None) => true,
                    (Some(actual), Some(expected)) if *case_insensitive => {
                        actual.eq_ignore_ascii_case(expected)
                    }
                    (Some(actual), Some(expected)) => actual == expected,
                }
            }
            Condition::Class(class) => elem
                .get_attr("class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class)),
            Condition::Id(id) => elem.get_attr("id") == Some(id.as_str()),
            Condition::Not(list) => !list.matches(tree, node),
        })
    }
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(found) => SelectorError::Unexpected { found, offset: self.pos },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.bump();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_list(&mut self, nested: bool) -> Result<SelectorList, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_ws();
            selectors.push(self.parse_complex()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') if nested => break,
                None if !nested => break,
                _ => return Err(self.unexpected()),
            }
        }
        Ok(SelectorList(selectors))
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    combinators.push(Combinator::Child);
                    compounds.push(self.parse_compound()?);
                }
                Some(c) if had_ws && starts_compound(c) => {
                    combinators.push(Combinator::Descendant);
                    compounds.push(self.parse_compound()?);
                }
                _ => break,
            }
        }
        Ok(ComplexSelector { compounds, combinators })
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let start = self.pos;
        let tag = match self.peek() {
            Some('*') => {
                self.bump();
                None
            }
            Some(c) if is_ident_start(c) => Some(self.parse_ident().to_ascii_lowercase()),
            _ => None,
        };

        let mut conditions = Vec::new();
        loop {
            match self.peek() {
                Some('[') => conditions.push(self.parse_attribute()?),
                Some(':') => conditions.push(self.parse_pseudo()?),
                Some('.') => {
                    self.bump();
                    conditions.push(Condition::Class(self.parse_name()?));
                }
                Some('#') => {
                    self.bump();
                    conditions.push(Condition::Id(self.parse_name()?));
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.unexpected());
        }
        Ok(CompoundSelector { tag, conditions })
    }

    fn parse_ident(&mut self) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        &self.input[start..self.pos]
    }

    fn parse_name(&mut self) -> Result<String, SelectorError> {
        let name = self.parse_ident();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        Ok(name.to_string())
    }

    fn parse_attribute(&mut self) -> Result<Condition, SelectorError> {
        self.expect('[')?;
        self.skip_ws();
        let name = self.parse_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.unexpected());
        }
        self.skip_ws();

        let mut value = None;
        let mut case_insensitive = false;
        if self.peek() == Some('=') {
            self.bump();
            self.skip_ws();
            value = Some(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some('i' | 'I') => {
                    self.bump();
                    case_insensitive = true;
                }
                Some('s' | 'S') => {
                    self.bump();
                }
                _ => {}
            }
            self.skip_ws();
        }
        self.expect(']')?;
        Ok(Condition::Attribute { name, value, case_insensitive })
    }

    fn parse_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(c) if c == quote => return Ok(value),
                        Some('\\') => match self.bump() {
                            Some(escaped) => value.push(escaped),
                            None => return Err(SelectorError::UnexpectedEnd),
                        },
                        Some(c) => value.push(c),
                        None => return Err(SelectorError::UnexpectedEnd),
                    }
                }
            }
            Some(c) if is_ident_char(c) => Ok(self.parse_ident().to_string()),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_pseudo(&mut self) -> Result<Condition, SelectorError> {
        self.expect(':')?;
        let name = self.parse_ident().to_ascii_lowercase();
        if name != "not" {
            return Err(SelectorError::UnsupportedPseudo(name));
        }
        self.expect('(')?;
        let list = self.parse_list(true)?;
        self.expect(')')?;
        Ok(Condition::Not(list))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn starts_compound(c: char) -> bool {
    is_ident_start(c) || matches!(c, '*' | '[' | ':' | '.' | '#')
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.compounds.iter().enumerate() {
            if i > 0 {
                match self.combinators[i - 1] {
                    Combinator::Descendant => f.write_str(" ")?,
                    Combinator::Child => f.write_str(" > ")?,
                }
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CompoundSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if self.conditions.is_empty() => f.write_str("*")?,
            None => {}
        }
        for condition in &self.conditions {
            match condition {
                Condition::Attribute { name, value: None, .. } => write!(f, "[{name}]")?,
                Condition::Attribute { name, value: Some(value), case_insensitive } => {
                    write!(f, "[{name}={value:?}")?;
                    if *case_insensitive {
                        f.write_str(" i")?;
                    }
                    f.write_str("]")?;
                }
                Condition::Class(class) => write!(f, ".{class}")?,
                Condition::Id(id) => write!(f, "#{id}")?,
                Condition::Not(list) => write!(f, ":not({list})")?,
            }
        }
        Ok(())
    }
}
