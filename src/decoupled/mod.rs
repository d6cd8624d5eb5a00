//! Decoupled template logic
//!
//! Logic can live outside a template, in a separate markup resource that
//! maps selectors to attributes:
//!
//! ```text
//! <thlogic>
//!   <attr sel="#main" th:fragment="content">
//!     <attr sel=".item" th:each="i : ${items}"/>
//!   </attr>
//! </thlogic>
//! ```
//!
//! Nested `attr` selectors are relative to their parent's, so the inner
//! tag above applies to `//#main//.item`. When the template is parsed the
//! attributes are added to every element the selectors match, as if they
//! had been written in the template.
//!
//! - [`DecoupledLogicBuilder`]: handler turning a logic resource into a
//!   [`DecoupledTemplateLogic`]
//! - [`DecoupledLogicInjector`]: injection hook applying it during a parse

mod builder;
mod injector;

pub use builder::DecoupledLogicBuilder;
pub use injector::DecoupledLogicInjector;

use std::collections::HashMap;
use std::fmt;

use crate::core::{Position, QuoteStyle, TagAttribute};
use crate::error::Result;
use crate::parser::MarkupParser;

/// An attribute to be added to matching elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedAttribute {
    name: String,
    /// `=` as written, including surrounding whitespace
    operator: Option<String>,
    value: Option<String>,
    outer_value: Option<String>,
    quote: QuoteStyle,
}

impl InjectedAttribute {
    pub fn new(name: &str, operator: Option<&str>, value: Option<&str>, quote: QuoteStyle) -> Self {
        let value = value.map(str::to_string);
        let operator = match (operator, &value) {
            (Some(operator), _) => Some(operator.to_string()),
            (None, Some(_)) => Some("=".to_string()),
            (None, None) => None,
        };
        InjectedAttribute {
            name: name.to_string(),
            outer_value: value.as_deref().map(|v| quote.quote(v)),
            operator,
            value,
            quote,
        }
    }

    /// Copy of an attribute as written in a tag.
    pub fn from_tag(attribute: &TagAttribute<'_>) -> Self {
        Self::new(attribute.name, attribute.operator, attribute.value, attribute.quote)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn quote(&self) -> QuoteStyle {
        self.quote
    }

    /// View as a tag attribute, with every part placed at `position`.
    pub fn as_tag_attribute(&self, position: Position) -> TagAttribute<'_> {
        let located = self.value.as_ref().map(|_| position);
        TagAttribute {
            name: &self.name,
            name_position: position,
            operator: self.operator.as_deref(),
            operator_position: located,
            value: self.value.as_deref(),
            outer_value: self.outer_value.as_deref(),
            quote: self.quote,
            value_position: located,
        }
    }
}

impl fmt::Display for InjectedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let (Some(operator), Some(outer)) = (&self.operator, &self.outer_value) {
            write!(f, "{operator}{outer}")?;
        }
        Ok(())
    }
}

/// Attributes to inject, grouped by selector in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoupledTemplateLogic {
    entries: Vec<(String, Vec<InjectedAttribute>)>,
    index: HashMap<String, usize>,
}

impl DecoupledTemplateLogic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a logic resource with `parser`.
    pub fn parse(parser: &MarkupParser, document: &str, input: &str) -> Result<Self> {
        let mut builder = DecoupledLogicBuilder::new(parser.config().case_sensitive);
        parser.parse(document, input, &mut builder)?;
        let logic = builder.into_logic();
        log::debug!(
            "Loaded decoupled logic \"{}\" with {} selector(s)",
            document,
            logic.entries.len()
        );
        Ok(logic)
    }

    pub fn add_injected_attribute(&mut self, selector: &str, attribute: InjectedAttribute) {
        let slot = match self.index.get(selector) {
            Some(&slot) => slot,
            None => {
                self.index.insert(selector.to_string(), self.entries.len());
                self.entries.push((selector.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        self.entries[slot].1.push(attribute);
    }

    pub fn has_injected_attributes(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Selectors in order of first appearance.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(selector, _)| selector.as_str())
    }

    pub fn injected_attributes(&self, selector: &str) -> &[InjectedAttribute] {
        self.index
            .get(selector)
            .map(|&slot| self.entries[slot].1.as_slice())
            .unwrap_or(&[])
    }

    /// `(selector, attributes)` pairs in order of first appearance.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[InjectedAttribute])> {
        self.entries
            .iter()
            .map(|(selector, attributes)| (selector.as_str(), attributes.as_slice()))
    }
}

impl fmt::Display for DecoupledTemplateLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (selector, attributes) in self.entries() {
            write!(f, "{selector}:")?;
            for attribute in attributes {
                write!(f, " {attribute}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
