//! Markup handler contract
//!
//! The parser reports everything it reads through [`MarkupHandler`], one
//! method per event kind. Every method has a no-op default, so a handler
//! only implements what it cares about.
//!
//! Every call carries the name of the document being parsed, either as
//! an argument or inside [`ElementTag`] / [`AttributeEvent`].
//!
//! Each call returns a [`Directive`]. Almost always that is
//! `Directive::Continue`; a handler can instead ask the parser to read
//! everything up to a terminator sequence as plain text, which is how
//! multi-chunk comment blocks are suppressed.

use std::borrow::Cow;
use std::sync::Arc;

use super::events::{DocType, ProcessingInstruction, XmlDeclaration};
use crate::core::{Position, TagAttribute};
use crate::definitions::{AttributeDefinition, ElementDefinition};
use crate::error::MarkupError;

/// Instruction from a handler back to the parser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Directive {
    #[default]
    Continue,
    /// Stop recognizing markup; report everything up to (not including)
    /// the sequence as text
    DisableParsingUntil(Cow<'static, str>),
}

impl Directive {
    #[inline]
    pub fn is_continue(&self) -> bool {
        matches!(self, Directive::Continue)
    }
}

/// Result of every handler call.
pub type HandleResult = Result<Directive, MarkupError>;

#[inline]
pub(crate) fn proceed() -> HandleResult {
    Ok(Directive::Continue)
}

/// An element as reported in element events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementTag<'a> {
    /// Name of the document being parsed
    pub document: &'a str,
    pub definition: &'a Arc<ElementDefinition>,
    /// Name as written in the source
    pub name: &'a str,
    pub position: Position,
}

/// An attribute as reported in attribute events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeEvent<'a> {
    pub document: &'a str,
    pub definition: &'a Arc<AttributeDefinition>,
    pub attribute: TagAttribute<'a>,
}

/// Receiver of parse events.
#[allow(unused_variables)]
pub trait MarkupHandler {
    fn document_start(&mut self, document: &str) -> HandleResult {
        proceed()
    }

    fn document_end(&mut self, document: &str, position: Position) -> HandleResult {
        proceed()
    }

    fn xml_declaration(&mut self, document: &str, declaration: &XmlDeclaration, position: Position) -> HandleResult {
        proceed()
    }

    fn doctype(&mut self, document: &str, doctype: &DocType, position: Position) -> HandleResult {
        proceed()
    }

    fn cdata(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        proceed()
    }

    fn text(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        proceed()
    }

    fn comment(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        proceed()
    }

    fn processing_instruction(
        &mut self,
        document: &str,
        instruction: &ProcessingInstruction,
        position: Position,
    ) -> HandleResult {
        proceed()
    }

    fn attribute(&mut self, attribute: &AttributeEvent<'_>) -> HandleResult {
        proceed()
    }

    /// Whitespace between attributes inside a start tag
    fn inner_whitespace(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        proceed()
    }

    fn standalone_element_start(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        proceed()
    }

    fn standalone_element_end(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        proceed()
    }

    fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    fn open_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    fn close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    fn close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    /// Close synthesized by the parser for an element whose end tag is
    /// implied or missing
    fn auto_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    fn auto_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    /// Close tag with no matching open element
    fn unmatched_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }

    fn unmatched_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        proceed()
    }
}

impl<H: MarkupHandler + ?Sized> MarkupHandler for &mut H {
    fn document_start(&mut self, document: &str) -> HandleResult {
        (**self).document_start(document)
    }

    fn document_end(&mut self, document: &str, position: Position) -> HandleResult {
        (**self).document_end(document, position)
    }

    fn xml_declaration(&mut self, document: &str, declaration: &XmlDeclaration, position: Position) -> HandleResult {
        (**self).xml_declaration(document, declaration, position)
    }

    fn doctype(&mut self, document: &str, doctype: &DocType, position: Position) -> HandleResult {
        (**self).doctype(document, doctype, position)
    }

    fn cdata(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        (**self).cdata(document, content, position)
    }

    fn text(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        (**self).text(document, content, position)
    }

    fn comment(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        (**self).comment(document, content, position)
    }

    fn processing_instruction(
        &mut self,
        document: &str,
        instruction: &ProcessingInstruction,
        position: Position,
    ) -> HandleResult {
        (**self).processing_instruction(document, instruction, position)
    }

    fn attribute(&mut self, attribute: &AttributeEvent<'_>) -> HandleResult {
        (**self).attribute(attribute)
    }

    fn inner_whitespace(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        (**self).inner_whitespace(document, content, position)
    }

    fn standalone_element_start(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        (**self).standalone_element_start(element, minimized)
    }

    fn standalone_element_end(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        (**self).standalone_element_end(element, minimized)
    }

    fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).open_element_start(element)
    }

    fn open_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).open_element_end(element)
    }

    fn close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).close_element_start(element)
    }

    fn close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).close_element_end(element)
    }

    fn auto_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).auto_close_element_start(element)
    }

    fn auto_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).auto_close_element_end(element)
    }

    fn unmatched_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).unmatched_close_element_start(element)
    }

    fn unmatched_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        (**self).unmatched_close_element_end(element)
    }
}
