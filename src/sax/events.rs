//! Markup event types
//!
//! Two representations:
//! - [`MarkupEvent`]: borrowed view of one event, built by the parser and
//!   routed through pipeline stages; `dispatch` turns it into the
//!   matching [`MarkupHandler`] call
//! - [`OwnedMarkupEvent`]: self-contained copy with interned text, as
//!   stored by the [`EventCollector`](super::EventCollector)

use std::fmt;
use std::sync::Arc;

use super::handler::{AttributeEvent, ElementTag, HandleResult, MarkupHandler};
use crate::core::tokenizer::{DocTypeToken, XmlDeclarationToken};
use crate::core::{Position, QuoteStyle};
use crate::definitions::{AttributeDefinition, ElementDefinition};
use crate::text::TextRepository;

/// Interned XML declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    /// Whole declaration as written
    pub outer: Arc<str>,
    pub keyword: Arc<str>,
    pub version: Arc<str>,
    pub encoding: Option<Arc<str>>,
    pub standalone: Option<Arc<str>>,
}

impl XmlDeclaration {
    pub(crate) fn intern(token: &XmlDeclarationToken<'_>, texts: &dyn TextRepository) -> Self {
        XmlDeclaration {
            outer: texts.get_text(token.outer),
            keyword: texts.get_text(token.keyword),
            version: texts.get_text(token.version),
            encoding: token.encoding.map(|v| texts.get_text(v)),
            standalone: token.standalone.map(|v| texts.get_text(v)),
        }
    }

    /// `standalone="yes"`
    pub fn is_standalone(&self) -> bool {
        self.standalone.as_deref() == Some("yes")
    }
}

/// Interned DOCTYPE clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    pub outer: Arc<str>,
    pub keyword: Arc<str>,
    pub root_element: Arc<str>,
    pub doctype_type: Option<Arc<str>>,
    pub public_id: Option<Arc<str>>,
    pub system_id: Option<Arc<str>>,
    pub internal_subset: Option<Arc<str>>,
}

impl DocType {
    pub(crate) fn intern(token: &DocTypeToken<'_>, texts: &dyn TextRepository) -> Self {
        let intern = |value: Option<&str>| value.map(|v| texts.get_text(v));
        DocType {
            outer: texts.get_text(token.outer),
            keyword: texts.get_text(token.keyword),
            root_element: texts.get_text(token.root_element),
            doctype_type: intern(token.doctype_type),
            public_id: intern(token.public_id),
            system_id: intern(token.system_id),
            internal_subset: intern(token.internal_subset),
        }
    }
}

/// Interned processing instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    pub outer: Arc<str>,
    pub target: Arc<str>,
    pub content: Option<Arc<str>>,
}

/// Borrowed markup event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    DocumentStart { document: &'a str },
    DocumentEnd { document: &'a str, position: Position },
    XmlDeclaration { document: &'a str, declaration: &'a XmlDeclaration, position: Position },
    DocType { document: &'a str, doctype: &'a DocType, position: Position },
    CData { document: &'a str, content: &'a str, position: Position },
    Text { document: &'a str, content: &'a str, position: Position },
    Comment { document: &'a str, content: &'a str, position: Position },
    ProcessingInstruction { document: &'a str, instruction: &'a ProcessingInstruction, position: Position },
    Attribute(AttributeEvent<'a>),
    InnerWhitespace { document: &'a str, content: &'a str, position: Position },
    StandaloneElementStart { element: ElementTag<'a>, minimized: bool },
    StandaloneElementEnd { element: ElementTag<'a>, minimized: bool },
    OpenElementStart(ElementTag<'a>),
    OpenElementEnd(ElementTag<'a>),
    CloseElementStart(ElementTag<'a>),
    CloseElementEnd(ElementTag<'a>),
    AutoCloseElementStart(ElementTag<'a>),
    AutoCloseElementEnd(ElementTag<'a>),
    UnmatchedCloseElementStart(ElementTag<'a>),
    UnmatchedCloseElementEnd(ElementTag<'a>),
}

impl<'a> MarkupEvent<'a> {
    /// Deliver this event to the matching handler method.
    pub fn dispatch<H: MarkupHandler + ?Sized>(&self, handler: &mut H) -> HandleResult {
        match *self {
            MarkupEvent::DocumentStart { document } => handler.document_start(document),
            MarkupEvent::DocumentEnd { document, position } => handler.document_end(document, position),
            MarkupEvent::XmlDeclaration { document, declaration, position } => {
                handler.xml_declaration(document, declaration, position)
            }
            MarkupEvent::DocType { document, doctype, position } => handler.doctype(document, doctype, position),
            MarkupEvent::CData { document, content, position } => handler.cdata(document, content, position),
            MarkupEvent::Text { document, content, position } => handler.text(document, content, position),
            MarkupEvent::Comment { document, content, position } => handler.comment(document, content, position),
            MarkupEvent::ProcessingInstruction { document, instruction, position } => {
                handler.processing_instruction(document, instruction, position)
            }
            MarkupEvent::Attribute(ref attribute) => handler.attribute(attribute),
            MarkupEvent::InnerWhitespace { document, content, position } => {
                handler.inner_whitespace(document, content, position)
            }
            MarkupEvent::StandaloneElementStart { element, minimized } => {
                handler.standalone_element_start(element, minimized)
            }
            MarkupEvent::StandaloneElementEnd { element, minimized } => {
                handler.standalone_element_end(element, minimized)
            }
            MarkupEvent::OpenElementStart(element) => handler.open_element_start(element),
            MarkupEvent::OpenElementEnd(element) => handler.open_element_end(element),
            MarkupEvent::CloseElementStart(element) => handler.close_element_start(element),
            MarkupEvent::CloseElementEnd(element) => handler.close_element_end(element),
            MarkupEvent::AutoCloseElementStart(element) => handler.auto_close_element_start(element),
            MarkupEvent::AutoCloseElementEnd(element) => handler.auto_close_element_end(element),
            MarkupEvent::UnmatchedCloseElementStart(element) => {
                handler.unmatched_close_element_start(element)
            }
            MarkupEvent::UnmatchedCloseElementEnd(element) => {
                handler.unmatched_close_element_end(element)
            }
        }
    }

    /// Name of the document the event belongs to.
    pub fn document(&self) -> &'a str {
        match *self {
            MarkupEvent::DocumentStart { document }
            | MarkupEvent::DocumentEnd { document, .. }
            | MarkupEvent::XmlDeclaration { document, .. }
            | MarkupEvent::DocType { document, .. }
            | MarkupEvent::CData { document, .. }
            | MarkupEvent::Text { document, .. }
            | MarkupEvent::Comment { document, .. }
            | MarkupEvent::ProcessingInstruction { document, .. }
            | MarkupEvent::InnerWhitespace { document, .. } => document,
            MarkupEvent::Attribute(attribute) => attribute.document,
            MarkupEvent::StandaloneElementStart { element, .. }
            | MarkupEvent::StandaloneElementEnd { element, .. }
            | MarkupEvent::OpenElementStart(element)
            | MarkupEvent::OpenElementEnd(element)
            | MarkupEvent::CloseElementStart(element)
            | MarkupEvent::CloseElementEnd(element)
            | MarkupEvent::AutoCloseElementStart(element)
            | MarkupEvent::AutoCloseElementEnd(element)
            | MarkupEvent::UnmatchedCloseElementStart(element)
            | MarkupEvent::UnmatchedCloseElementEnd(element) => element.document,
        }
    }

    /// Where the event starts in the source.
    pub fn position(&self) -> Position {
        match *self {
            MarkupEvent::DocumentStart { .. } => Position::START,
            MarkupEvent::DocumentEnd { position, .. }
            | MarkupEvent::XmlDeclaration { position, .. }
            | MarkupEvent::DocType { position, .. }
            | MarkupEvent::CData { position, .. }
            | MarkupEvent::Text { position, .. }
            | MarkupEvent::Comment { position, .. }
            | MarkupEvent::ProcessingInstruction { position, .. }
            | MarkupEvent::InnerWhitespace { position, .. } => position,
            MarkupEvent::Attribute(ref attribute) => attribute.attribute.name_position,
            MarkupEvent::StandaloneElementStart { element, .. }
            | MarkupEvent::StandaloneElementEnd { element, .. }
            | MarkupEvent::OpenElementStart(element)
            | MarkupEvent::OpenElementEnd(element)
            | MarkupEvent::CloseElementStart(element)
            | MarkupEvent::CloseElementEnd(element)
            | MarkupEvent::AutoCloseElementStart(element)
            | MarkupEvent::AutoCloseElementEnd(element)
            | MarkupEvent::UnmatchedCloseElementStart(element)
            | MarkupEvent::UnmatchedCloseElementEnd(element) => element.position,
        }
    }

    /// Self-contained copy, with text interned through `texts`.
    pub fn to_owned_event(&self, texts: &dyn TextRepository) -> OwnedMarkupEvent {
        let element = |tag: ElementTag<'_>| (Arc::clone(tag.definition), texts.get_text(tag.name));
        match *self {
            MarkupEvent::DocumentStart { .. } => OwnedMarkupEvent::DocumentStart,
            MarkupEvent::DocumentEnd { .. } => OwnedMarkupEvent::DocumentEnd,
            MarkupEvent::XmlDeclaration { declaration, .. } => {
                OwnedMarkupEvent::XmlDeclaration(declaration.clone())
            }
            MarkupEvent::DocType { doctype, .. } => OwnedMarkupEvent::DocType(doctype.clone()),
            MarkupEvent::CData { content, .. } => OwnedMarkupEvent::CData(texts.get_text(content)),
            MarkupEvent::Text { content, .. } => OwnedMarkupEvent::Text(texts.get_text(content)),
            MarkupEvent::Comment { content, .. } => OwnedMarkupEvent::Comment(texts.get_text(content)),
            MarkupEvent::ProcessingInstruction { instruction, .. } => {
                OwnedMarkupEvent::ProcessingInstruction(instruction.clone())
            }
            MarkupEvent::Attribute(ref event) => {
                let attribute = &event.attribute;
                OwnedMarkupEvent::Attribute(OwnedAttribute {
                    definition: Arc::clone(event.definition),
                    name: texts.get_text(attribute.name),
                    operator: attribute.operator.map(|v| texts.get_text(v)),
                    value: attribute.value.map(|v| texts.get_text(v)),
                    quote: attribute.quote,
                })
            }
            MarkupEvent::InnerWhitespace { content, .. } => {
                OwnedMarkupEvent::InnerWhitespace(texts.get_text(content))
            }
            MarkupEvent::StandaloneElementStart { element: tag, minimized } => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::StandaloneElementStart { element, name, minimized }
            }
            MarkupEvent::StandaloneElementEnd { element: tag, minimized } => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::StandaloneElementEnd { element, name, minimized }
            }
            MarkupEvent::OpenElementStart(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::OpenElementStart { element, name }
            }
            MarkupEvent::OpenElementEnd(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::OpenElementEnd { element, name }
            }
            MarkupEvent::CloseElementStart(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::CloseElementStart { element, name }
            }
            MarkupEvent::CloseElementEnd(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::CloseElementEnd { element, name }
            }
            MarkupEvent::AutoCloseElementStart(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::AutoCloseElementStart { element, name }
            }
            MarkupEvent::AutoCloseElementEnd(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::AutoCloseElementEnd { element, name }
            }
            MarkupEvent::UnmatchedCloseElementStart(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::UnmatchedCloseElementStart { element, name }
            }
            MarkupEvent::UnmatchedCloseElementEnd(tag) => {
                let (element, name) = element(tag);
                OwnedMarkupEvent::UnmatchedCloseElementEnd { element, name }
            }
        }
    }
}

/// Attribute with interned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAttribute {
    pub definition: Arc<AttributeDefinition>,
    pub name: Arc<str>,
    pub operator: Option<Arc<str>>,
    pub value: Option<Arc<str>>,
    pub quote: QuoteStyle,
}

/// Owned markup event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedMarkupEvent {
    DocumentStart,
    DocumentEnd,
    XmlDeclaration(XmlDeclaration),
    DocType(DocType),
    CData(Arc<str>),
    Text(Arc<str>),
    Comment(Arc<str>),
    ProcessingInstruction(ProcessingInstruction),
    Attribute(OwnedAttribute),
    InnerWhitespace(Arc<str>),
    StandaloneElementStart { element: Arc<ElementDefinition>, name: Arc<str>, minimized: bool },
    StandaloneElementEnd { element: Arc<ElementDefinition>, name: Arc<str>, minimized: bool },
    OpenElementStart { element: Arc<ElementDefinition>, name: Arc<str> },
    OpenElementEnd { element: Arc<ElementDefinition>, name: Arc<str> },
    CloseElementStart { element: Arc<ElementDefinition>, name: Arc<str> },
    CloseElementEnd { element: Arc<ElementDefinition>, name: Arc<str> },
    AutoCloseElementStart { element: Arc<ElementDefinition>, name: Arc<str> },
    AutoCloseElementEnd { element: Arc<ElementDefinition>, name: Arc<str> },
    UnmatchedCloseElementStart { element: Arc<ElementDefinition>, name: Arc<str> },
    UnmatchedCloseElementEnd { element: Arc<ElementDefinition>, name: Arc<str> },
}

impl OwnedMarkupEvent {
    /// Element definition, for element events.
    pub fn element(&self) -> Option<&Arc<ElementDefinition>> {
        match self {
            OwnedMarkupEvent::StandaloneElementStart { element, .. }
            | OwnedMarkupEvent::StandaloneElementEnd { element, .. }
            | OwnedMarkupEvent::OpenElementStart { element, .. }
            | OwnedMarkupEvent::OpenElementEnd { element, .. }
            | OwnedMarkupEvent::CloseElementStart { element, .. }
            | OwnedMarkupEvent::CloseElementEnd { element, .. }
            | OwnedMarkupEvent::AutoCloseElementStart { element, .. }
            | OwnedMarkupEvent::AutoCloseElementEnd { element, .. }
            | OwnedMarkupEvent::UnmatchedCloseElementStart { element, .. }
            | OwnedMarkupEvent::UnmatchedCloseElementEnd { element, .. } => Some(element),
            _ => None,
        }
    }

    pub fn is_element_event(&self) -> bool {
        self.element().is_some()
    }
}

/// Compact one-line form used in logs and tests, e.g. `OpenElementStart(div)`
impl fmt::Display for OwnedMarkupEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedMarkupEvent::DocumentStart => f.write_str("DocumentStart"),
            OwnedMarkupEvent::DocumentEnd => f.write_str("DocumentEnd"),
            OwnedMarkupEvent::XmlDeclaration(d) => write!(f, "XmlDeclaration({})", d.outer),
            OwnedMarkupEvent::DocType(d) => write!(f, "DocType({})", d.outer),
            OwnedMarkupEvent::CData(c) => write!(f, "CData({c:?})"),
            OwnedMarkupEvent::Text(t) => write!(f, "Text({t:?})"),
            OwnedMarkupEvent::Comment(c) => write!(f, "Comment({c:?})"),
            OwnedMarkupEvent::ProcessingInstruction(p) => {
                write!(f, "ProcessingInstruction({})", p.outer)
            }
            OwnedMarkupEvent::Attribute(a) => match (&a.value, a.quote.quote_char()) {
                (Some(value), Some(q)) => write!(f, "Attribute({}={q}{value}{q})", a.name),
                (Some(value), None) => write!(f, "Attribute({}={value})", a.name),
                (None, _) => write!(f, "Attribute({})", a.name),
            },
            OwnedMarkupEvent::InnerWhitespace(w) => write!(f, "InnerWhitespace({w:?})"),
            OwnedMarkupEvent::StandaloneElementStart { name, minimized, .. } => {
                write!(f, "StandaloneElementStart({name}, minimized={minimized})")
            }
            OwnedMarkupEvent::StandaloneElementEnd { name, minimized, .. } => {
                write!(f, "StandaloneElementEnd({name}, minimized={minimized})")
            }
            OwnedMarkupEvent::OpenElementStart { name, .. } => write!(f, "OpenElementStart({name})"),
            OwnedMarkupEvent::OpenElementEnd { name, .. } => write!(f, "OpenElementEnd({name})"),
            OwnedMarkupEvent::CloseElementStart { name, .. } => write!(f, "CloseElementStart({name})"),
            OwnedMarkupEvent::CloseElementEnd { name, .. } => write!(f, "CloseElementEnd({name})"),
            OwnedMarkupEvent::AutoCloseElementStart { name, .. } => {
                write!(f, "AutoCloseElementStart({name})")
            }
            OwnedMarkupEvent::AutoCloseElementEnd { name, .. } => {
                write!(f, "AutoCloseElementEnd({name})")
            }
            OwnedMarkupEvent::UnmatchedCloseElementStart { name, .. } => {
                write!(f, "UnmatchedCloseElementStart({name})")
            }
            OwnedMarkupEvent::UnmatchedCloseElementEnd { name, .. } => {
                write!(f, "UnmatchedCloseElementEnd({name})")
            }
        }
    }
}

/// An owned event with its location and the document it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedEvent {
    pub document: Arc<str>,
    pub position: Position,
    pub event: OwnedMarkupEvent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::ElementDefinitions;
    use crate::text::NoCacheTextRepository;

    #[derive(Default)]
    struct Names(Vec<String>);

    impl MarkupHandler for Names {
        fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
            self.0.push(format!("open:{}", element.definition.name()));
            Ok(Default::default())
        }

        fn text(&mut self, document: &str, content: &str, _position: Position) -> HandleResult {
            self.0.push(format!("text:{content}@{document}"));
            Ok(Default::default())
        }
    }

    #[test]
    fn test_dispatch_reaches_handler_method() {
        let elements = ElementDefinitions::new();
        let div = elements.for_name(false, "DIV");
        let tag = ElementTag {
            document: "page.html",
            definition: &div,
            name: "DIV",
            position: Position::new(2, 3),
        };
        let mut names = Names::default();

        MarkupEvent::OpenElementStart(tag).dispatch(&mut names).unwrap();
        let text = MarkupEvent::Text { document: "page.html", content: "x", position: Position::START };
        text.dispatch(&mut names).unwrap();
        // Default methods accept everything else
        MarkupEvent::CloseElementEnd(tag).dispatch(&mut names).unwrap();

        assert_eq!(names.0, vec!["open:div", "text:x@page.html"]);
        assert_eq!(MarkupEvent::OpenElementStart(tag).position(), Position::new(2, 3));
        assert_eq!(MarkupEvent::OpenElementStart(tag).document(), "page.html");
        assert_eq!(text.document(), "page.html");
    }

    #[test]
    fn test_owned_event_display() {
        let elements = ElementDefinitions::new();
        let br = elements.for_name(false, "br");
        let tag = ElementTag { document: "t", definition: &br, name: "BR", position: Position::START };
        let owned = MarkupEvent::StandaloneElementStart { element: tag, minimized: true }
            .to_owned_event(&NoCacheTextRepository);
        assert_eq!(owned.to_string(), "StandaloneElementStart(BR, minimized=true)");
        assert!(owned.is_element_event());
        assert_eq!(owned.element().map(|e| e.name()), Some("br"));
    }
}
