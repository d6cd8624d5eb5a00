//! Event Collector
//!
//! Implements MarkupHandler to collect owned events, with every name and
//! text fragment interned through a shared text repository.

use std::sync::Arc;

use super::events::{CollectedEvent, DocType, MarkupEvent, ProcessingInstruction, XmlDeclaration};
use super::handler::{proceed, AttributeEvent, ElementTag, HandleResult, MarkupHandler};
use crate::core::Position;
use crate::text::TextRepository;

/// Collector that gathers markup events during parsing
pub struct EventCollector {
    texts: Arc<dyn TextRepository>,
    document: Arc<str>,
    events: Vec<CollectedEvent>,
}

impl EventCollector {
    /// Create a new collector interning through `texts`
    pub fn new(texts: Arc<dyn TextRepository>) -> Self {
        Self::with_capacity(texts, 256)
    }

    /// Create with estimated capacity
    pub fn with_capacity(texts: Arc<dyn TextRepository>, events: usize) -> Self {
        EventCollector {
            document: texts.get_text(""),
            texts,
            events: Vec::with_capacity(events),
        }
    }

    /// Get the collected events as a slice
    pub fn events(&self) -> &[CollectedEvent] {
        &self.events
    }

    /// Take the collected events
    pub fn take_events(&mut self) -> Vec<CollectedEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn into_events(self) -> Vec<CollectedEvent> {
        self.events
    }

    /// Get number of collected events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// One line per event in its compact display form
    pub fn summary(&self) -> Vec<String> {
        self.events.iter().map(|e| e.event.to_string()).collect()
    }

    fn push(&mut self, event: MarkupEvent<'_>) -> HandleResult {
        self.events.push(CollectedEvent {
            document: Arc::clone(&self.document),
            position: event.position(),
            event: event.to_owned_event(self.texts.as_ref()),
        });
        proceed()
    }
}

impl MarkupHandler for EventCollector {
    fn document_start(&mut self, document: &str) -> HandleResult {
        self.document = self.texts.get_text(document);
        self.push(MarkupEvent::DocumentStart { document })
    }

    fn document_end(&mut self, document: &str, position: Position) -> HandleResult {
        self.push(MarkupEvent::DocumentEnd { document, position })
    }

    fn xml_declaration(&mut self, document: &str, declaration: &XmlDeclaration, position: Position) -> HandleResult {
        self.push(MarkupEvent::XmlDeclaration { document, declaration, position })
    }

    fn doctype(&mut self, document: &str, doctype: &DocType, position: Position) -> HandleResult {
        self.push(MarkupEvent::DocType { document, doctype, position })
    }

    fn cdata(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.push(MarkupEvent::CData { document, content, position })
    }

    fn text(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.push(MarkupEvent::Text { document, content, position })
    }

    fn comment(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.push(MarkupEvent::Comment { document, content, position })
    }

    fn processing_instruction(
        &mut self,
        document: &str,
        instruction: &ProcessingInstruction,
        position: Position,
    ) -> HandleResult {
        self.push(MarkupEvent::ProcessingInstruction { document, instruction, position })
    }

    fn attribute(&mut self, attribute: &AttributeEvent<'_>) -> HandleResult {
        self.push(MarkupEvent::Attribute(*attribute))
    }

    fn inner_whitespace(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.push(MarkupEvent::InnerWhitespace { document, content, position })
    }

    fn standalone_element_start(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        self.push(MarkupEvent::StandaloneElementStart { element, minimized })
    }

    fn standalone_element_end(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        self.push(MarkupEvent::StandaloneElementEnd { element, minimized })
    }

    fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::OpenElementStart(element))
    }

    fn open_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::OpenElementEnd(element))
    }

    fn close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::CloseElementStart(element))
    }

    fn close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::CloseElementEnd(element))
    }

    fn auto_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::AutoCloseElementStart(element))
    }

    fn auto_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::AutoCloseElementEnd(element))
    }

    fn unmatched_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::UnmatchedCloseElementStart(element))
    }

    fn unmatched_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.push(MarkupEvent::UnmatchedCloseElementEnd(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::events::OwnedMarkupEvent;
    use crate::text::LimitedSizeCacheTextRepository;

    #[test]
    fn test_collects_with_document_and_position() {
        let texts: Arc<dyn TextRepository> = Arc::new(LimitedSizeCacheTextRepository::new(1000));
        let mut collector = EventCollector::new(Arc::clone(&texts));
        collector.document_start("page.html").unwrap();
        collector.text("page.html", "hello", Position::new(1, 1)).unwrap();
        collector.text("page.html", "hello", Position::new(2, 4)).unwrap();
        collector.document_end("page.html", Position::new(2, 9)).unwrap();

        assert_eq!(collector.event_count(), 4);
        assert_eq!(
            collector.summary(),
            vec!["DocumentStart", "Text(\"hello\")", "Text(\"hello\")", "DocumentEnd"]
        );
        let events = collector.events();
        assert_eq!(&*events[1].document, "page.html");
        assert_eq!(events[2].position, Position::new(2, 4));
        // Repeated text shares one interned instance
        match (&events[1].event, &events[2].event) {
            (OwnedMarkupEvent::Text(a), OwnedMarkupEvent::Text(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("text events expected"),
        }
    }
}
