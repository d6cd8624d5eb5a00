//! Parallel document parsing
//!
//! Uses Rayon to parse many documents at once with one shared parser, so
//! every document interns into the same registries and text repository.

use std::sync::Arc;

use rayon::prelude::*;

use crate::decoupled::DecoupledTemplateLogic;
use crate::error::Result;
use crate::parser::MarkupParser;
use crate::sax::{CollectedEvent, EventCollector, MarkupHandler};

/// A named document to parse.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    pub name: &'a str,
    pub input: &'a str,
}

impl<'a> Document<'a> {
    pub fn new(name: &'a str, input: &'a str) -> Self {
        Document { name, input }
    }
}

/// Parse every document, collecting its events. Results are in input
/// order; a failing document does not stop the others.
pub fn parse_all(parser: &MarkupParser, documents: &[Document<'_>]) -> Vec<Result<Vec<CollectedEvent>>> {
    documents
        .par_iter()
        .map(|document| parser.collect(document.name, document.input))
        .collect()
}

/// Parse every document with the same decoupled logic applied.
pub fn parse_all_with_logic(
    parser: &MarkupParser,
    documents: &[Document<'_>],
    logic: &DecoupledTemplateLogic,
) -> Vec<Result<Vec<CollectedEvent>>> {
    documents
        .par_iter()
        .map(|document| -> Result<Vec<CollectedEvent>> {
            let mut collector = EventCollector::new(Arc::clone(&parser.resources().texts));
            parser.parse_with_logic(document.name, document.input, logic, &mut collector)?;
            Ok(collector.into_events())
        })
        .collect()
}

/// Parse every document with a handler built per document, returning the
/// handlers once done.
pub fn parse_each<H, F>(parser: &MarkupParser, documents: &[Document<'_>], make_handler: F) -> Vec<Result<H>>
where
    H: MarkupHandler + Send,
    F: Fn(&Document<'_>) -> H + Sync + Send,
{
    documents
        .par_iter()
        .map(|document| -> Result<H> {
            let mut handler = make_handler(document);
            parser.parse(document.name, document.input, &mut handler)?;
            Ok(handler)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::sax::handler::{proceed, HandleResult};
    use crate::sax::OwnedMarkupEvent;

    #[test]
    fn test_parse_all_in_order() {
        let parser = MarkupParser::html();
        let inputs: Vec<String> = (0..32).map(|i| format!("<div id=d{i}>{i}</div>")).collect();
        let names: Vec<String> = (0..32).map(|i| format!("doc{i}.html")).collect();
        let documents: Vec<Document<'_>> = names
            .iter()
            .zip(&inputs)
            .map(|(name, input)| Document::new(name, input))
            .collect();

        let results = parse_all(&parser, &documents);
        assert_eq!(results.len(), 32);
        for (i, result) in results.iter().enumerate() {
            let events = result.as_ref().unwrap();
            assert_eq!(&*events[0].document, names[i]);
            assert_eq!(events.len(), 9);
        }

        // Every document resolved "div" to the same shared definition
        let first = results[0].as_ref().unwrap()[1].event.element().unwrap().clone();
        for result in &results {
            let element = result.as_ref().unwrap()[1].event.element().unwrap();
            assert!(Arc::ptr_eq(&first, element));
        }
    }

    #[test]
    fn test_failures_are_per_document() {
        let parser = MarkupParser::html();
        let documents = [
            Document::new("ok.html", "<p>fine</p>"),
            Document::new("bad.html", "<!DOCTYPE>"),
        ];
        let results = parse_all(&parser, &documents);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().document(), Some("bad.html"));
    }

    #[test]
    fn test_parse_each_returns_handlers() {
        #[derive(Default)]
        struct TextCount(usize);

        impl MarkupHandler for TextCount {
            fn text(&mut self, _document: &str, _content: &str, _position: Position) -> HandleResult {
                self.0 += 1;
                proceed()
            }
        }

        let parser = MarkupParser::xml();
        let documents = [Document::new("a", "<a>1<b/>2</a>"), Document::new("b", "<a/>")];
        let counts: Vec<usize> = parse_each(&parser, &documents, |_| TextCount::default())
            .into_iter()
            .map(|handler| handler.unwrap().0)
            .collect();
        assert_eq!(counts, vec![2, 0]);
    }

    #[test]
    fn test_parse_all_with_logic() {
        let parser = MarkupParser::html();
        let logic = DecoupledTemplateLogic::parse(
            &parser,
            "logic",
            "<thlogic><attr sel=\"p\" th:text=\"${t}\"/></thlogic>",
        )
        .unwrap();
        let documents = [Document::new("a", "<p>x</p>"), Document::new("b", "<div></div>")];
        let results = parse_all_with_logic(&parser, &documents, &logic);
        let injected = |events: &[CollectedEvent]| {
            events
                .iter()
                .filter(|e| matches!(&e.event, OwnedMarkupEvent::Attribute(a) if &*a.name == "th:text"))
                .count()
        };
        assert_eq!(injected(results[0].as_ref().unwrap().as_slice()), 1);
        assert_eq!(injected(results[1].as_ref().unwrap().as_slice()), 0);
    }
}
