//! End-to-end parsing behaviour through the public API

use std::io::{self, Read};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rustymarkup::strategy::{parse_all, Document};
use rustymarkup::{parse_events, MarkupError, MarkupParser, OwnedMarkupEvent, ParseConfig, Position};

fn summary(input: &str) -> Vec<String> {
    parse_events("test.html", input)
        .unwrap()
        .iter()
        .map(|e| e.event.to_string())
        .collect()
}

/// Reader that returns one byte per call.
struct ByteAtATime<'a>(&'a [u8]);

impl Read for ByteAtATime<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.split_first() {
            Some((&b, rest)) if !buf.is_empty() => {
                buf[0] = b;
                self.0 = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn test_list_items_close_each_other() {
    assert_eq!(
        summary("<ul><li>A<li>B</ul>"),
        vec![
            "DocumentStart",
            "OpenElementStart(ul)",
            "OpenElementEnd(ul)",
            "OpenElementStart(li)",
            "OpenElementEnd(li)",
            "Text(\"A\")",
            "AutoCloseElementStart(li)",
            "AutoCloseElementEnd(li)",
            "OpenElementStart(li)",
            "OpenElementEnd(li)",
            "Text(\"B\")",
            "AutoCloseElementStart(li)",
            "AutoCloseElementEnd(li)",
            "CloseElementStart(ul)",
            "CloseElementEnd(ul)",
            "DocumentEnd",
        ]
    );
}

#[test]
fn test_attributes_keep_their_layout() {
    assert_eq!(
        summary("<input type='text' disabled\n  value=x />"),
        vec![
            "DocumentStart",
            "StandaloneElementStart(input, minimized=true)",
            "InnerWhitespace(\" \")",
            "Attribute(type='text')",
            "InnerWhitespace(\" \")",
            "Attribute(disabled)",
            "InnerWhitespace(\"\\n  \")",
            "Attribute(value=x)",
            "InnerWhitespace(\" \")",
            "StandaloneElementEnd(input, minimized=true)",
            "DocumentEnd",
        ]
    );
}

#[test]
fn test_positions_inside_prototype_block() {
    let events = parse_events("test.html", "<div>\n<!--/*/ <span th:text=\"x\">y</span> /*/-->\n</div>").unwrap();
    let span = events
        .iter()
        .find(|e| matches!(&e.event, OwnedMarkupEvent::OpenElementStart { name, .. } if &**name == "span"))
        .unwrap();
    assert_eq!(span.position, Position::new(2, 9));
    let attribute = events
        .iter()
        .find(|e| matches!(e.event, OwnedMarkupEvent::Attribute(_)))
        .unwrap();
    assert_eq!(attribute.position, Position::new(2, 15));
}

#[test]
fn test_parser_level_block_read_from_stream() {
    let parser = MarkupParser::html();
    let mut collector = rustymarkup::EventCollector::new(Arc::clone(&parser.resources().texts));
    let input = "<p>a<!--/* <b>hidden</b> */-->\nb</p>";
    parser
        .parse_reader("stream.html", ByteAtATime(input.as_bytes()), &mut collector)
        .unwrap();
    let text: Vec<(String, Position)> = collector
        .events()
        .iter()
        .filter_map(|e| match &e.event {
            OwnedMarkupEvent::Text(t) => Some((t.to_string(), e.position)),
            _ => None,
        })
        .collect();
    assert_eq!(
        text,
        vec![("a".to_string(), Position::new(1, 4)), ("\nb".to_string(), Position::new(1, 31))]
    );
}

#[test]
fn test_fatal_errors_carry_location() {
    let err = parse_events("decl.xml", "\n  <?xml encoding=\"UTF-8\"?>").unwrap_err();
    assert_eq!(err.position(), Some(Position::new(2, 3)));
    assert!(err.to_string().starts_with("Exception parsing document: template=\"decl.xml\", line 2 - column 3"));

    let err = parse_events("doctype.html", "<html>\n<!DOCTYPE>").unwrap_err();
    assert!(matches!(err, MarkupError::Parse { line: 2, column: 1, .. }), "{err:?}");
}

#[test]
fn test_recoverable_irregularities_are_events() {
    assert_eq!(
        summary("a < b</p><!-- open"),
        vec![
            "DocumentStart",
            "Text(\"a < b\")",
            "UnmatchedCloseElementStart(p)",
            "UnmatchedCloseElementEnd(p)",
            "Text(\"<!-- open\")",
            "DocumentEnd",
        ]
    );
}

#[test]
fn test_registry_full_still_resolves_names() {
    let parser = MarkupParser::new(ParseConfig::xml().with_registry_max_size(2));
    let events = parser.collect("big.xml", "<a><b><c/></b></a>").unwrap();
    let names: Vec<&str> = events
        .iter()
        .filter_map(|e| e.event.element())
        .map(|definition| definition.name())
        .collect();
    assert_eq!(names, vec!["a", "a", "b", "b", "c", "c", "b", "b", "a", "a"]);
    // Only the standard set is held; "c" was resolved without being stored
    let elements = &parser.resources().elements;
    assert_eq!(elements.len(), elements.all_standard_names().count());
}

#[test]
fn test_shared_parser_interns_across_threads() {
    let parser = MarkupParser::html();
    let inputs: Vec<String> = (0..64).map(|i| format!("<my-widget data-n=\"{i}\">x</my-widget>")).collect();
    let documents: Vec<Document<'_>> = inputs.iter().map(|input| Document::new("w.html", input)).collect();

    let results = parse_all(&parser, &documents);
    let first = results[0].as_ref().unwrap()[1].event.element().unwrap().clone();
    assert_eq!(first.name(), "my-widget");
    assert!(!first.is_standard());
    for result in &results {
        let events = result.as_ref().unwrap();
        assert!(Arc::ptr_eq(&first, events[1].event.element().unwrap()));
    }
}
