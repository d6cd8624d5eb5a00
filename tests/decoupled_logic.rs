//! Decoupled template logic: loading logic resources and injecting their
//! attributes into markup

use std::sync::Arc;

use pretty_assertions::assert_eq;
use rustymarkup::{DecoupledTemplateLogic, EventCollector, MarkupError, MarkupParser, Position};

const LOGIC: &str = "<?xml version=\"1.0\"?>
<thlogic>
  <attr sel=\"#menu\" th:remove=\"all-but-first\">
    <attr sel=\"li.active\" th:classappend=\"${sel}\"/>
  </attr>
  <attr sel=\"footer\" th:replace=\"~{common :: footer}\"/>
</thlogic>";

fn inject(logic: &DecoupledTemplateLogic, input: &str) -> Vec<String> {
    let parser = MarkupParser::html();
    let mut collector = EventCollector::new(Arc::clone(&parser.resources().texts));
    parser
        .parse_with_logic("page.html", input, logic, &mut collector)
        .unwrap();
    collector.summary()
}

#[test]
fn test_logic_resource_selectors() {
    let logic = DecoupledTemplateLogic::parse(&MarkupParser::xml(), "page.th.xml", LOGIC).unwrap();
    assert_eq!(
        logic.selectors().collect::<Vec<_>>(),
        vec!["//#menu", "//#menu//li.active", "//footer"]
    );
    assert_eq!(
        logic.to_string(),
        "//#menu: th:remove=\"all-but-first\"\n//#menu//li.active: th:classappend=\"${sel}\"\n//footer: th:replace=\"~{common :: footer}\"\n"
    );
}

#[test]
fn test_attributes_injected_into_matching_elements() {
    let logic = DecoupledTemplateLogic::parse(&MarkupParser::xml(), "page.th.xml", LOGIC).unwrap();
    let events = inject(
        &logic,
        "<ul id=\"menu\"><li>a</li><li class=\"x active\">b</li></ul><li class=active></li><footer/>",
    );
    assert_eq!(
        events,
        vec![
            "DocumentStart",
            "OpenElementStart(ul)",
            "InnerWhitespace(\" \")",
            "Attribute(id=\"menu\")",
            "InnerWhitespace(\" \")",
            "Attribute(th:remove=\"all-but-first\")",
            "OpenElementEnd(ul)",
            "OpenElementStart(li)",
            "OpenElementEnd(li)",
            "Text(\"a\")",
            "CloseElementStart(li)",
            "CloseElementEnd(li)",
            "OpenElementStart(li)",
            "InnerWhitespace(\" \")",
            "Attribute(class=\"x active\")",
            "InnerWhitespace(\" \")",
            "Attribute(th:classappend=\"${sel}\")",
            "OpenElementEnd(li)",
            "Text(\"b\")",
            "CloseElementStart(li)",
            "CloseElementEnd(li)",
            "CloseElementStart(ul)",
            "CloseElementEnd(ul)",
            "OpenElementStart(li)",
            "InnerWhitespace(\" \")",
            "Attribute(class=active)",
            "OpenElementEnd(li)",
            "CloseElementStart(li)",
            "CloseElementEnd(li)",
            "StandaloneElementStart(footer, minimized=true)",
            "InnerWhitespace(\" \")",
            "Attribute(th:replace=\"~{common :: footer}\")",
            "StandaloneElementEnd(footer, minimized=true)",
            "DocumentEnd",
        ]
    );
}

#[test]
fn test_logic_without_attributes_changes_nothing() {
    let logic = DecoupledTemplateLogic::new();
    let plain = MarkupParser::html().collect("page.html", "<p class=a>x</p>").unwrap();
    let events = inject(&logic, "<p class=a>x</p>");
    assert_eq!(events.len(), plain.len());
}

#[test]
fn test_invalid_logic_resources() {
    let parser = MarkupParser::xml();

    let err = DecoupledTemplateLogic::parse(&parser, "bad.th.xml", "<thlogic>\n  <attr th:text=\"x\"/>\n</thlogic>")
        .unwrap_err();
    assert!(matches!(err, MarkupError::DecoupledLogic { .. }), "{err:?}");
    assert_eq!(err.document(), Some("bad.th.xml"));
    assert_eq!(err.position().map(|p| p.line), Some(2));

    let err = DecoupledTemplateLogic::parse(&parser, "dup.th.xml", "<thlogic><attr sel=\"a\" sel=\"b\"/></thlogic>")
        .unwrap_err();
    assert_eq!(err.position(), Some(Position::new(1, 24)));
}

#[test]
fn test_invalid_selector_rejected_before_parsing() {
    let mut logic = DecoupledTemplateLogic::new();
    logic.add_injected_attribute(
        "//li[0]",
        rustymarkup::InjectedAttribute::new("th:text", None, Some("x"), rustymarkup::QuoteStyle::Double),
    );
    let parser = MarkupParser::html();
    let mut collector = EventCollector::new(Arc::clone(&parser.resources().texts));
    let err = parser
        .parse_with_logic("page.html", "<ul><li>a</li></ul>", &logic, &mut collector)
        .unwrap_err();
    assert!(matches!(err, MarkupError::InvalidSelector { .. }), "{err:?}");
    assert!(collector.events().is_empty());
}
