//! Logic resource reader

use super::{DecoupledTemplateLogic, InjectedAttribute};
use crate::core::Position;
use crate::error::MarkupError;
use crate::sax::handler::{proceed, AttributeEvent, ElementTag, HandleResult, MarkupHandler};
use crate::util::text;

const LOGIC_TAG: &str = "thlogic";
const ATTR_TAG: &str = "attr";
const SELECTOR_ATTRIBUTE: &str = "sel";

/// Selector levels of the nested `attr` tags currently open.
#[derive(Debug, Default)]
struct SelectorLevels {
    /// Open `attr` tags
    depth: usize,
    /// One normalized selector per level that has declared one
    levels: Vec<String>,
}

impl SelectorLevels {
    fn increase(&mut self) {
        self.depth += 1;
    }

    fn decrease(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.levels.truncate(self.depth - 1);
        self.depth -= 1;
    }

    /// The innermost open `attr` has no selector yet.
    fn is_level_empty(&self) -> bool {
        self.levels.len() < self.depth
    }

    fn set(&mut self, selector: &str) {
        let selector = if selector.starts_with('/') {
            selector.to_string()
        } else {
            format!("//{selector}")
        };
        self.levels.push(selector);
    }

    fn current(&self) -> String {
        self.levels.concat()
    }
}

/// Handler that reads `<thlogic>` / `<attr sel="...">` markup into a
/// [`DecoupledTemplateLogic`].
///
/// Anything outside `thlogic`, and any element inside it other than
/// `attr`, is ignored. Attributes of an `attr` tag other than `sel` are
/// the ones injected; `sel` may appear anywhere among them.
#[derive(Debug)]
pub struct DecoupledLogicBuilder {
    case_sensitive: bool,
    document: String,
    logic: DecoupledTemplateLogic,
    in_logic_body: bool,
    in_attr_tag: bool,
    selector: SelectorLevels,
    pending: Vec<InjectedAttribute>,
}

impl DecoupledLogicBuilder {
    /// Builder for markup whose names compare respecting case or not.
    pub fn new(case_sensitive: bool) -> Self {
        DecoupledLogicBuilder {
            case_sensitive,
            document: String::new(),
            logic: DecoupledTemplateLogic::new(),
            in_logic_body: false,
            in_attr_tag: false,
            selector: SelectorLevels::default(),
            pending: Vec::with_capacity(8),
        }
    }

    pub fn logic(&self) -> &DecoupledTemplateLogic {
        &self.logic
    }

    pub fn into_logic(self) -> DecoupledTemplateLogic {
        self.logic
    }

    #[inline]
    fn is(&self, element: &ElementTag<'_>, name: &str) -> bool {
        text::equals(self.case_sensitive, element.name, name)
    }

    fn error(&self, position: Position, message: &str) -> MarkupError {
        MarkupError::decoupled_logic(&self.document, position, message)
    }

    fn attr_start(&mut self, element: &ElementTag<'_>) {
        if !self.in_logic_body || !self.is(element, ATTR_TAG) {
            return;
        }
        self.selector.increase();
        self.in_attr_tag = true;
        self.pending.clear();
    }

    /// End of an `attr` start tag: every attribute is known now.
    fn attr_tag_complete(&mut self, position: Position) -> HandleResult {
        if !self.in_attr_tag {
            return proceed();
        }
        if self.selector.is_level_empty() {
            return Err(self.error(
                position,
                "<attr> injection tag does not contain any \"sel\" selector attributes.",
            ));
        }
        let selector = self.selector.current();
        for attribute in self.pending.drain(..) {
            self.logic.add_injected_attribute(&selector, attribute);
        }
        self.in_attr_tag = false;
        proceed()
    }

    fn element_closed(&mut self, element: &ElementTag<'_>) -> HandleResult {
        if !self.in_logic_body {
            return proceed();
        }
        if self.is(element, LOGIC_TAG) {
            self.in_logic_body = false;
        } else if self.is(element, ATTR_TAG) {
            self.selector.decrease();
        }
        proceed()
    }
}

impl MarkupHandler for DecoupledLogicBuilder {
    fn document_start(&mut self, document: &str) -> HandleResult {
        self.document = document.to_string();
        proceed()
    }

    fn standalone_element_start(&mut self, element: ElementTag<'_>, _minimized: bool) -> HandleResult {
        self.attr_start(&element);
        proceed()
    }

    fn standalone_element_end(&mut self, element: ElementTag<'_>, _minimized: bool) -> HandleResult {
        if !self.in_attr_tag {
            return proceed();
        }
        self.attr_tag_complete(element.position)?;
        self.selector.decrease();
        proceed()
    }

    fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        if !self.in_logic_body {
            if self.is(&element, LOGIC_TAG) {
                self.in_logic_body = true;
            }
            return proceed();
        }
        self.attr_start(&element);
        proceed()
    }

    fn open_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.attr_tag_complete(element.position)
    }

    fn close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.element_closed(&element)
    }

    fn auto_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.element_closed(&element)
    }

    fn attribute(&mut self, attribute: &AttributeEvent<'_>) -> HandleResult {
        if !self.in_attr_tag {
            return proceed();
        }
        let tag = &attribute.attribute;
        if text::equals(self.case_sensitive, tag.name, SELECTOR_ATTRIBUTE) {
            if !self.selector.is_level_empty() {
                return Err(self.error(
                    tag.name_position,
                    "selector (\"sel\") attribute found more than once in attr injection tag",
                ));
            }
            match tag.value.filter(|v| !v.is_empty()) {
                Some(selector) => self.selector.set(selector),
                None => {
                    return Err(self.error(tag.name_position, "selector (\"sel\") attribute has no value"));
                }
            }
            return proceed();
        }
        self.pending.push(InjectedAttribute::from_tag(tag));
        proceed()
    }
}
