//! Comment blocks
//!
//! Two comment forms are interpreted by the parser itself:
//!
//! - prototype-only blocks `<!--/*/ ... /*/-->`: the markup inside is
//!   parsed as if the comment delimiters were not there
//! - parser-level blocks `<!--/* ... */-->`: removed together with all
//!   content, even when that content contains other comments
//!
//! Prototype-only detection happens in the parser before events are
//! built; parser-level removal is a pipeline stage.

use std::borrow::Cow;

use crate::sax::handler::{proceed, Directive, HandleResult};
use crate::sax::{Downstream, MarkupEvent, MarkupStage};

/// Delimiter on both sides of prototype-only content.
pub(crate) const PROTOTYPE_DELIMITER: &str = "/*/";

const PARSER_LEVEL_START: &str = "/*";
const PARSER_LEVEL_END: &str = "*/-->";

/// `content` (between `<!--` and `-->`) is a prototype-only block.
#[inline]
pub(crate) fn is_prototype_only(content: &str) -> bool {
    content.len() >= 2 * PROTOTYPE_DELIMITER.len()
        && content.starts_with(PROTOTYPE_DELIMITER)
        && content.ends_with(PROTOTYPE_DELIMITER)
}

/// Removes `<!--/* ... */-->` blocks from the event stream.
///
/// A block that ends inside its own opening comment is dropped right
/// away. Otherwise the opening comment switches parsing off until the
/// `*/-->` terminator; the text read meanwhile is dropped and whatever
/// follows the terminator in that text is passed on.
#[derive(Debug, Default)]
pub struct ParserLevelCommentFilter {
    suppressing: bool,
}

impl ParserLevelCommentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inside a block whose terminator has not been seen yet.
    pub fn is_suppressing(&self) -> bool {
        self.suppressing
    }
}

impl MarkupStage for ParserLevelCommentFilter {
    fn process(&mut self, event: &MarkupEvent<'_>, downstream: &mut Downstream<'_, '_>) -> HandleResult {
        match *event {
            MarkupEvent::Comment { content, .. } if content.starts_with(PARSER_LEVEL_START) => {
                if content.ends_with("*/") {
                    return proceed();
                }
                self.suppressing = true;
                Ok(Directive::DisableParsingUntil(Cow::Borrowed(PARSER_LEVEL_END)))
            }
            MarkupEvent::Text { document, content, position } if self.suppressing => {
                let Some(at) = content.find(PARSER_LEVEL_END) else {
                    return proceed();
                };
                self.suppressing = false;
                let (skipped, rest) = content.split_at(at + PARSER_LEVEL_END.len());
                if rest.is_empty() {
                    return proceed();
                }
                downstream.emit(&MarkupEvent::Text {
                    document,
                    content: rest,
                    position: position.after(skipped),
                })
            }
            _ => downstream.emit(event),
        }
    }

    fn reset(&mut self) {
        self.suppressing = false;
    }
}
