//! Ordered event stages in front of a handler
//!
//! A [`MarkupStage`] sees every event before the stages after it and the
//! final handler. It can forward the event unchanged, drop it, rewrite it
//! or emit extra events, all through the [`Downstream`] it is given.
//!
//! ```text
//! parser -> stage 0 -> stage 1 -> ... -> handler
//! ```
//!
//! The directive returned by the handler travels back up the chain, so a
//! stage may also replace it (the parser-level comment filter does).

use super::events::{DocType, MarkupEvent, ProcessingInstruction, XmlDeclaration};
use super::handler::{AttributeEvent, ElementTag, HandleResult, MarkupHandler};
use crate::core::Position;

/// One step of a pipeline.
pub trait MarkupStage: Send {
    fn process(&mut self, event: &MarkupEvent<'_>, downstream: &mut Downstream<'_, '_>) -> HandleResult;

    /// Called when a new document starts, before its first event.
    fn reset(&mut self) {}
}

/// Everything after the current stage.
pub struct Downstream<'s, 'h> {
    stages: &'s mut [Box<dyn MarkupStage>],
    sink: &'s mut (dyn MarkupHandler + 'h),
}

impl Downstream<'_, '_> {
    /// Pass an event on to the next stage (or the handler).
    #[inline]
    pub fn emit(&mut self, event: &MarkupEvent<'_>) -> HandleResult {
        route(self.stages, self.sink, event)
    }
}

/// Run `event` through `stages` and then `sink`.
pub fn route(
    stages: &mut [Box<dyn MarkupStage>],
    sink: &mut (dyn MarkupHandler + '_),
    event: &MarkupEvent<'_>,
) -> HandleResult {
    match stages.split_first_mut() {
        Some((stage, rest)) => stage.process(event, &mut Downstream { stages: rest, sink }),
        None => event.dispatch(sink),
    }
}

/// Stages plus a final handler, usable wherever a handler is expected.
pub struct Pipeline<H> {
    stages: Vec<Box<dyn MarkupStage>>,
    handler: H,
}

impl<H: MarkupHandler> Pipeline<H> {
    pub fn new(handler: H) -> Self {
        Pipeline {
            stages: Vec::new(),
            handler,
        }
    }

    /// Append a stage; stages run in the order they were added.
    pub fn with_stage(mut self, stage: impl MarkupStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn push_stage(&mut self, stage: Box<dyn MarkupStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    #[inline]
    fn send(&mut self, event: MarkupEvent<'_>) -> HandleResult {
        route(&mut self.stages, &mut self.handler, &event)
    }
}

impl<H: MarkupHandler> MarkupHandler for Pipeline<H> {
    fn document_start(&mut self, document: &str) -> HandleResult {
        self.stages.iter_mut().for_each(|stage| stage.reset());
        self.send(MarkupEvent::DocumentStart { document })
    }

    fn document_end(&mut self, document: &str, position: Position) -> HandleResult {
        self.send(MarkupEvent::DocumentEnd { document, position })
    }

    fn xml_declaration(&mut self, document: &str, declaration: &XmlDeclaration, position: Position) -> HandleResult {
        self.send(MarkupEvent::XmlDeclaration { document, declaration, position })
    }

    fn doctype(&mut self, document: &str, doctype: &DocType, position: Position) -> HandleResult {
        self.send(MarkupEvent::DocType { document, doctype, position })
    }

    fn cdata(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.send(MarkupEvent::CData { document, content, position })
    }

    fn text(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.send(MarkupEvent::Text { document, content, position })
    }

    fn comment(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.send(MarkupEvent::Comment { document, content, position })
    }

    fn processing_instruction(
        &mut self,
        document: &str,
        instruction: &ProcessingInstruction,
        position: Position,
    ) -> HandleResult {
        self.send(MarkupEvent::ProcessingInstruction { document, instruction, position })
    }

    fn attribute(&mut self, attribute: &AttributeEvent<'_>) -> HandleResult {
        self.send(MarkupEvent::Attribute(*attribute))
    }

    fn inner_whitespace(&mut self, document: &str, content: &str, position: Position) -> HandleResult {
        self.send(MarkupEvent::InnerWhitespace { document, content, position })
    }

    fn standalone_element_start(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        self.send(MarkupEvent::StandaloneElementStart { element, minimized })
    }

    fn standalone_element_end(&mut self, element: ElementTag<'_>, minimized: bool) -> HandleResult {
        self.send(MarkupEvent::StandaloneElementEnd { element, minimized })
    }

    fn open_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::OpenElementStart(element))
    }

    fn open_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::OpenElementEnd(element))
    }

    fn close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::CloseElementStart(element))
    }

    fn close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::CloseElementEnd(element))
    }

    fn auto_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::AutoCloseElementStart(element))
    }

    fn auto_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::AutoCloseElementEnd(element))
    }

    fn unmatched_close_element_start(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::UnmatchedCloseElementStart(element))
    }

    fn unmatched_close_element_end(&mut self, element: ElementTag<'_>) -> HandleResult {
        self.send(MarkupEvent::UnmatchedCloseElementEnd(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sax::handler::Directive;

    /// Upper-cases text and counts what it saw.
    struct Shout {
        seen: usize,
    }

    impl MarkupStage for Shout {
        fn process(&mut self, event: &MarkupEvent<'_>, downstream: &mut Downstream<'_, '_>) -> HandleResult {
            self.seen += 1;
            match *event {
                MarkupEvent::Text { document, content, position } => {
                    let loud = content.to_uppercase();
                    downstream.emit(&MarkupEvent::Text { document, content: &loud, position })
                }
                _ => downstream.emit(event),
            }
        }
    }

    /// Drops comments entirely.
    struct NoComments;

    impl MarkupStage for NoComments {
        fn process(&mut self, event: &MarkupEvent<'_>, downstream: &mut Downstream<'_, '_>) -> HandleResult {
            match event {
                MarkupEvent::Comment { .. } => Ok(Directive::Continue),
                _ => downstream.emit(event),
            }
        }
    }

    #[derive(Default)]
    struct Texts(Vec<String>);

    impl MarkupHandler for Texts {
        fn text(&mut self, _document: &str, content: &str, _position: Position) -> HandleResult {
            self.0.push(content.to_string());
            Ok(Directive::Continue)
        }

        fn comment(&mut self, _document: &str, content: &str, _position: Position) -> HandleResult {
            self.0.push(format!("<!--{content}-->"));
            Ok(Directive::Continue)
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut pipeline = Pipeline::new(Texts::default())
            .with_stage(NoComments)
            .with_stage(Shout { seen: 0 });
        pipeline.text("t", "hi", Position::START).unwrap();
        pipeline.comment("t", "gone", Position::START).unwrap();
        pipeline.text("t", "there", Position::START).unwrap();
        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(pipeline.into_handler().0, vec!["HI", "THERE"]);
    }

    #[test]
    fn test_empty_pipeline_is_transparent() {
        let mut pipeline = Pipeline::new(Texts::default());
        pipeline.comment("t", "kept", Position::START).unwrap();
        assert_eq!(pipeline.handler().0, vec!["<!--kept-->"]);
    }
}
