//! Per-document parse driver
//!
//! A session owns everything that lives for one document only: the stack
//! of open elements, the pipeline stages and the injection hook. It pulls
//! tokens, resolves definitions, balances elements and routes the
//! resulting events to the handler.
//!
//! Prototype-only comment blocks are parsed by running a nested frame over
//! the comment content. Nested frames share the element stack with the
//! enclosing one, and translate their positions back into the enclosing
//! document through a [`PositionOffset`].

use std::sync::Arc;
use std::time::Instant;

use super::balance::{auto_close_rule, ElementStack};
use super::comments::{is_prototype_only, PROTOTYPE_DELIMITER};
use super::injection::{ElementStart, InjectionHook};
use super::MarkupParser;
use crate::config::ElementBalancing;
use crate::core::{ParseError, Position, PositionOffset, TagAttribute, TagPart, Token, Tokenizer};
use crate::decoupled::InjectedAttribute;
use crate::definitions::ElementDefinition;
use crate::error::{MarkupError, Result};
use crate::sax::handler::{proceed, AttributeEvent, Directive, ElementTag, HandleResult, MarkupHandler};
use crate::sax::pipeline::route;
use crate::sax::{DocType, MarkupEvent, MarkupStage, ProcessingInstruction, XmlDeclaration};

/// Deepest prototype-only block nesting that is parsed.
const MAX_PROTOTYPE_DEPTH: usize = 1;

/// Keep the later directive unless it is a plain `Continue`.
#[inline]
fn merge(current: Directive, next: Directive) -> Directive {
    if next.is_continue() {
        current
    } else {
        next
    }
}

pub(crate) struct ParseSession<'p, 'i, H> {
    parser: &'p MarkupParser,
    document: &'i str,
    stack: ElementStack<'i>,
    stages: Vec<Box<dyn MarkupStage>>,
    injector: Option<Box<dyn InjectionHook + 'p>>,
    handler: H,
}

impl<'p, 'i, H: MarkupHandler> ParseSession<'p, 'i, H> {
    pub fn new(
        parser: &'p MarkupParser,
        document: &'i str,
        stages: Vec<Box<dyn MarkupStage>>,
        injector: Option<Box<dyn InjectionHook + 'p>>,
        handler: H,
    ) -> Self {
        ParseSession {
            parser,
            document,
            stack: ElementStack::new(),
            stages,
            injector,
            handler,
        }
    }

    /// Parse `input` as a complete document.
    pub fn run(mut self, input: &'i str) -> Result<()> {
        let started = Instant::now();
        let document = self.document;

        self.emit(MarkupEvent::DocumentStart { document })?;
        let end = self.run_frame(input, PositionOffset::NONE, 0)?;
        if self.balancing() {
            self.auto_close_down_to(0, end)?;
        }
        self.emit(MarkupEvent::DocumentEnd { document, position: end })?;

        log::trace!(
            "Parsed document \"{}\" ({} bytes) in {:?}",
            document,
            input.len(),
            started.elapsed()
        );
        Ok(())
    }

    #[inline]
    fn balancing(&self) -> bool {
        self.parser.config.element_balancing == ElementBalancing::AutoClose
    }

    #[inline]
    fn html(&self) -> bool {
        self.parser.config.mode.is_html()
    }

    #[inline]
    fn emit(&mut self, event: MarkupEvent<'_>) -> HandleResult {
        route(&mut self.stages, &mut self.handler, &event)
    }

    fn parse_error(&self, error: ParseError, offset: PositionOffset) -> MarkupError {
        let translated = ParseError::new(error.message, offset.apply(error.position));
        MarkupError::parse(self.document, translated)
    }

    /// Tokenize one region of input; returns the position after its last
    /// character.
    fn run_frame(&mut self, input: &'i str, offset: PositionOffset, depth: usize) -> Result<Position> {
        let document = self.document;
        let mut tokenizer = Tokenizer::new(input);

        loop {
            let token = match tokenizer.next_token() {
                Ok(Some(token)) => token,
                Ok(None) => break,
                Err(error) => return Err(self.parse_error(error, offset)),
            };

            let directive = match token {
                Token::Text { content, position } => self.emit(MarkupEvent::Text {
                    document,
                    content,
                    position: offset.apply(position),
                })?,
                Token::Comment {
                    content,
                    position,
                    content_position,
                } => self.comment(content, offset.apply(position), offset.apply(content_position), depth)?,
                Token::CData { content, position } => self.emit(MarkupEvent::CData {
                    document,
                    content,
                    position: offset.apply(position),
                })?,
                Token::XmlDeclaration(token) => {
                    let declaration = XmlDeclaration::intern(&token, self.parser.resources.texts.as_ref());
                    self.emit(MarkupEvent::XmlDeclaration {
                        document,
                        declaration: &declaration,
                        position: offset.apply(token.position),
                    })?
                }
                Token::DocType(token) => {
                    let doctype = DocType::intern(&token, self.parser.resources.texts.as_ref());
                    self.emit(MarkupEvent::DocType {
                        document,
                        doctype: &doctype,
                        position: offset.apply(token.position),
                    })?
                }
                Token::ProcessingInstruction {
                    outer,
                    target,
                    content,
                    position,
                } => {
                    let texts = self.parser.resources.texts.clone();
                    let instruction = ProcessingInstruction {
                        outer: texts.get_text(outer),
                        target: texts.get_text(target),
                        content: content.map(|c| texts.get_text(c)),
                    };
                    self.emit(MarkupEvent::ProcessingInstruction {
                        document,
                        instruction: &instruction,
                        position: offset.apply(position),
                    })?
                }
                Token::StartTag {
                    name,
                    position,
                    parts,
                    minimized,
                    end_position,
                } => {
                    let (directive, raw_text) = self.start_tag(
                        name,
                        &parts,
                        minimized,
                        offset.apply(position),
                        offset.apply(end_position),
                        offset,
                    )?;
                    tokenizer.recycle(parts);
                    if raw_text {
                        tokenizer.enter_raw_text(name);
                    }
                    directive
                }
                Token::EndTag {
                    name,
                    position,
                    end_position,
                } => self.end_tag(name, offset.apply(position), offset.apply(end_position))?,
            };

            if let Directive::DisableParsingUntil(terminator) = directive {
                tokenizer.disable_until(terminator);
            }
        }

        Ok(offset.apply(tokenizer.end_position()))
    }

    fn comment(
        &mut self,
        content: &'i str,
        position: Position,
        content_position: Position,
        depth: usize,
    ) -> HandleResult {
        if self.parser.config.comment_blocks && depth < MAX_PROTOTYPE_DEPTH && is_prototype_only(content) {
            let delimiter = PROTOTYPE_DELIMITER.len();
            let inner = &content[delimiter..content.len() - delimiter];
            let origin = content_position.advanced(delimiter as u32);
            self.run_frame(inner, PositionOffset::starting_at(origin), depth + 1)?;
            return proceed();
        }
        let document = self.document;
        self.emit(MarkupEvent::Comment { document, content, position })
    }

    /// Report a start tag; the flag asks for raw-text reading of the
    /// element content.
    fn start_tag(
        &mut self,
        name: &'i str,
        parts: &[TagPart<'i>],
        minimized: bool,
        position: Position,
        end_position: Position,
        offset: PositionOffset,
    ) -> Result<(Directive, bool)> {
        let parser = self.parser;
        let document = self.document;
        let case_sensitive = parser.config.case_sensitive;
        let definition = parser.resources.elements.for_name(case_sensitive, name);
        let html = self.html();
        let standalone = minimized || (html && definition.is_void());

        let mut directive = Directive::Continue;
        if html && self.balancing() {
            if let Some(index) = auto_close_rule(definition.name()).and_then(|rule| self.stack.find_implied_close(rule)) {
                directive = merge(directive, self.auto_close_down_to(index, position)?);
            }
        }

        let tag = ElementTag {
            document,
            definition: &definition,
            name,
            position,
        };
        let start = if standalone {
            MarkupEvent::StandaloneElementStart { element: tag, minimized: true }
        } else {
            MarkupEvent::OpenElementStart(tag)
        };
        directive = merge(directive, self.emit(start)?);

        for part in parts {
            let next = match *part {
                TagPart::Whitespace { content, position } => self.emit(MarkupEvent::InnerWhitespace {
                    document,
                    content,
                    position: offset.apply(position),
                })?,
                TagPart::Attribute(attribute) => {
                    let attribute_definition = parser.resources.attributes.for_name(case_sensitive, attribute.name);
                    let attribute = TagAttribute {
                        name_position: offset.apply(attribute.name_position),
                        operator_position: attribute.operator_position.map(|p| offset.apply(p)),
                        value_position: attribute.value_position.map(|p| offset.apply(p)),
                        ..attribute
                    };
                    self.emit(MarkupEvent::Attribute(AttributeEvent {
                        document,
                        definition: &attribute_definition,
                        attribute,
                    }))?
                }
            };
            directive = merge(directive, next);
        }

        if let Some(injector) = self.injector.as_mut() {
            let injected = injector.element_start(&ElementStart {
                definition: &definition,
                name,
                parts,
                standalone,
            });
            for attribute in &injected {
                directive = merge(directive, self.inject(attribute, end_position)?);
            }
        }

        let tag = ElementTag {
            document,
            definition: &definition,
            name,
            position: end_position,
        };
        let end = if standalone {
            MarkupEvent::StandaloneElementEnd { element: tag, minimized: true }
        } else {
            MarkupEvent::OpenElementEnd(tag)
        };
        directive = merge(directive, self.emit(end)?);

        let raw_text = html && !standalone && definition.has_raw_text_content();
        if !standalone {
            self.stack.push(definition, name);
        }
        Ok((directive, raw_text))
    }

    /// Emit an injected attribute, separated from what precedes it by a
    /// single space.
    fn inject(&mut self, injected: &InjectedAttribute, position: Position) -> HandleResult {
        let parser = self.parser;
        let document = self.document;
        let definition = parser
            .resources
            .attributes
            .for_name(parser.config.case_sensitive, injected.name());
        let first = self.emit(MarkupEvent::InnerWhitespace { document, content: " ", position })?;
        let second = self.emit(MarkupEvent::Attribute(AttributeEvent {
            document,
            definition: &definition,
            attribute: injected.as_tag_attribute(position),
        }))?;
        Ok(merge(first, second))
    }

    fn end_tag(&mut self, name: &'i str, position: Position, end_position: Position) -> HandleResult {
        let parser = self.parser;
        let definition = parser.resources.elements.for_name(parser.config.case_sensitive, name);

        if !self.balancing() {
            if let Some(index) = self.stack.find(&definition) {
                self.stack.remove(index);
                self.element_ended(index + 1);
            }
            return self.close_pair(&definition, name, position, end_position, ClosePair::Close);
        }

        let matched = if self.html() && definition.is_void() {
            None
        } else {
            self.stack.find(&definition)
        };
        match matched {
            Some(index) => {
                let mut directive = self.auto_close_down_to(index + 1, position)?;
                if self.stack.pop().is_some() {
                    self.element_ended(self.stack.len() + 1);
                }
                directive = merge(
                    directive,
                    self.close_pair(&definition, name, position, end_position, ClosePair::Close)?,
                );
                Ok(directive)
            }
            None => self.close_pair(&definition, name, position, end_position, ClosePair::Unmatched),
        }
    }

    fn close_pair(
        &mut self,
        definition: &Arc<ElementDefinition>,
        name: &str,
        position: Position,
        end_position: Position,
        kind: ClosePair,
    ) -> HandleResult {
        let start = ElementTag {
            document: self.document,
            definition,
            name,
            position,
        };
        let end = ElementTag {
            position: end_position,
            ..start
        };
        let (first, second) = match kind {
            ClosePair::Close => (MarkupEvent::CloseElementStart(start), MarkupEvent::CloseElementEnd(end)),
            ClosePair::Unmatched => (
                MarkupEvent::UnmatchedCloseElementStart(start),
                MarkupEvent::UnmatchedCloseElementEnd(end),
            ),
        };
        let first = self.emit(first)?;
        let second = self.emit(second)?;
        Ok(merge(first, second))
    }

    /// Auto-close open elements, innermost first, until `len` remain.
    fn auto_close_down_to(&mut self, len: usize, position: Position) -> HandleResult {
        let mut directive = Directive::Continue;
        while self.stack.len() > len {
            let Some(open) = self.stack.pop() else { break };
            self.element_ended(self.stack.len() + 1);
            let tag = ElementTag {
                document: self.document,
                definition: &open.definition,
                name: open.name,
                position,
            };
            directive = merge(directive, self.emit(MarkupEvent::AutoCloseElementStart(tag))?);
            directive = merge(directive, self.emit(MarkupEvent::AutoCloseElementEnd(tag))?);
        }
        Ok(directive)
    }

    /// Tell the injector that the open element at `level` (1 for the
    /// outermost) was ended.
    #[inline]
    fn element_ended(&mut self, level: usize) {
        if let Some(injector) = self.injector.as_mut() {
            injector.element_end(level);
        }
    }
}

#[derive(Clone, Copy)]
enum ClosePair {
    Close,
    Unmatched,
}
