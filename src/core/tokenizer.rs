//! Markup tokenizer
//!
//! Pull tokenizer over a `&str`: each call to [`Tokenizer::next_token`]
//! returns the next structure in the input, borrowing from it.
//!
//! Malformed markup is tolerated rather than rejected:
//! - a `<` that does not start a recognizable structure is text
//! - a structure still open at the end of input (tag, comment, CDATA,
//!   processing instruction) is reported as text
//!
//! Only XML declarations and DOCTYPE clauses are validated; a malformed
//! one stops tokenization with a [`ParseError`].
//!
//! Two modes change how text is read, both set by the caller:
//! - raw text (`enter_raw_text`): everything up to the matching end tag is
//!   a single text token (`script`, `style`, `textarea`, ...)
//! - disabled (`disable_until`): everything up to a terminator sequence
//!   is text; scanning resumes at the terminator

use std::borrow::Cow;

use super::attributes::{QuoteStyle, TagAttribute, TagPart};
use super::position::{LineTracker, Position};
use super::scanner::{is_name_start_char, is_whitespace, Scanner};

/// Fatal tokenization error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({position})")]
pub struct ParseError {
    pub message: String,
    pub position: Position,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        ParseError {
            message: message.into(),
            position,
        }
    }
}

/// `<?xml version="1.0" ...?>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclarationToken<'a> {
    pub outer: &'a str,
    pub keyword: &'a str,
    pub version: &'a str,
    pub encoding: Option<&'a str>,
    pub standalone: Option<&'a str>,
    pub position: Position,
}

/// `<!DOCTYPE root PUBLIC "..." "..." [...]>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTypeToken<'a> {
    pub outer: &'a str,
    pub keyword: &'a str,
    pub root_element: &'a str,
    /// `PUBLIC` or `SYSTEM` as written
    pub doctype_type: Option<&'a str>,
    pub public_id: Option<&'a str>,
    pub system_id: Option<&'a str>,
    pub internal_subset: Option<&'a str>,
    pub position: Position,
}

/// Token produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Text {
        content: &'a str,
        position: Position,
    },
    /// Comment, `content` excludes `<!--` and `-->`
    Comment {
        content: &'a str,
        position: Position,
        content_position: Position,
    },
    CData {
        content: &'a str,
        position: Position,
    },
    XmlDeclaration(XmlDeclarationToken<'a>),
    DocType(DocTypeToken<'a>),
    ProcessingInstruction {
        outer: &'a str,
        target: &'a str,
        content: Option<&'a str>,
        position: Position,
    },
    /// Start tag; `position` is the `<`, `end_position` the `>` or `/>`
    StartTag {
        name: &'a str,
        position: Position,
        parts: Vec<TagPart<'a>>,
        minimized: bool,
        end_position: Position,
    },
    EndTag {
        name: &'a str,
        position: Position,
        end_position: Position,
    },
}

/// Outcome of trying to read a structure at a `<`
enum Scan<'a> {
    Token(Token<'a>),
    /// The `<` is plain text
    NotMarkup,
    /// The structure runs past the end of input
    Unterminated,
}

pub struct Tokenizer<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    lines: LineTracker<'a>,
    raw_text_end: Option<&'a str>,
    disabled_until: Option<Cow<'static, str>>,
    spare_parts: Vec<TagPart<'a>>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input),
            lines: LineTracker::new(input),
            raw_text_end: None,
            disabled_until: None,
            spare_parts: Vec::with_capacity(16),
        }
    }

    /// Position of byte `offset` in this input.
    #[inline]
    pub fn position_at(&mut self, offset: usize) -> Position {
        self.lines.position_at(offset)
    }

    /// Position just past the last character.
    pub fn end_position(&mut self) -> Position {
        self.lines.position_at(self.input.len())
    }

    /// Read the content of element `name` as text, up to `</name`.
    pub fn enter_raw_text(&mut self, name: &'a str) {
        self.raw_text_end = Some(name);
    }

    /// Read everything up to `terminator` as text.
    pub fn disable_until(&mut self, terminator: impl Into<Cow<'static, str>>) {
        self.disabled_until = Some(terminator.into());
    }

    /// Hand back the parts vector of a consumed start tag for reuse.
    pub fn recycle(&mut self, mut parts: Vec<TagPart<'a>>) {
        parts.clear();
        if parts.capacity() > self.spare_parts.capacity() {
            self.spare_parts = parts;
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if self.scanner.is_eof() {
            return Ok(None);
        }
        let start = self.scanner.position();

        if let Some(terminator) = self.disabled_until.take() {
            let end = self
                .scanner
                .find_seq_from(terminator.as_bytes(), start)
                .unwrap_or(self.input.len());
            if end > start {
                return Ok(Some(self.text(start, end)));
            }
        }

        if let Some(name) = self.raw_text_end.take() {
            let end = self.find_raw_text_end(name, start);
            if end > start {
                return Ok(Some(self.text(start, end)));
            }
        }

        let mut search_from = start;
        if self.scanner.peek() == Some(b'<') {
            match self.markup(start)? {
                Scan::Token(token) => return Ok(Some(token)),
                Scan::Unterminated => return Ok(Some(self.text(start, self.input.len()))),
                Scan::NotMarkup => search_from = start + 1,
            }
        }
        let end = self.find_text_end(search_from);
        Ok(Some(self.text(start, end)))
    }

    fn text(&mut self, start: usize, end: usize) -> Token<'a> {
        self.scanner.set_position(end);
        Token::Text {
            content: &self.input[start..end],
            position: self.lines.position_at(start),
        }
    }

    /// Offset of the next `<` that may start markup, or end of input.
    fn find_text_end(&self, mut from: usize) -> usize {
        let bytes = self.input.as_bytes();
        while let Some(at) = self.scanner.find_byte_from(b'<', from) {
            let starts_markup = match bytes.get(at + 1) {
                Some(&b) if is_name_start_char(b) || b == b'!' || b == b'?' => true,
                Some(b'/') => bytes.get(at + 2).is_some_and(|&b| is_name_start_char(b)),
                _ => false,
            };
            if starts_markup {
                return at;
            }
            from = at + 1;
        }
        self.input.len()
    }

    /// Offset of `</name` (any case) followed by a tag delimiter.
    fn find_raw_text_end(&self, name: &str, mut from: usize) -> usize {
        let bytes = self.input.as_bytes();
        while let Some(at) = self.scanner.find_seq_from(b"</", from) {
            let name_end = at + 2 + name.len();
            let matches_name = self
                .input
                .get(at + 2..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
            let delimited = bytes
                .get(name_end)
                .is_none_or(|&b| is_whitespace(b) || b == b'>' || b == b'/');
            if matches_name && delimited {
                return at;
            }
            from = at + 2;
        }
        self.input.len()
    }

    fn markup(&mut self, start: usize) -> Result<Scan<'a>, ParseError> {
        match self.scanner.peek_at(1) {
            Some(b'!') => {
                if self.scanner.starts_with(b"<!--") {
                    Ok(self.comment(start))
                } else if self.scanner.starts_with(b"<![CDATA[") {
                    Ok(self.cdata(start))
                } else if self.scanner.starts_with_ignore_case(b"<!DOCTYPE") {
                    self.doctype(start).map(Scan::Token)
                } else {
                    Ok(Scan::NotMarkup)
                }
            }
            Some(b'?') => self.processing_instruction(start),
            Some(b'/') => Ok(self.end_tag(start)),
            Some(b) if is_name_start_char(b) => Ok(self.start_tag(start)),
            _ => Ok(Scan::NotMarkup),
        }
    }

    fn comment(&mut self, start: usize) -> Scan<'a> {
        let content_start = start + 4;
        let Some(end) = self.scanner.find_seq_from(b"-->", content_start) else {
            return Scan::Unterminated;
        };
        let position = self.lines.position_at(start);
        self.scanner.set_position(end + 3);
        Scan::Token(Token::Comment {
            content: &self.input[content_start..end],
            position,
            content_position: position.advanced(4),
        })
    }

    fn cdata(&mut self, start: usize) -> Scan<'a> {
        let content_start = start + 9;
        let Some(end) = self.scanner.find_seq_from(b"]]>", content_start) else {
            return Scan::Unterminated;
        };
        let position = self.lines.position_at(start);
        self.scanner.set_position(end + 3);
        Scan::Token(Token::CData {
            content: &self.input[content_start..end],
            position,
        })
    }

    fn start_tag(&mut self, start: usize) -> Scan<'a> {
        self.scanner.set_position(start + 1);
        let Some(name) = self.scanner.read_name() else {
            self.scanner.set_position(start);
            return Scan::NotMarkup;
        };
        let position = self.lines.position_at(start);
        let mut parts = std::mem::take(&mut self.spare_parts);

        loop {
            let whitespace_start = self.scanner.position();
            self.scanner.skip_whitespace();
            // A slash not closing the tag is skipped like whitespace
            while self.scanner.peek() == Some(b'/') && self.scanner.peek_at(1) != Some(b'>') {
                self.scanner.advance(1);
                self.scanner.skip_whitespace();
            }
            let whitespace_end = self.scanner.position();
            if whitespace_end > whitespace_start {
                parts.push(TagPart::Whitespace {
                    content: &self.input[whitespace_start..whitespace_end],
                    position: self.lines.position_at(whitespace_start),
                });
            }

            let minimized = match self.scanner.peek() {
                None => {
                    self.recycle(parts);
                    return Scan::Unterminated;
                }
                Some(b'>') => false,
                Some(b'/') => true,
                Some(_) => {
                    match self.attribute() {
                        Some(attribute) => parts.push(TagPart::Attribute(attribute)),
                        None => {
                            self.recycle(parts);
                            return Scan::Unterminated;
                        }
                    }
                    continue;
                }
            };

            let end_position = self.lines.position_at(self.scanner.position());
            self.scanner.advance(if minimized { 2 } else { 1 });
            return Scan::Token(Token::StartTag {
                name,
                position,
                parts,
                minimized,
                end_position,
            });
        }
    }

    /// Read one attribute; `None` if the input ends inside it.
    fn attribute(&mut self) -> Option<TagAttribute<'a>> {
        let name_start = self.scanner.position();
        // The first character may be anything, even '=' or a quote
        self.scanner.advance(1);
        self.scanner
            .read_while(|b| !is_whitespace(b) && !matches!(b, b'/' | b'>' | b'='));
        let after_name = self.scanner.position();
        let name = &self.input[name_start..after_name];
        let name_position = self.lines.position_at(name_start);

        self.scanner.skip_whitespace();
        if self.scanner.peek() != Some(b'=') {
            self.scanner.set_position(after_name);
            return Some(TagAttribute::bare(name, name_position));
        }
        let operator_position = self.lines.position_at(after_name);
        self.scanner.advance(1);
        self.scanner.skip_whitespace();
        let value_start = self.scanner.position();
        let operator = &self.input[after_name..value_start];

        let (value, outer_value, quote) = match self.scanner.peek()? {
            q @ (b'"' | b'\'') => {
                let close = self.scanner.find_byte_from(q, value_start + 1)?;
                self.scanner.set_position(close + 1);
                (
                    &self.input[value_start + 1..close],
                    &self.input[value_start..close + 1],
                    QuoteStyle::from_byte(q),
                )
            }
            _ => {
                let value = self.scanner.read_while(|b| !is_whitespace(b) && b != b'>');
                (value, value, QuoteStyle::None)
            }
        };

        Some(TagAttribute {
            name,
            name_position,
            operator: Some(operator),
            operator_position: Some(operator_position),
            value: Some(value),
            outer_value: Some(outer_value),
            quote,
            value_position: Some(self.lines.position_at(value_start)),
        })
    }

    fn end_tag(&mut self, start: usize) -> Scan<'a> {
        self.scanner.set_position(start + 2);
        let Some(name) = self.scanner.read_name() else {
            self.scanner.set_position(start);
            return Scan::NotMarkup;
        };
        let Some(close) = self.scanner.find_byte_from(b'>', self.scanner.position()) else {
            return Scan::Unterminated;
        };
        let position = self.lines.position_at(start);
        let end_position = self.lines.position_at(close);
        self.scanner.set_position(close + 1);
        Scan::Token(Token::EndTag {
            name,
            position,
            end_position,
        })
    }

    fn processing_instruction(&mut self, start: usize) -> Result<Scan<'a>, ParseError> {
        self.scanner.set_position(start + 2);
        if !self.scanner.peek().is_some_and(is_name_start_char) {
            self.scanner.set_position(start);
            return Ok(Scan::NotMarkup);
        }
        let target = self
            .scanner
            .read_while(|b| !is_whitespace(b) && b != b'?' && b != b'>');
        let close = self.scanner.find_seq_from(b"?>", self.scanner.position());
        let position = self.lines.position_at(start);

        if target == "xml" {
            return self
                .xml_declaration(start, close, position)
                .map(|declaration| Scan::Token(Token::XmlDeclaration(declaration)));
        }

        let Some(close) = close else {
            return Ok(Scan::Unterminated);
        };
        let content = self.input[self.scanner.position()..close].trim_start();
        self.scanner.set_position(close + 2);
        Ok(Scan::Token(Token::ProcessingInstruction {
            outer: &self.input[start..close + 2],
            target,
            content: (!content.is_empty()).then_some(content),
            position,
        }))
    }

    fn xml_declaration(
        &mut self,
        start: usize,
        close: Option<usize>,
        position: Position,
    ) -> Result<XmlDeclarationToken<'a>, ParseError> {
        let malformed = |reason: &str| {
            ParseError::new(format!("Malformed XML declaration: {reason}"), position)
        };
        let close = close.ok_or_else(|| malformed("declaration is not closed with \"?>\""))?;
        let body = &self.input[self.scanner.position()..close];
        let attributes = pseudo_attributes(body).map_err(malformed)?;

        let mut attributes = attributes.into_iter().peekable();
        let version = match attributes.next() {
            Some(("version", value)) => value,
            _ => return Err(malformed("\"version\" must be the first pseudo-attribute")),
        };
        let encoding = attributes.next_if(|(name, _)| *name == "encoding").map(|(_, v)| v);
        let standalone = attributes.next_if(|(name, _)| *name == "standalone").map(|(_, v)| v);
        if let Some((name, _)) = attributes.next() {
            return Err(malformed(&format!("unexpected pseudo-attribute \"{name}\"")));
        }
        if standalone.is_some_and(|value| value != "yes" && value != "no") {
            return Err(malformed("\"standalone\" must be \"yes\" or \"no\""));
        }

        self.scanner.set_position(close + 2);
        Ok(XmlDeclarationToken {
            outer: &self.input[start..close + 2],
            keyword: &self.input[start + 2..start + 5],
            version,
            encoding,
            standalone,
            position,
        })
    }

    fn doctype(&mut self, start: usize) -> Result<Token<'a>, ParseError> {
        let position = self.lines.position_at(start);
        let malformed = |reason: &str| {
            ParseError::new(format!("Malformed DOCTYPE clause: {reason}"), position)
        };
        let keyword = &self.input[start + 2..start + 9];
        self.scanner.set_position(start + 9);

        let before = self.scanner.position();
        self.scanner.skip_whitespace();
        if self.scanner.is_eof() {
            return Err(malformed("clause is not closed with \">\""));
        }
        if self.scanner.position() == before {
            return Err(malformed("whitespace expected after DOCTYPE keyword"));
        }

        let root_element = self
            .scanner
            .read_while(|b| !is_whitespace(b) && b != b'>' && b != b'[');
        if root_element.is_empty() {
            return Err(malformed("no root element name"));
        }
        self.scanner.skip_whitespace();

        let mut doctype_type = None;
        let mut public_id = None;
        let mut system_id = None;
        if self.scanner.peek().is_some_and(|b| b.is_ascii_alphabetic()) {
            let word = self.scanner.read_while(|b| b.is_ascii_alphabetic());
            self.scanner.skip_whitespace();
            if word.eq_ignore_ascii_case("PUBLIC") {
                public_id = Some(
                    self.quoted()
                        .ok_or_else(|| malformed("quoted public identifier expected"))?,
                );
                self.scanner.skip_whitespace();
                if matches!(self.scanner.peek(), Some(b'"' | b'\'')) {
                    system_id = Some(
                        self.quoted()
                            .ok_or_else(|| malformed("unterminated system identifier"))?,
                    );
                }
            } else if word.eq_ignore_ascii_case("SYSTEM") {
                system_id = Some(
                    self.quoted()
                        .ok_or_else(|| malformed("quoted system identifier expected"))?,
                );
            } else {
                return Err(malformed(&format!("unknown keyword \"{word}\"")));
            }
            doctype_type = Some(word);
            self.scanner.skip_whitespace();
        }

        let mut internal_subset = None;
        if self.scanner.peek() == Some(b'[') {
            let subset_start = self.scanner.position() + 1;
            let close = self
                .scanner
                .find_byte_from(b']', subset_start)
                .ok_or_else(|| malformed("internal subset is not closed"))?;
            internal_subset = Some(&self.input[subset_start..close]);
            self.scanner.set_position(close + 1);
            self.scanner.skip_whitespace();
        }

        match self.scanner.peek() {
            Some(b'>') => self.scanner.advance(1),
            Some(_) => return Err(malformed("unexpected content before \">\"")),
            None => return Err(malformed("clause is not closed with \">\"")),
        }

        Ok(Token::DocType(DocTypeToken {
            outer: &self.input[start..self.scanner.position()],
            keyword,
            root_element,
            doctype_type,
            public_id,
            system_id,
            internal_subset,
            position,
        }))
    }

    /// Read a quoted literal at the current position, without the quotes.
    fn quoted(&mut self) -> Option<&'a str> {
        let quote = self.scanner.peek().filter(|&b| b == b'"' || b == b'\'')?;
        let value_start = self.scanner.position() + 1;
        let close = self.scanner.find_byte_from(quote, value_start)?;
        self.scanner.set_position(close + 1);
        Some(&self.input[value_start..close])
    }
}

/// Split `name="value"` pairs of an XML declaration body.
fn pseudo_attributes(body: &str) -> Result<Vec<(&str, &str)>, &'static str> {
    let mut scanner = Scanner::new(body);
    let mut attributes = Vec::with_capacity(3);
    loop {
        let before = scanner.position();
        scanner.skip_whitespace();
        if scanner.is_eof() {
            return Ok(attributes);
        }
        if scanner.position() == before {
            return Err("whitespace expected between pseudo-attributes");
        }
        let name = scanner.read_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if name.is_empty() {
            return Err("pseudo-attribute name expected");
        }
        scanner.skip_whitespace();
        if scanner.peek() != Some(b'=') {
            return Err("\"=\" expected after pseudo-attribute name");
        }
        scanner.advance(1);
        scanner.skip_whitespace();
        let Some(quote) = scanner.peek().filter(|&b| b == b'"' || b == b'\'') else {
            return Err("quoted pseudo-attribute value expected");
        };
        let value_start = scanner.position() + 1;
        let Some(close) = scanner.find_byte_from(quote, value_start) else {
            return Err("pseudo-attribute value is not closed");
        };
        attributes.push((name, scanner.slice(value_start, close)));
        scanner.set_position(close + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token<'_>> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            tokens.push(token);
        }
        tokens
    }

    fn text(content: &str, line: u32, col: u32) -> Token<'_> {
        Token::Text {
            content,
            position: Position::new(line, col),
        }
    }

    #[test]
    fn test_start_and_end_tags() {
        let tokens = tokenize("<p>Hi</p>");
        assert_eq!(tokens.len(), 3);
        assert!(matches!(
            &tokens[0],
            Token::StartTag { name: "p", minimized: false, parts, .. } if parts.is_empty()
        ));
        assert_eq!(tokens[1], text("Hi", 1, 4));
        assert!(matches!(
            tokens[2],
            Token::EndTag { name: "p", position: Position { line: 1, col: 6 }, end_position: Position { line: 1, col: 9 } }
        ));
    }

    #[test]
    fn test_attributes() {
        let tokens = tokenize("<a href = 'x' disabled data-n=3/>");
        let Token::StartTag { parts, minimized, end_position, .. } = &tokens[0] else {
            panic!("start tag expected");
        };
        assert!(!minimized, "unquoted value absorbs the slash");
        assert_eq!(end_position.col, 33);
        let attributes: Vec<_> = parts
            .iter()
            .filter_map(|part| match part {
                TagPart::Attribute(a) => Some(*a),
                TagPart::Whitespace { .. } => None,
            })
            .collect();
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0].name, "href");
        assert_eq!(attributes[0].operator, Some(" = "));
        assert_eq!(attributes[0].value, Some("x"));
        assert_eq!(attributes[0].outer_value, Some("'x'"));
        assert_eq!(attributes[0].quote, QuoteStyle::Single);
        assert_eq!(attributes[0].value_position, Some(Position::new(1, 11)));
        assert_eq!(attributes[1].name, "disabled");
        assert!(!attributes[1].has_value());
        assert_eq!(attributes[2].value, Some("3/"));
    }

    #[test]
    fn test_minimized_and_whitespace_parts() {
        let tokens = tokenize("<br />");
        let Token::StartTag { parts, minimized, .. } = &tokens[0] else {
            panic!("start tag expected");
        };
        assert!(minimized);
        assert_eq!(
            parts[..],
            [TagPart::Whitespace { content: " ", position: Position::new(1, 4) }]
        );
    }

    #[test]
    fn test_comment_and_cdata() {
        let tokens = tokenize("a<!-- c -->\n<![CDATA[<x>]]>");
        assert_eq!(tokens[0], text("a", 1, 1));
        assert_eq!(
            tokens[1],
            Token::Comment {
                content: " c ",
                position: Position::new(1, 2),
                content_position: Position::new(1, 6),
            }
        );
        assert_eq!(tokens[2], text("\n", 1, 12));
        assert_eq!(
            tokens[3],
            Token::CData { content: "<x>", position: Position::new(2, 1) }
        );
    }

    #[test]
    fn test_invalid_lt_is_text() {
        let tokens = tokenize("a < b <3 <p>");
        assert_eq!(tokens[0], text("a < b <3 ", 1, 1));
        assert!(matches!(tokens[1], Token::StartTag { name: "p", .. }));
    }

    #[test]
    fn test_unterminated_structures_are_text() {
        assert_eq!(tokenize("x<!-- open"), vec![text("x", 1, 1), text("<!-- open", 1, 2)]);
        assert_eq!(tokenize("<div class=\"a"), vec![text("<div class=\"a", 1, 1)]);
        assert_eq!(tokenize("<?php echo"), vec![text("<?php echo", 1, 1)]);
    }

    #[test]
    fn test_raw_text_mode() {
        let input = "<script>if (a < b) { x = '</p>'; }</SCRIPT>";
        let mut tokenizer = Tokenizer::new(input);
        let Some(Token::StartTag { name, .. }) = tokenizer.next_token().unwrap() else {
            panic!("start tag expected");
        };
        tokenizer.enter_raw_text(name);
        assert_eq!(
            tokenizer.next_token().unwrap(),
            Some(text("if (a < b) { x = '</p>'; }", 1, 9))
        );
        assert!(matches!(
            tokenizer.next_token().unwrap(),
            Some(Token::EndTag { name: "SCRIPT", .. })
        ));
    }

    #[test]
    fn test_disabled_mode() {
        let mut tokenizer = Tokenizer::new(" <b>ignored</b> */--> tail<i>");
        tokenizer.disable_until("*/-->");
        assert_eq!(tokenizer.next_token().unwrap(), Some(text(" <b>ignored</b> ", 1, 1)));
        assert_eq!(tokenizer.next_token().unwrap(), Some(text("*/--> tail", 1, 17)));
    }

    #[test]
    fn test_processing_instruction() {
        let tokens = tokenize("<?php echo 1; ?>");
        assert_eq!(
            tokens[0],
            Token::ProcessingInstruction {
                outer: "<?php echo 1; ?>",
                target: "php",
                content: Some("echo 1; "),
                position: Position::START,
            }
        );
    }

    #[test]
    fn test_xml_declaration() {
        let tokens = tokenize("<?xml version=\"1.0\" encoding='UTF-8' standalone=\"yes\"?><r/>");
        let Token::XmlDeclaration(declaration) = &tokens[0] else {
            panic!("xml declaration expected");
        };
        assert_eq!(declaration.version, "1.0");
        assert_eq!(declaration.encoding, Some("UTF-8"));
        assert_eq!(declaration.standalone, Some("yes"));
        assert_eq!(declaration.keyword, "xml");
    }

    #[test]
    fn test_malformed_xml_declaration_is_fatal() {
        let mut tokenizer = Tokenizer::new("\n  <?xml encoding=\"UTF-8\"?>");
        let _ = tokenizer.next_token().unwrap();
        let error = tokenizer.next_token().unwrap_err();
        assert_eq!(error.position, Position::new(2, 3));
        assert!(error.message.starts_with("Malformed XML declaration"));

        let mut tokenizer = Tokenizer::new("<?xml version=\"1.0\"");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_doctype() {
        let tokens = tokenize(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Strict//EN\" \"http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd\">",
        );
        let Token::DocType(doctype) = &tokens[0] else {
            panic!("doctype expected");
        };
        assert_eq!(doctype.root_element, "html");
        assert_eq!(doctype.doctype_type, Some("PUBLIC"));
        assert_eq!(doctype.public_id, Some("-//W3C//DTD XHTML 1.0 Strict//EN"));
        assert!(doctype.system_id.is_some_and(|id| id.ends_with("strict.dtd")));

        let tokens = tokenize("<!doctype html>");
        assert!(matches!(&tokens[0], Token::DocType(d) if d.keyword == "doctype" && d.doctype_type.is_none()));
    }

    #[test]
    fn test_malformed_doctype_is_fatal() {
        for input in ["<!DOCTYPE>", "<!DOCTYPE html", "<!DOCTYPE html FOO \"x\">", "<!DOCTYPE html PUBLIC>"] {
            let mut tokenizer = Tokenizer::new(input);
            let error = tokenizer.next_token().unwrap_err();
            assert!(error.message.starts_with("Malformed DOCTYPE"), "{input}");
        }
    }

    #[test]
    fn test_parts_vector_is_reused() {
        let mut tokenizer = Tokenizer::new("<a x=1 y=2><b>");
        let Some(Token::StartTag { parts, .. }) = tokenizer.next_token().unwrap() else {
            panic!("start tag expected");
        };
        let capacity = parts.capacity();
        tokenizer.recycle(parts);
        let Some(Token::StartTag { parts, .. }) = tokenizer.next_token().unwrap() else {
            panic!("start tag expected");
        };
        assert!(parts.is_empty());
        assert!(parts.capacity() >= capacity);
    }
}
