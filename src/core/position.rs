//! Line/column positions
//!
//! Positions are 1-based and count characters, not bytes. They are
//! computed lazily: the tokenizer works with byte offsets and asks the
//! [`LineTracker`] only when an event needs a position, so newline
//! counting is a forward memchr pass over the bytes in between.

use std::fmt;

use memchr::{memchr_iter, memrchr};

/// A 1-based line/column location in a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, col: 1 };

    #[inline]
    pub const fn new(line: u32, col: u32) -> Self {
        Position { line, col }
    }

    /// Same line, `chars` columns further.
    #[inline]
    pub const fn advanced(self, chars: u32) -> Self {
        Position {
            line: self.line,
            col: self.col + chars,
        }
    }

    /// Position reached after reading `text` from here.
    pub fn after(self, text: &str) -> Self {
        let bytes = text.as_bytes();
        match memrchr(b'\n', bytes) {
            Some(last_newline) => Position {
                line: self.line + memchr_iter(b'\n', bytes).count() as u32,
                col: 1 + count_chars(&bytes[last_newline + 1..]),
            },
            None => self.advanced(count_chars(bytes)),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, col {}", self.line, self.col)
    }
}

/// Translation from positions inside a nested region to positions in the
/// enclosing document.
///
/// Only the first line of the region is shifted horizontally; later lines
/// start at column 1 in both coordinate systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionOffset {
    lines: u32,
    cols: u32,
}

impl PositionOffset {
    /// No translation.
    pub const NONE: PositionOffset = PositionOffset { lines: 0, cols: 0 };

    /// Offset for a region whose first character sits at `origin`.
    #[inline]
    pub fn starting_at(origin: Position) -> Self {
        PositionOffset {
            lines: origin.line.saturating_sub(1),
            cols: origin.col.saturating_sub(1),
        }
    }

    #[inline]
    pub fn apply(self, position: Position) -> Position {
        if position.line == 1 {
            Position::new(position.line + self.lines, position.col + self.cols)
        } else {
            Position::new(position.line + self.lines, position.col)
        }
    }
}

/// Count characters in a UTF-8 byte run (every byte that is not a
/// continuation byte starts a character).
#[inline]
fn count_chars(bytes: &[u8]) -> u32 {
    bytes.iter().filter(|&&b| (b as i8) >= -0x40).count() as u32
}

/// Maps byte offsets to positions, remembering the last answer.
#[derive(Debug)]
pub struct LineTracker<'a> {
    input: &'a [u8],
    offset: usize,
    position: Position,
}

impl<'a> LineTracker<'a> {
    pub fn new(input: &'a str) -> Self {
        LineTracker {
            input: input.as_bytes(),
            offset: 0,
            position: Position::START,
        }
    }

    /// Position of the character starting at byte `offset`. Cheapest when
    /// offsets are requested in increasing order.
    pub fn position_at(&mut self, offset: usize) -> Position {
        let offset = offset.min(self.input.len());
        if offset < self.offset {
            self.offset = 0;
            self.position = Position::START;
        }

        let chunk = &self.input[self.offset..offset];
        match memrchr(b'\n', chunk) {
            Some(last_newline) => {
                self.position.line += memchr_iter(b'\n', chunk).count() as u32;
                self.position.col = 1 + count_chars(&chunk[last_newline + 1..]);
            }
            None => self.position.col += count_chars(chunk),
        }
        self.offset = offset;
        self.position
    }
}
