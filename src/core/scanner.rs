//! SIMD-accelerated markup scanning using memchr
//!
//! Works on the UTF-8 bytes of a `&str`. Every delimiter the scanner
//! stops at is ASCII, so positions it returns are always character
//! boundaries and slicing back into the `&str` is safe.
//!
//! memchr uses SIMD acceleration where available:
//! - SSE2 (default x86_64)
//! - AVX2 (runtime detection)
//! - NEON (aarch64)

use memchr::{memchr, memmem};

/// Cursor over markup input
pub struct Scanner<'a> {
    text: &'a str,
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(text: &'a str) -> Self {
        Scanner {
            text,
            input: text.as_bytes(),
            pos: 0,
        }
    }

    /// Get the current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the current byte offset
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Total input length in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.input.len()
    }

    /// Check if we've reached the end
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Get a slice of the input between two byte offsets
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Peek at byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip whitespace characters (space, tab, newline, carriage return, form feed)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if !is_whitespace(b) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Find next occurrence of a specific byte at or after `from`
    #[inline]
    pub fn find_byte_from(&self, byte: u8, from: usize) -> Option<usize> {
        memchr(byte, &self.input[from..]).map(|i| from + i)
    }

    /// Find next occurrence of a byte sequence at or after `from`
    #[inline]
    pub fn find_seq_from(&self, needle: &[u8], from: usize) -> Option<usize> {
        memmem::find(&self.input[from..], needle).map(|i| from + i)
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.input[self.pos..].starts_with(needle)
    }

    /// Same as `starts_with`, ignoring ASCII case
    #[inline]
    pub fn starts_with_ignore_case(&self, needle: &[u8]) -> bool {
        self.input
            .get(self.pos..self.pos + needle.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(needle))
    }

    /// Read an element name: a name start character followed by anything
    /// up to whitespace, `/`, `>` or `<`
    pub fn read_name(&mut self) -> Option<&'a str> {
        let start = self.pos;
        if !is_name_start_char(self.peek()?) {
            return None;
        }
        self.pos += 1;
        while let Some(b) = self.peek() {
            if is_whitespace(b) || matches!(b, b'/' | b'>' | b'<') {
                break;
            }
            self.pos += 1;
        }
        Some(self.slice(start, self.pos))
    }

    /// Advance while `accept` holds, returning the consumed slice
    pub fn read_while(&mut self, accept: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !accept(b) {
                break;
            }
            self.pos += 1;
        }
        self.slice(start, self.pos)
    }
}

/// Check if byte is markup whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c')
}

/// Check if byte can start an element name
/// Allows ASCII letters, underscore, colon, and non-ASCII (UTF-8 Unicode)
#[inline]
pub fn is_name_start_char(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_byte_from() {
        let scanner = Scanner::new("hello <world>");
        assert_eq!(scanner.find_byte_from(b'<', 0), Some(6));
        assert_eq!(scanner.find_byte_from(b'<', 7), None);
    }

    #[test]
    fn test_find_seq_from() {
        let scanner = Scanner::new("a --> b -->");
        assert_eq!(scanner.find_seq_from(b"-->", 0), Some(2));
        assert_eq!(scanner.find_seq_from(b"-->", 3), Some(8));
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new("th:block-1 attr>");
        assert_eq!(scanner.read_name(), Some("th:block-1"));
        assert_eq!(scanner.position(), 10);

        let mut scanner = Scanner::new("1abc");
        assert_eq!(scanner.read_name(), None);
    }

    #[test]
    fn test_read_name_unicode() {
        let mut scanner = Scanner::new("élément/>");
        assert_eq!(scanner.read_name(), Some("élément"));
    }

    #[test]
    fn test_starts_with_ignore_case() {
        let scanner = Scanner::new("<!doctype html>");
        assert!(scanner.starts_with_ignore_case(b"<!DOCTYPE"));
        assert!(!scanner.starts_with(b"<!DOCTYPE"));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
    }
}
