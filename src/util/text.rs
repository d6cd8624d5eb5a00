//! Case-aware text comparison without allocation
//!
//! All operations work over any [`CharSequence`]: string slices, `char`
//! buffers and [`Fragments`] (a sequence of slices treated as one text),
//! so callers can compare a range of a raw buffer against a stored string
//! without building an intermediate `String`.
//!
//! Case-insensitive character equality is checked in three steps:
//! - raw equality
//! - equality of the upper-case forms
//! - equality of the lower-case forms of the upper-case forms
//!
//! The last step covers alphabets where upper-casing alone is not enough
//! (Georgian, dotless/dotted `i`).

use std::cmp::Ordering;
use std::iter::{Copied, FlatMap};
use std::slice::Iter;
use std::str::Chars;

/// Anything that can be walked as a sequence of characters, in both directions.
pub trait CharSequence {
    type Chars<'a>: DoubleEndedIterator<Item = char> + Clone
    where
        Self: 'a;

    fn seq_chars(&self) -> Self::Chars<'_>;
}

impl CharSequence for str {
    type Chars<'a> = Chars<'a>;

    #[inline]
    fn seq_chars(&self) -> Chars<'_> {
        self.chars()
    }
}

impl CharSequence for String {
    type Chars<'a> = Chars<'a>;

    #[inline]
    fn seq_chars(&self) -> Chars<'_> {
        self.chars()
    }
}

impl CharSequence for [char] {
    type Chars<'a> = Copied<Iter<'a, char>>;

    #[inline]
    fn seq_chars(&self) -> Self::Chars<'_> {
        self.iter().copied()
    }
}

impl<T: CharSequence + ?Sized> CharSequence for &T {
    type Chars<'a> = T::Chars<'a> where Self: 'a;

    #[inline]
    fn seq_chars(&self) -> Self::Chars<'_> {
        (**self).seq_chars()
    }
}

/// Several slices read as a single text, e.g. `["th:", "text"]` == `"th:text"`.
#[derive(Debug, Clone, Copy)]
pub struct Fragments<'f>(pub &'f [&'f str]);

#[inline]
fn fragment_chars<'f>(fragment: &'f &'f str) -> Chars<'f> {
    fragment.chars()
}

impl<'f> CharSequence for Fragments<'f> {
    type Chars<'a> = FlatMap<Iter<'f, &'f str>, Chars<'f>, fn(&'f &'f str) -> Chars<'f>>
    where
        Self: 'a;

    #[inline]
    fn seq_chars(&self) -> Self::Chars<'_> {
        self.0
            .iter()
            .flat_map(fragment_chars as fn(&'f &'f str) -> Chars<'f>)
    }
}

/// Single-character upper-case mapping. Expanding mappings (`ß` -> `SS`)
/// have no single-character form and leave the character unchanged.
#[inline]
fn to_upper(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Single-character lower-case mapping. The only expanding lower-case
/// mapping is `İ` (U+0130), whose simple form is its first character `i`.
#[inline]
fn to_lower(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    c.to_lowercase().next().unwrap_or(c)
}

/// Compare two characters, optionally ignoring case.
#[inline]
pub fn char_equals(case_sensitive: bool, c1: char, c2: char) -> bool {
    if c1 == c2 {
        return true;
    }
    if case_sensitive {
        return false;
    }
    let u1 = to_upper(c1);
    let u2 = to_upper(c2);
    u1 == u2 || to_lower(u1) == to_lower(u2)
}

#[inline]
fn fold(c: char) -> char {
    to_lower(to_upper(c))
}

/// Check two texts for equality.
pub fn equals<A, B>(case_sensitive: bool, a: &A, b: &B) -> bool
where
    A: CharSequence + ?Sized,
    B: CharSequence + ?Sized,
{
    let mut left = a.seq_chars();
    let mut right = b.seq_chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(c1), Some(c2)) if char_equals(case_sensitive, c1, c2) => {}
            _ => return false,
        }
    }
}

fn iter_starts_with<T, P>(case_sensitive: bool, mut text: T, prefix: P) -> bool
where
    T: Iterator<Item = char>,
    P: Iterator<Item = char>,
{
    for p in prefix {
        match text.next() {
            Some(c) if char_equals(case_sensitive, c, p) => {}
            _ => return false,
        }
    }
    true
}

/// Check whether `text` starts with `prefix`.
pub fn starts_with<T, P>(case_sensitive: bool, text: &T, prefix: &P) -> bool
where
    T: CharSequence + ?Sized,
    P: CharSequence + ?Sized,
{
    iter_starts_with(case_sensitive, text.seq_chars(), prefix.seq_chars())
}

/// Check whether `text` ends with `suffix`.
pub fn ends_with<T, S>(case_sensitive: bool, text: &T, suffix: &S) -> bool
where
    T: CharSequence + ?Sized,
    S: CharSequence + ?Sized,
{
    iter_starts_with(
        case_sensitive,
        text.seq_chars().rev(),
        suffix.seq_chars().rev(),
    )
}

/// Check whether `fragment` occurs anywhere in `text`. An empty fragment
/// is always contained.
pub fn contains<T, F>(case_sensitive: bool, text: &T, fragment: &F) -> bool
where
    T: CharSequence + ?Sized,
    F: CharSequence + ?Sized,
{
    let mut window = text.seq_chars();
    loop {
        if iter_starts_with(case_sensitive, window.clone(), fragment.seq_chars()) {
            return true;
        }
        if window.next().is_none() {
            return false;
        }
    }
}

/// Lexicographic comparison. Ignoring case, characters are compared by
/// their folded (upper then lower) form; a proper prefix orders first.
pub fn compare_to<A, B>(case_sensitive: bool, a: &A, b: &B) -> Ordering
where
    A: CharSequence + ?Sized,
    B: CharSequence + ?Sized,
{
    let mut left = a.seq_chars();
    let mut right = b.seq_chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(c1), Some(c2)) => {
                if char_equals(case_sensitive, c1, c2) {
                    continue;
                }
                return if case_sensitive {
                    c1.cmp(&c2)
                } else {
                    fold(c1).cmp(&fold(c2))
                };
            }
        }
    }
}

/// Binary search over `values`, which must be sorted by [`compare_to`]
/// with the same case sensitivity. Same contract as `slice::binary_search`.
pub fn binary_search<S, K>(case_sensitive: bool, values: &[S], key: &K) -> Result<usize, usize>
where
    S: CharSequence,
    K: CharSequence + ?Sized,
{
    values.binary_search_by(|probe| compare_to(case_sensitive, probe, key))
}

/// Polynomial hash (31-multiplier over UTF-16 code units), the same for
/// any representation of the same text.
pub fn hash_code<S: CharSequence + ?Sized>(text: &S) -> i32 {
    let mut units = [0u16; 2];
    text.seq_chars().fold(0i32, |h, c| {
        c.encode_utf16(&mut units)
            .iter()
            .fold(h, |h, &unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_ignoring_case() {
        assert!(equals(false, "DIV", "div"));
        assert!(!equals(true, "DIV", "div"));
        assert!(equals(true, "div", "div"));
        assert!(!equals(false, "div", "divs"));
        assert!(equals(false, "", ""));
    }

    #[test]
    fn test_equals_mixed_inputs() {
        let buffer: Vec<char> = "<TH:TEXT>".chars().collect();
        assert!(equals(false, &buffer[1..8], "th:text"));
        assert!(equals(false, &Fragments(&["th", ":", "text"]), "TH:TEXT"));
        assert!(!equals(true, &Fragments(&["th", ":", "text"]), "TH:TEXT"));
    }

    #[test]
    fn test_equals_three_step_fold() {
        // dotless i upper-cases to I
        assert!(equals(false, "\u{131}", "I"));
        assert!(equals(false, "\u{130}", "i"));
        assert!(!equals(false, "\u{df}", "SS"));
    }

    #[test]
    fn test_starts_ends_with() {
        assert!(starts_with(false, "DATA-id", "data-"));
        assert!(!starts_with(true, "DATA-id", "data-"));
        assert!(!starts_with(false, "da", "data-"));
        assert!(ends_with(false, "Template.HTML", ".html"));
        assert!(ends_with(true, "abc", ""));
        assert!(!ends_with(false, "c", "abc"));
    }

    #[test]
    fn test_contains() {
        assert!(contains(false, "HelloWorld", "oworl"));
        assert!(contains(true, "aaab", "aab"));
        assert!(!contains(true, "HelloWorld", "oworl"));
        assert!(contains(false, "abc", ""));
        assert!(!contains(false, "", "a"));
    }

    #[test]
    fn test_compare_to() {
        assert_eq!(compare_to(false, "abc", "ABD"), Ordering::Less);
        assert_eq!(compare_to(false, "ABC", "abc"), Ordering::Equal);
        assert_eq!(compare_to(true, "ABC", "abc"), Ordering::Less);
        assert_eq!(compare_to(false, "ab", "abc"), Ordering::Less);
        assert_eq!(compare_to(false, "abcd", "ABC"), Ordering::Greater);
    }

    #[test]
    fn test_binary_search() {
        let values = ["a", "B", "c", "D"];
        assert_eq!(binary_search(false, &values, "b"), Ok(1));
        assert_eq!(binary_search(false, &values, "d"), Ok(3));
        assert_eq!(binary_search(false, &values, "bb"), Err(2));
    }

    #[test]
    fn test_hash_code_known_values() {
        assert_eq!(hash_code(""), 0);
        assert_eq!(hash_code("a"), 97);
        assert_eq!(hash_code("hello"), 99_162_322);
        assert_eq!(hash_code(&Fragments(&["hel", "lo"])), 99_162_322);
        let buffer: Vec<char> = "hello".chars().collect();
        assert_eq!(hash_code(buffer.as_slice()), 99_162_322);
    }
}
