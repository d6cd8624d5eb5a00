//! Attribute and inner-whitespace parts of a start tag
//!
//! Attribute values are kept exactly as written: `value` is the content
//! between the quotes, `outer_value` includes them. No character
//! references are decoded.

use std::fmt;

use super::position::Position;

/// How an attribute value was (or should be) quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
    /// Unquoted value, or no value at all
    None,
}

impl QuoteStyle {
    #[inline]
    pub fn quote_char(self) -> Option<char> {
        match self {
            QuoteStyle::Double => Some('"'),
            QuoteStyle::Single => Some('\''),
            QuoteStyle::None => None,
        }
    }

    #[inline]
    pub(crate) fn from_byte(b: u8) -> QuoteStyle {
        match b {
            b'"' => QuoteStyle::Double,
            b'\'' => QuoteStyle::Single,
            _ => QuoteStyle::None,
        }
    }

    /// `value` surrounded by this quote style.
    pub fn quote(self, value: &str) -> String {
        match self.quote_char() {
            Some(q) => format!("{q}{value}{q}"),
            None => value.to_string(),
        }
    }
}

/// One attribute as written in a start tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagAttribute<'a> {
    pub name: &'a str,
    pub name_position: Position,
    /// `=` including any whitespace around it; `None` for valueless attributes
    pub operator: Option<&'a str>,
    pub operator_position: Option<Position>,
    /// Value without quotes
    pub value: Option<&'a str>,
    /// Value including quotes
    pub outer_value: Option<&'a str>,
    pub quote: QuoteStyle,
    pub value_position: Option<Position>,
}

impl<'a> TagAttribute<'a> {
    /// A valueless attribute (`<input disabled>`).
    pub fn bare(name: &'a str, name_position: Position) -> Self {
        TagAttribute {
            name,
            name_position,
            operator: None,
            operator_position: None,
            value: None,
            outer_value: None,
            quote: QuoteStyle::None,
            value_position: None,
        }
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for TagAttribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let (Some(operator), Some(outer)) = (self.operator, self.outer_value) {
            write!(f, "{operator}{outer}")?;
        }
        Ok(())
    }
}

/// Piece of a start tag between the element name and its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagPart<'a> {
    Whitespace { content: &'a str, position: Position },
    Attribute(TagAttribute<'a>),
}
