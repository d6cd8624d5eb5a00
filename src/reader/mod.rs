//! Document sources
//!
//! The parser works on `&str`; this module turns streams into text first.

pub mod buffered;

pub use buffered::BufferedReader;

use std::io::Read;

use crate::error::Result;

/// Read `reader` to the end as the UTF-8 text of `document`.
pub fn read_document<R: Read>(document: &str, reader: R) -> Result<String> {
    BufferedReader::new(reader).read_document(document)
}
