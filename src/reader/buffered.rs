//! Buffered document reader
//!
//! Reads a whole document from any source implementing `Read`, in fixed
//! size chunks, and decodes it as UTF-8.

use std::io::{self, Read};

use crate::error::{MarkupError, Result};

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Chunked reader for document sources
pub struct BufferedReader<R: Read> {
    reader: R,
    chunk: Vec<u8>,
}

impl<R: Read> BufferedReader<R> {
    /// Create a new buffered reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new buffered reader with specified chunk size
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        BufferedReader {
            reader,
            chunk: vec![0u8; capacity.max(1)],
        }
    }

    /// Read all remaining bytes
    pub fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.chunk.len());
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => return Ok(bytes),
                Ok(read) => bytes.extend_from_slice(&self.chunk[..read]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Read the rest of the source as the text of `document`, without a
    /// leading byte order mark.
    pub fn read_document(mut self, document: &str) -> Result<String> {
        let bytes = self.read_to_end().map_err(|e| MarkupError::io(document, e))?;
        let mut text = String::from_utf8(bytes)
            .map_err(|e| MarkupError::io(document, io::Error::new(io::ErrorKind::InvalidData, e)))?;
        if text.starts_with(BYTE_ORDER_MARK) {
            text.drain(..BYTE_ORDER_MARK.len_utf8());
        }
        Ok(text)
    }
}
