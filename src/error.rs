//! Error types
//!
//! Recoverable irregularities in the markup (unmatched close tags, stray
//! `<`, unterminated structures) are reported as events, never as errors.
//! Errors stop the parse of the current document.

use std::io;

use crate::core::{ParseError, Position};

/// Crate-wide error
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    /// The input is not parseable (malformed DOCTYPE or XML declaration)
    #[error("Exception parsing document: template=\"{document}\", line {line} - column {column}: {message}")]
    Parse {
        document: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// The input could not be read
    #[error("An error happened during template parsing: template=\"{document}\": {source}")]
    Io {
        document: String,
        #[source]
        source: io::Error,
    },

    /// A decoupled logic resource is not valid
    #[error("Error while processing decoupled logic file: {message} (template: \"{document}\" - line {line}, col {column})")]
    DecoupledLogic {
        document: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// A markup selector could not be parsed
    #[error("Invalid markup selector \"{selector}\": {message}")]
    InvalidSelector { selector: String, message: String },
}

impl MarkupError {
    pub fn parse(document: &str, error: ParseError) -> Self {
        MarkupError::Parse {
            document: document.to_string(),
            line: error.position.line,
            column: error.position.col,
            message: error.message,
        }
    }

    pub fn io(document: &str, source: io::Error) -> Self {
        MarkupError::Io {
            document: document.to_string(),
            source,
        }
    }

    pub fn decoupled_logic(document: &str, position: Position, message: impl Into<String>) -> Self {
        MarkupError::DecoupledLogic {
            document: document.to_string(),
            line: position.line,
            column: position.col,
            message: message.into(),
        }
    }

    pub fn invalid_selector(selector: &str, message: impl Into<String>) -> Self {
        MarkupError::InvalidSelector {
            selector: selector.to_string(),
            message: message.into(),
        }
    }

    /// Name of the document being parsed, when the error is tied to one.
    pub fn document(&self) -> Option<&str> {
        match self {
            MarkupError::Parse { document, .. }
            | MarkupError::Io { document, .. }
            | MarkupError::DecoupledLogic { document, .. } => Some(document),
            MarkupError::InvalidSelector { .. } => None,
        }
    }

    /// Where in the document the error was detected.
    pub fn position(&self) -> Option<Position> {
        match self {
            MarkupError::Parse { line, column, .. }
            | MarkupError::DecoupledLogic { line, column, .. } => Some(Position::new(*line, *column)),
            _ => None,
        }
    }
}

/// Crate result alias
pub type Result<T, E = MarkupError> = std::result::Result<T, E>;
