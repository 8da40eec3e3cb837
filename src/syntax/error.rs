//! Parse errors.

use thiserror::Error;

use crate::base::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The input contains no tokens at all.
    EmptyDocument,
    UnexpectedToken,
    UnexpectedEof,
    InvalidToken,
    InvalidLiteral,
    /// A condition nests `!` or parentheses too deeply.
    TooDeeplyNested,
}

/// A syntax error with its location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message} at {}:{}", .span.start.line + 1, .span.start.column + 1)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    pub fn empty_document() -> Self {
        Self::new(
            ParseErrorKind::EmptyDocument,
            "document is empty",
            Span::default(),
        )
    }
}
