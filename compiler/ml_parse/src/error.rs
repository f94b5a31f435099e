//! Parse errors.

use ml_ir::{CompilationError, LineIndex, Span};

/// A syntax error at a source span. Converted to a [`CompilationError`]
/// with line and column once parsing stops.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        ParseError {
            message: message.into(),
            span,
        }
    }

    pub fn into_compilation_error(self, lines: &LineIndex) -> CompilationError {
        CompilationError::at(self.message, self.span, lines)
    }
}
