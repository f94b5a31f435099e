//! Compile-time error shared by the parser, the lowering and the driver.

use thiserror::Error;

use crate::{LineIndex, Span};

/// An error that aborts compilation at the stage where it occurs.
///
/// `line`/`column` are 1-based and present whenever the error can be tied to
/// a source location.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompilationError {
    pub message: String,
    pub span: Option<Span>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl CompilationError {
    /// Error with no source location (toolchain failures, I/O).
    pub fn new(message: impl Into<String>) -> Self {
        CompilationError {
            message: message.into(),
            span: None,
            line: None,
            column: None,
        }
    }

    /// Error located at `span`, resolved through `lines`.
    pub fn at(message: impl Into<String>, span: Span, lines: &LineIndex) -> Self {
        let (line, column) = lines.line_col(span.start);
        CompilationError {
            message: message.into(),
            span: Some(span),
            line: Some(line),
            column: Some(column),
        }
    }

    /// `line:column` prefix, if the location is known.
    pub fn location(&self) -> Option<String> {
        match (self.line, self.column) {
            (Some(line), Some(column)) => Some(format!("{line}:{column}")),
            (Some(line), None) => Some(line.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn located_errors_carry_line_and_column() {
        let lines = LineIndex::new("var x = 1\nbreak\n");
        let err = CompilationError::at("'break' outside of a loop", Span::new(10, 15), &lines);
        assert_eq!(err.line, Some(2));
        assert_eq!(err.column, Some(1));
        assert_eq!(err.location().as_deref(), Some("2:1"));
        assert_eq!(err.to_string(), "'break' outside of a loop");
    }

    #[test]
    fn unlocated_errors_have_no_position() {
        let err = CompilationError::new("toolchain failed");
        assert_eq!(err.location(), None);
    }
}
