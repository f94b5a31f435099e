//! Lexer errors.

use std::fmt;

use ml_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that starts no token, e.g. a lone `!`.
    UnexpectedCharacter(char),
    /// Missing closing `"`.
    UnterminatedString,
}

/// A lexer error located in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { kind, span }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnexpectedCharacter(c) => write!(f, "illegal character '{c}'"),
            LexErrorKind::UnterminatedString => f.write_str("unterminated string literal"),
        }
    }
}
