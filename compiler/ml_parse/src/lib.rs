//! Recursive descent parser for ML.
//!
//! Produces a [`Module`] whose nodes live in a flat [`ExprArena`]. Parsing
//! stops at the first error, reported as a [`CompilationError`] with line
//! and column.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::ParseError;

use ml_ir::{
    CompilationError, Expr, ExprArena, ExprId, ExprKind, LineIndex, Module, Span, StringInterner,
};
use ml_lexer::{TokenKind, TokenList};

/// Parse `source` into a module.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str, interner: &StringInterner) -> Result<Module, CompilationError> {
    let lines = LineIndex::new(source);
    let tokens = ml_lexer::lex(source, interner);
    if let Some(err) = tokens.errors.first() {
        return Err(CompilationError::at(err.to_string(), err.span, &lines));
    }

    let mut parser = Parser::new(&tokens, source.len());
    match parser.module() {
        Ok(body) => {
            tracing::debug!(nodes = parser.arena.expr_count(), "parsed module");
            Ok(Module {
                arena: parser.arena,
                body,
                lines,
            })
        }
        Err(err) => Err(err.into_compilation_error(&lines)),
    }
}

/// Parser state: a cursor over the tokens and the arena being filled.
struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: ExprArena,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a TokenList, source_len: usize) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::with_capacity(source_len),
        }
    }

    #[inline]
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    #[inline]
    fn span_of(&self, id: ExprId) -> Span {
        self.arena.get_expr(id).span
    }

    /// Span from `start` through the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    #[inline]
    fn check(&self, kind: TokenKind) -> bool {
        self.cursor.check(kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests panic on failure")]
mod tests;
