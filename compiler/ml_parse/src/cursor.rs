//! Token cursor for navigating the token stream.

use ml_ir::{Name, Span};
use ml_lexer::{Token, TokenKind, TokenList};

use crate::ParseError;

/// Position in a [`TokenList`]. The last token is always `Eof` and the
/// cursor never moves past it.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub fn current(&self) -> Token {
        let last = self.tokens.tokens.len().saturating_sub(1);
        self.tokens
            .tokens
            .get(self.pos.min(last))
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|prev| self.tokens.tokens.get(prev))
            .map_or(Span::DUMMY, |t| t.span)
    }

    /// Compare discriminants only, so `check(&TokenKind::Ident(Name::EMPTY))`
    /// matches any identifier.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current_kind()) == std::mem::discriminant(&kind)
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|&k| self.check(k))
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.is_at_end() {
            tracing::trace!(kind = ?token.kind, pos = self.pos, "advance");
            self.pos += 1;
        }
        token
    }

    /// Consume `kind` if it is next.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    pub fn expect_ident(&mut self) -> Result<Name, ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    pub fn skip_newlines(&mut self) {
        while self.check(TokenKind::Newline) {
            self.advance();
        }
    }

    /// "expected X, found Y" at the current token.
    #[cold]
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let found = self.current_kind();
        ParseError::new(
            format!("expected {expected}, found {}", found.describe()),
            self.current_span(),
        )
    }
}
