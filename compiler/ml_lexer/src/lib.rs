//! Lexer for ML source text.
//!
//! Built on logos. Keywords are case-insensitive (`FUN` and `fun` are the
//! same token); identifiers and string literals are interned. Lexing never
//! stops early: malformed input becomes an [`TokenKind::Error`] token plus a
//! [`LexError`], and the parser reports the first one.

mod escape;
mod lex_error;
mod raw_token;
mod token;

use logos::Logos;
use ml_ir::{Span, StringInterner};

pub use lex_error::{LexError, LexErrorKind};
pub use token::{Token, TokenKind, TokenList};

use raw_token::RawToken;

/// Tokenize `source`, interning names into `interner`.
///
/// The returned list always ends with a single [`TokenKind::Eof`].
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    let mut list = TokenList::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = Span::from_range(raw.span());
        let slice = raw.slice();
        match result {
            Ok(RawToken::Comment) => {}
            Ok(RawToken::UnterminatedText) => {
                list.errors.push(LexError::new(LexErrorKind::UnterminatedString, span));
                list.push(Token::new(TokenKind::Error, span));
            }
            Ok(token) => list.push(Token::new(convert(token, slice, interner), span)),
            Err(()) => {
                let found = slice.chars().next().unwrap_or('\0');
                list.errors
                    .push(LexError::new(LexErrorKind::UnexpectedCharacter(found), span));
                list.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    list.push(Token::new(TokenKind::Eof, Span::new(end, end)));
    list
}

fn convert(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Number(value) => TokenKind::Number(value),
        RawToken::Text => {
            let body = &slice[1..slice.len() - 1];
            TokenKind::Text(interner.intern(&escape::unescape(body)))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Var => TokenKind::Var,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Not => TokenKind::Not,
        RawToken::If => TokenKind::If,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::For => TokenKind::For,
        RawToken::To => TokenKind::To,
        RawToken::Step => TokenKind::Step,
        RawToken::While => TokenKind::While,
        RawToken::Fun => TokenKind::Fun,
        RawToken::Then => TokenKind::Then,
        RawToken::End => TokenKind::End,
        RawToken::Return => TokenKind::Return,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Break => TokenKind::Break,
        RawToken::Embed => TokenKind::Embed,
        RawToken::With => TokenKind::With,
        RawToken::Ai => TokenKind::Ai,
        RawToken::PipeKeyword | RawToken::Pipe => TokenKind::Pipe,

        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Caret => TokenKind::Caret,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::Gt => TokenKind::Gt,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Newline => TokenKind::Newline,

        RawToken::Comment | RawToken::UnterminatedText => TokenKind::Error,
    }
}
