//! Cooked tokens.

use std::fmt;

use ml_ir::{Name, Span};

#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TokenKind {
    Number(f64),
    Text(Name),
    Ident(Name),

    Var,
    And,
    Or,
    Not,
    If,
    Elif,
    Else,
    For,
    To,
    Step,
    While,
    Fun,
    Then,
    End,
    Return,
    Continue,
    Break,
    Embed,
    With,
    Ai,
    /// `|` or the `PIPE` keyword.
    Pipe,

    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    Arrow,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    /// `\n` or `;`
    Newline,
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable description for "expected X, found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Text(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Var => "'VAR'",
            TokenKind::And => "'AND'",
            TokenKind::Or => "'OR'",
            TokenKind::Not => "'NOT'",
            TokenKind::If => "'IF'",
            TokenKind::Elif => "'ELIF'",
            TokenKind::Else => "'ELSE'",
            TokenKind::For => "'FOR'",
            TokenKind::To => "'TO'",
            TokenKind::Step => "'STEP'",
            TokenKind::While => "'WHILE'",
            TokenKind::Fun => "'FUN'",
            TokenKind::Then => "'THEN'",
            TokenKind::End => "'END'",
            TokenKind::Return => "'RETURN'",
            TokenKind::Continue => "'CONTINUE'",
            TokenKind::Break => "'BREAK'",
            TokenKind::Embed => "'EMBED'",
            TokenKind::With => "'WITH'",
            TokenKind::Ai => "'AI'",
            TokenKind::Pipe => "'|'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::LtEq => "'<='",
            TokenKind::GtEq => "'>='",
            TokenKind::Eq => "'='",
            TokenKind::Arrow => "'->'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Newline => "newline",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Output of [`lex`](crate::lex): tokens plus any lexical errors.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
    pub errors: Vec<crate::LexError>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token kinds only, mostly for tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}
