//! Raw logos token set, before interning.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
pub(crate) enum RawToken {
    #[regex(r"#[^\n]*")]
    Comment,

    #[token("\n")]
    #[token(";")]
    Newline,

    // Keywords
    #[token("var", ignore(ascii_case))]
    Var,
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("if", ignore(ascii_case))]
    If,
    #[token("elif", ignore(ascii_case))]
    Elif,
    #[token("else", ignore(ascii_case))]
    Else,
    #[token("for", ignore(ascii_case))]
    For,
    #[token("to", ignore(ascii_case))]
    To,
    #[token("step", ignore(ascii_case))]
    Step,
    #[token("while", ignore(ascii_case))]
    While,
    #[token("fun", ignore(ascii_case))]
    Fun,
    #[token("then", ignore(ascii_case))]
    Then,
    #[token("end", ignore(ascii_case))]
    End,
    #[token("return", ignore(ascii_case))]
    Return,
    #[token("continue", ignore(ascii_case))]
    Continue,
    #[token("break", ignore(ascii_case))]
    Break,
    #[token("embed", ignore(ascii_case))]
    Embed,
    #[token("with", ignore(ascii_case))]
    With,
    #[token("ai", ignore(ascii_case))]
    Ai,
    #[token("pipe", ignore(ascii_case))]
    PipeKeyword,

    // Operators and punctuation
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("|")]
    Pipe,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Literals
    #[regex(r"[0-9]+(\.[0-9]*)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),
    #[regex(r#""([^"\\]|\\(.|\n))*""#)]
    Text,
    /// A string literal that runs to end of input.
    #[regex(r#""([^"\\]|\\(.|\n))*"#)]
    UnterminatedText,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}
