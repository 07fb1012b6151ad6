use logos::Logos;
use std::ops::Range;

/// The different kinds of tokens that can be produced by the tokenizer.
#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("+")]
    Add,

    #[token("-")]
    Sub,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("^")]
    Exp,

    #[token("!")]
    Factorial,

    #[token("=")]
    Assign,

    #[token(",")]
    Comma,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("[")]
    OpenSquare,

    #[token("]")]
    CloseSquare,

    #[regex(r"([0-9]+(\.[0-9]*)?|\.[0-9]+)[eE][+-]?[0-9]+")]
    Scientific,

    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+")]
    Number,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,

    /// Adjacent fragments that do not form a valid literal, merged by the preprocessor. The
    /// tokenizer never produces this kind.
    Word,

    #[regex(r".", priority = 0)]
    Symbol,
}

impl TokenKind {
    /// Returns true if the token is a number literal.
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::Number | TokenKind::Scientific)
    }

    /// Returns true if the token is an identifier, or a fragment that will be read as one.
    pub fn is_identifier(self) -> bool {
        matches!(self, TokenKind::Name | TokenKind::Word | TokenKind::Symbol)
    }

    /// Returns true if the token closes a parenthesis or square bracket.
    pub fn is_closer(self) -> bool {
        matches!(self, TokenKind::CloseParen | TokenKind::CloseSquare)
    }
}

/// A token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'source> {
    /// The region of the source code that this token originated from.
    pub span: Range<usize>,

    /// The kind of token.
    pub kind: TokenKind,

    /// The raw lexeme that was parsed into this token.
    pub lexeme: &'source str,
}
