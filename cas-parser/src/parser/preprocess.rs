//! Rewrites raw input into the token stream read by the evaluator.
//!
//! All whitespace is removed before tokenizing, so `x y` is the single name `xy` and `2 x` is
//! `2x`. The token spans still point into the original input. The token stream is then rewritten
//! in three passes:
//!
//! 1. Adjacent fragments that cannot be read on their own, such as the name and symbol in `x$`,
//!    are merged into one [`TokenKind::Word`].
//! 2. `a!` is rewritten into the call `fact(a)`, where `a` is the operand directly before the `!`.
//! 3. Implicit multiplication is inserted after a number or a closing bracket, so `2x(y)(z)` reads
//!    as `2*x(y)*(z)`.

use std::ops::Range;
use tracing::debug;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};

/// The function that `a!` is rewritten into.
pub const FACT: &str = "fact";

/// The input with its whitespace removed, and a map from the stripped text back to the input.
#[derive(Debug, Clone)]
pub struct Stripped {
    text: String,

    /// The offset in the input of each byte of the stripped text.
    offsets: Vec<usize>,

    /// The length of the input.
    len: usize,
}

impl Stripped {
    /// Strips the whitespace from the input.
    pub fn new(input: &str) -> Self {
        let mut text = String::with_capacity(input.len());
        let mut offsets = Vec::with_capacity(input.len());
        for (i, c) in input.char_indices().filter(|(_, c)| !c.is_whitespace()) {
            text.push(c);
            offsets.extend(i..i + c.len_utf8());
        }

        Self { text, offsets, len: input.len() }
    }

    /// The stripped text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Maps a span of the stripped text onto the input.
    pub fn original_span(&self, span: Range<usize>) -> Range<usize> {
        let start = self.offsets.get(span.start).copied().unwrap_or(self.len);
        let end = match span.end.checked_sub(1).and_then(|last| self.offsets.get(last)) {
            Some(&last) if span.end > span.start => last + 1,
            _ => start,
        };
        start..end
    }

    /// An empty span at the end of the input.
    pub fn eof_span(&self) -> Range<usize> {
        self.len..self.len
    }
}

/// Tokenizes the stripped input and applies every rewriting pass.
pub fn preprocess(source: &Stripped) -> Vec<Token<'_>> {
    let text = source.as_str();
    let tokens = merge_fragments(text, &tokenize_complete(text))
        .into_iter()
        .map(|token| Token { span: source.original_span(token.span.clone()), ..token })
        .collect();
    let tokens = insert_implicit_mul(rewrite_factorials(tokens));

    debug!(tokens = ?tokens.iter().map(|token| token.lexeme).collect::<Vec<_>>(), "preprocessed input");
    tokens
}

/// Returns true if the fragment `next`, written directly after `prev`, is part of the same word.
fn continues_word(prev: TokenKind, next: TokenKind) -> bool {
    let fragment = |kind: TokenKind| kind.is_number() || kind.is_identifier();
    if !fragment(prev) || !fragment(next) {
        return false;
    }

    match (prev, next) {
        (_, TokenKind::Symbol) | (TokenKind::Symbol | TokenKind::Word, _) => true,

        // `x.5`
        (TokenKind::Name, _) => next.is_number(),

        // a coefficient, `2x`
        (_, TokenKind::Name) => false,

        // `1.5.2`
        _ => true,
    }
}

/// Merges runs of fragments into words.
fn merge_fragments<'source>(text: &'source str, tokens: &[Token<'source>]) -> Vec<Token<'source>> {
    let mut merged: Vec<Token<'source>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        match merged.last_mut() {
            Some(last) if continues_word(last.kind, token.kind) => {
                last.span.end = token.span.end;
                last.kind = TokenKind::Word;
                last.lexeme = &text[last.span.clone()];
            },
            _ => merged.push(token.clone()),
        }
    }
    merged
}

/// Returns the index of the first token of the operand that ends the stream, if the stream ends
/// with one. A bracketed operand includes the name of the function called or indexed with it.
fn operand_start(tokens: &[Token]) -> Option<usize> {
    let last = tokens.len().checked_sub(1)?;
    let kind = tokens[last].kind;
    if kind.is_number() || kind.is_identifier() {
        return Some(last);
    }
    if !kind.is_closer() {
        return None;
    }

    let mut depth = 0usize;
    for i in (0..=last).rev() {
        match tokens[i].kind {
            TokenKind::CloseParen | TokenKind::CloseSquare => depth += 1,
            TokenKind::OpenParen | TokenKind::OpenSquare => {
                depth -= 1;
                if depth == 0 {
                    let named = i > 0 && tokens[i - 1].kind.is_identifier();
                    return Some(if named { i - 1 } else { i });
                }
            },
            _ => (),
        }
    }
    None
}

/// Rewrites `a!` into `fact(a)`. A `!` with no operand before it is left alone.
fn rewrite_factorials(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind == TokenKind::Factorial {
            if let Some(start) = operand_start(&out) {
                let span = token.span;
                out.insert(start, Token { span: span.clone(), kind: TokenKind::Name, lexeme: FACT });
                out.insert(start + 1, Token { span: span.clone(), kind: TokenKind::OpenParen, lexeme: "(" });
                out.push(Token { span, kind: TokenKind::CloseParen, lexeme: ")" });
                continue;
            }
        }
        out.push(token);
    }
    out
}

/// Returns true if a multiplication is implied between the two tokens.
fn implies_mul(prev: TokenKind, next: TokenKind) -> bool {
    if prev.is_number() {
        next.is_identifier() || matches!(next, TokenKind::OpenParen | TokenKind::OpenSquare)
    } else if prev.is_closer() {
        next.is_identifier() || next.is_number() || next == TokenKind::OpenParen
    } else {
        false
    }
}

/// Inserts the implied multiplications.
fn insert_implicit_mul(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(prev) = out.last() {
            if implies_mul(prev.kind, token.kind) {
                let span = prev.span.end..token.span.start.max(prev.span.end);
                out.push(Token { span, kind: TokenKind::Mul, lexeme: "*" });
            }
        }
        out.push(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lexemes(input: &str) -> Vec<String> {
        let source = Stripped::new(input);
        preprocess(&source).into_iter().map(|token| token.lexeme.to_string()).collect()
    }

    #[test]
    fn strips_whitespace() {
        assert_eq!(lexemes("1 +  2"), ["1", "+", "2"]);
        assert_eq!(lexemes("x y"), ["xy"]);
    }

    #[test]
    fn spans_point_into_input() {
        let source = Stripped::new("x  y + 10");
        let tokens = preprocess(&source);
        assert_eq!(tokens[0].span, 0..4);
        assert_eq!(tokens[1].span, 5..6);
        assert_eq!(tokens[2].span, 7..9);
        assert_eq!(source.eof_span(), 9..9);
    }

    #[test]
    fn merges_invalid_fragments() {
        assert_eq!(lexemes("3x$+1"), ["3", "*", "x$", "+", "1"]);
        assert_eq!(lexemes("x.5"), ["x.5"]);

        let source = Stripped::new("3x$");
        let tokens = preprocess(&source);
        assert_eq!(tokens[2].kind, TokenKind::Word);
        assert_eq!(tokens[2].span, 1..3);
    }

    #[test]
    fn factorials() {
        assert_eq!(lexemes("3!"), ["fact", "(", "3", ")"]);
        assert_eq!(lexemes("2^3!"), ["2", "^", "fact", "(", "3", ")"]);
        assert_eq!(lexemes("(x+1)!"), ["fact", "(", "(", "x", "+", "1", ")", ")"]);
        assert_eq!(lexemes("sin(x)!"), ["fact", "(", "sin", "(", "x", ")", ")"]);
        assert_eq!(lexemes("3!!"), ["fact", "(", "fact", "(", "3", ")", ")"]);
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(lexemes("2x"), ["2", "*", "x"]);
        assert_eq!(lexemes("2(x)"), ["2", "*", "(", "x", ")"]);
        assert_eq!(lexemes("(x)(y)"), ["(", "x", ")", "*", "(", "y", ")"]);
        assert_eq!(lexemes("(x)2"), ["(", "x", ")", "*", "2"]);
        assert_eq!(lexemes("2x!"), ["2", "*", "fact", "(", "x", ")"]);
    }

    #[test]
    fn indexing_is_not_multiplication() {
        assert_eq!(lexemes("v[1]"), ["v", "[", "1", "]"]);
        assert_eq!(lexemes("(v)[1]"), ["(", "v", ")", "[", "1", "]"]);
    }

    #[test]
    fn scientific_literals() {
        assert_eq!(lexemes("2e3x"), ["2e3", "*", "x"]);
        assert_eq!(lexemes("1.5E-2 + 1"), ["1.5E-2", "+", "1"]);
    }
}
