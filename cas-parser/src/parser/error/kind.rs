use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{ErrorKind, EXPR};
use crate::tokenizer::TokenKind;

/// The end of the source code was reached unexpectedly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected end of input",
    labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
)]
pub struct UnexpectedEof;

/// An unexpected token was encountered.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unexpected token",
    labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
    help = format!("found {:?}", found),
)]
pub struct UnexpectedToken {
    /// The token(s) that were expected.
    pub expected: &'static [TokenKind],

    /// The token that was found.
    pub found: TokenKind,
}

/// A closing bracket has no matching opening bracket, or closes a bracket of the other shape.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unmatched closing bracket",
    labels = ["this bracket"],
    help = match opened {
        Some(opener) => format!("the innermost open group was opened with `{}`", opener.fg(EXPR)),
        None => "there is no opening bracket for this one to close".to_string(),
    },
)]
pub struct UnmatchedBracket {
    /// The opening bracket of the innermost open group, if there is one.
    pub opened: Option<&'static str>,
}

/// An opening bracket was never closed.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "unclosed parenthesis",
    labels = ["this bracket is never closed"],
    help = format!("add a closing `{}` at the end", (if *square { "]" } else { ")" }).fg(EXPR)),
)]
pub struct UnmatchedParenthesis {
    /// Whether the bracket is a square bracket.
    pub square: bool,
}

/// A binary-only operator was used where an operand was expected.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid prefix operator", op),
    labels = ["this operator has no left operand"],
    help = format!("only `{}` and `{}` can be used without a left operand", "+".fg(EXPR), "-".fg(EXPR)),
)]
pub struct InvalidPrefixOperator {
    /// The operator.
    pub op: &'static str,
}

/// A number literal cannot be represented exactly.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("invalid number literal `{}`", lexeme),
    labels = ["this number"],
    help = "the exponent of a number in scientific notation is too large",
)]
pub struct InvalidNumber {
    /// The literal as written.
    pub lexeme: String,
}
