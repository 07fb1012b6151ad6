//! Structs to help evaluate binary and unary operators.

use std::ops::Range;
use crate::tokenizer::TokenKind;

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// The operation is left-associative: `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// The operation is right-associative: `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Precedence of the argument separator (`,`).
    Comma,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of the prefix operators (`-x`, `+x`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,
}

/// The binary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpKind {
    Exp,
    Mul,
    Div,
    Add,
    Sub,
    Comma,
}

impl BinOpKind {
    /// Returns the binary operation represented by the token, if there is one.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Exp => Some(Self::Exp),
            TokenKind::Mul => Some(Self::Mul),
            TokenKind::Div => Some(Self::Div),
            TokenKind::Add => Some(Self::Add),
            TokenKind::Sub => Some(Self::Sub),
            TokenKind::Comma => Some(Self::Comma),
            _ => None,
        }
    }

    /// Returns the precedence of the binary operation.
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Exp => Precedence::Exp,
            Self::Mul | Self::Div => Precedence::Factor,
            Self::Add | Self::Sub => Precedence::Term,
            Self::Comma => Precedence::Comma,
        }
    }

    /// Returns the associativity of the binary operation.
    pub fn associativity(self) -> Associativity {
        match self {
            Self::Exp => Associativity::Right,
            Self::Mul | Self::Div | Self::Add | Self::Sub | Self::Comma => Associativity::Left,
        }
    }

    /// The symbol of the operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Exp => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Comma => ",",
        }
    }

    /// Returns the prefix form of the operator, if it can be used without a left operand.
    pub fn prefix(self) -> Option<UnaryOpKind> {
        match self {
            Self::Add => Some(UnaryOpKind::Pos),
            Self::Sub => Some(UnaryOpKind::Neg),
            _ => None,
        }
    }

    /// Returns true if an operation of precedence `top`, waiting on the operator stack, must be
    /// evaluated before this operator is pushed on top of it.
    pub fn yields_to(self, top: Precedence) -> bool {
        match self.associativity() {
            Associativity::Left => top >= self.precedence(),
            Associativity::Right => top > self.precedence(),
        }
    }
}

/// A binary operator that takes two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    /// The kind of binary operator.
    pub kind: BinOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

/// The unary operation that is being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
    Pos,
}

/// A prefix operator, waiting on the operator stack for its operand.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    /// The kind of unary operator.
    pub kind: UnaryOpKind,

    /// The region of the source code that this operator was parsed from.
    pub span: Range<usize>,
}

impl UnaryOp {
    /// Returns the precedence of the unary operator. Prefixes bind looser than `^`, so `-2^2` is
    /// `-(2^2)`.
    pub fn precedence(&self) -> Precedence {
        Precedence::Neg
    }
}
