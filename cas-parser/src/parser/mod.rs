//! The operator-precedence evaluator.
//!
//! Input is evaluated in a single left-to-right scan over the preprocessed tokens, using an
//! operator stack and an output stack. Operands are evaluated as soon as they are read, and
//! every operator is applied through the rewrite engine as soon as its precedence allows, so the
//! parser never builds a syntax tree: the output stack holds canonical expressions at all times.

pub mod error;
pub mod op;
pub mod preprocess;

use cas_compute::{
    consts,
    ctxt::Ctxt,
    error::kind::{DimensionMismatch, IndexOutOfBounds, InvalidOperands},
    funcs,
    rational::Rational,
    symbolic::Expr,
    value::Value,
};
use error::{
    kind::{
        InvalidNumber,
        InvalidPrefixOperator,
        UnexpectedEof,
        UnexpectedToken,
        UnmatchedBracket,
        UnmatchedParenthesis,
    },
    Error,
};
use op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};
use preprocess::{preprocess, Stripped};
use std::{collections::HashMap, ops::Range};
use tracing::debug;
use crate::tokenizer::{Token, TokenKind};

/// The tokens that can follow an operand.
const OPERATORS: &[TokenKind] = &[
    TokenKind::Add,
    TokenKind::Sub,
    TokenKind::Mul,
    TokenKind::Div,
    TokenKind::Exp,
    TokenKind::Comma,
];

/// The tokens that can start an operand.
const OPERANDS: &[TokenKind] = &[
    TokenKind::Number,
    TokenKind::Scientific,
    TokenKind::Name,
    TokenKind::OpenParen,
    TokenKind::OpenSquare,
    TokenKind::Add,
    TokenKind::Sub,
];

/// The kind of an open bracket waiting on the operator stack.
#[derive(Debug, Clone, PartialEq)]
enum GroupKind<'source> {
    /// A grouping parenthesis, `(a)`.
    Paren,

    /// The argument list of a function call, `f(a, b)`.
    Call {
        name: &'source str,
        span: Range<usize>,
    },

    /// A vector literal, `[a, b]`. A vector of vectors is a matrix.
    Vector,

    /// An index into the preceding vector or matrix, `v[i]`.
    Index,
}

impl GroupKind<'_> {
    fn is_square(&self) -> bool {
        matches!(self, GroupKind::Vector | GroupKind::Index)
    }

    fn opener(&self) -> &'static str {
        if self.is_square() {
            "["
        } else {
            "("
        }
    }

    /// Returns true if the brackets may be empty.
    fn allows_empty(&self) -> bool {
        matches!(self, GroupKind::Call { .. } | GroupKind::Vector)
    }
}

/// An open bracket on the operator stack.
#[derive(Debug, Clone, PartialEq)]
struct Group<'source> {
    kind: GroupKind<'source>,

    /// The region of the source code of the opening bracket.
    span: Range<usize>,

    /// The length of the output stack when the bracket was opened.
    output_len: usize,
}

/// An item on the operator stack.
#[derive(Debug, Clone, PartialEq)]
enum StackItem<'source> {
    Binary(BinOp),
    Unary(UnaryOp),
    Open(Group<'source>),
}

/// Evaluates input in a context. This is the type to use to evaluate an arbitrary expression
/// into a [`Value`].
///
/// ```
/// use cas_compute::ctxt::Ctxt;
/// use cas_parser::Parser;
///
/// let ctxt = Ctxt::default();
/// let value = Parser::new(&ctxt).parse("2x + 3x").unwrap();
/// assert_eq!(value.to_string(), "5*x");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    ctxt: &'a Ctxt,
}

impl<'a> Parser<'a> {
    /// Creates a parser that evaluates in the given context.
    pub fn new(ctxt: &'a Ctxt) -> Self {
        Self { ctxt }
    }

    /// Evaluates the input.
    pub fn parse(&self, input: &str) -> Result<Value, Error> {
        self.parse_with(input, &HashMap::new())
    }

    /// Evaluates the input, substituting the given values for names before the context's
    /// variables are consulted.
    pub fn parse_with(&self, input: &str, subs: &HashMap<String, Value>) -> Result<Value, Error> {
        let source = Stripped::new(input);
        let tokens = preprocess(&source);
        self.evaluate_tokens(&tokens, subs, source.eof_span())
    }

    /// Evaluates preprocessed tokens.
    fn evaluate_tokens(
        &self,
        tokens: &[Token],
        subs: &HashMap<String, Value>,
        eof: Range<usize>,
    ) -> Result<Value, Error> {
        let mut evaluator = Evaluator {
            ctxt: self.ctxt,
            subs,
            output: Vec::new(),
            stack: Vec::new(),
            pending_call: None,
            expect_operand: true,
            eof,
        };

        for (i, token) in tokens.iter().enumerate() {
            evaluator.token(token, tokens.get(i + 1))?;
        }
        evaluator.finish()
    }
}

/// Evaluates the input with a default context.
///
/// ```
/// use cas_parser::parse;
///
/// assert_eq!(parse("2+3*4").unwrap().to_string(), "14");
/// assert_eq!(parse("1/2+1/3").unwrap().to_string(), "5/6");
/// assert_eq!(parse("-2^2").unwrap().to_string(), "-4");
/// ```
pub fn parse(input: &str) -> Result<Value, Error> {
    let ctxt = Ctxt::default();
    Parser::new(&ctxt).parse(input)
}

/// Evaluates one line of input in the context. A line of the form `name = expr` assigns the value
/// of `expr` to the variable `name`; any other line is evaluated and stored in the context's list
/// of expressions.
///
/// ```
/// use cas_compute::ctxt::Ctxt;
/// use cas_parser::evaluate;
///
/// let mut ctxt = Ctxt::default();
/// evaluate(&mut ctxt, "a = 2").unwrap();
/// assert_eq!(evaluate(&mut ctxt, "a^3").unwrap().to_string(), "8");
/// assert_eq!(ctxt.expressions().len(), 1);
/// ```
pub fn evaluate(ctxt: &mut Ctxt, input: &str) -> Result<Value, Error> {
    let source = Stripped::new(input);
    let tokens = preprocess(&source);
    let subs = HashMap::new();

    match tokens.as_slice() {
        [target, assign, rest @ ..]
            if target.kind.is_identifier() && assign.kind == TokenKind::Assign =>
        {
            let value = Parser::new(ctxt).evaluate_tokens(rest, &subs, source.eof_span())?;
            ctxt.set_var(target.lexeme, value.clone())
                .map_err(|err| err.with_fallback_span(target.span.clone()))?;
            Ok(value)
        },
        _ => {
            let value = Parser::new(ctxt).evaluate_tokens(&tokens, &subs, source.eof_span())?;
            ctxt.store(value.clone());
            Ok(value)
        },
    }
}

/// The state of a single evaluation.
struct Evaluator<'a, 'source> {
    ctxt: &'a Ctxt,
    subs: &'a HashMap<String, Value>,

    /// Evaluated operands.
    output: Vec<Value>,

    /// Operators and open brackets waiting for their operands.
    stack: Vec<StackItem<'source>>,

    /// A function name read directly before its opening parenthesis.
    pending_call: Option<(&'source str, Range<usize>)>,

    /// True if the next token must start an operand.
    expect_operand: bool,

    /// An empty span at the end of the input.
    eof: Range<usize>,
}

impl<'a, 'source> Evaluator<'a, 'source> {
    /// Reads the next token. `next` is the token after it, if there is one.
    fn token(&mut self, token: &Token<'source>, next: Option<&Token<'source>>) -> Result<(), Error> {
        match token.kind {
            TokenKind::Number | TokenKind::Scientific => {
                self.operand_position(token)?;
                let number = token.lexeme.parse::<Rational>().map_err(|_| {
                    Error::new(vec![token.span.clone()], InvalidNumber { lexeme: token.lexeme.to_string() })
                })?;
                self.push_operand(Value::Expr(Expr::number(number)));
            },
            TokenKind::Name | TokenKind::Word | TokenKind::Symbol => {
                self.operand_position(token)?;
                if next.map(|next| next.kind) == Some(TokenKind::OpenParen) {
                    self.pending_call = Some((token.lexeme, token.span.clone()));
                } else {
                    let value = self.resolve(token)?;
                    self.push_operand(value);
                }
            },
            TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Div
                | TokenKind::Exp
                | TokenKind::Comma => self.operator(token)?,
            TokenKind::OpenParen => {
                self.operand_position(token)?;
                let kind = match self.pending_call.take() {
                    Some((name, span)) => GroupKind::Call { name, span },
                    None => GroupKind::Paren,
                };
                self.open(kind, token.span.clone());
            },
            TokenKind::OpenSquare => {
                let kind = if self.expect_operand {
                    GroupKind::Vector
                } else {
                    GroupKind::Index
                };
                self.open(kind, token.span.clone());
            },
            TokenKind::CloseParen | TokenKind::CloseSquare => self.close(token)?,
            TokenKind::Factorial | TokenKind::Assign | TokenKind::Whitespace => {
                let expected = if self.expect_operand { OPERANDS } else { OPERATORS };
                return Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                    expected,
                    found: token.kind,
                }));
            },
        }

        Ok(())
    }

    /// Fails if the token starts an operand, but an operator was expected.
    fn operand_position(&self, token: &Token) -> Result<(), Error> {
        if self.expect_operand {
            Ok(())
        } else {
            Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                expected: OPERATORS,
                found: token.kind,
            }))
        }
    }

    fn push_operand(&mut self, value: Value) {
        self.output.push(value);
        self.expect_operand = false;
    }

    fn pop_operand(&mut self, span: &Range<usize>) -> Result<Value, Error> {
        self.output
            .pop()
            .ok_or_else(|| Error::new(vec![span.clone()], UnexpectedEof))
    }

    /// Resolves a name: substitutions first, then variables of the context, then constants.
    /// Anything else becomes a new variable.
    fn resolve(&self, token: &Token) -> Result<Value, Error> {
        let name = token.lexeme;
        if let Some(value) = self.subs.get(name).or_else(|| self.ctxt.get_var(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = consts::get(name) {
            return Ok(Value::Expr(Expr::number(value)));
        }

        Expr::variable(name)
            .map(Value::Expr)
            .map_err(|err| err.with_fallback_span(token.span.clone()))
    }

    /// Reads a binary operator, or a prefix operator if there is no left operand.
    fn operator(&mut self, token: &Token) -> Result<(), Error> {
        let Some(kind) = BinOpKind::from_token(token.kind) else {
            return Err(Error::new(vec![token.span.clone()], UnexpectedToken {
                expected: OPERATORS,
                found: token.kind,
            }));
        };

        if self.expect_operand {
            let Some(prefix) = kind.prefix() else {
                return Err(Error::new(vec![token.span.clone()], InvalidPrefixOperator {
                    op: kind.symbol(),
                }));
            };
            self.stack.push(StackItem::Unary(UnaryOp { kind: prefix, span: token.span.clone() }));
            return Ok(());
        }

        self.reduce(|top| kind.yields_to(top))?;
        self.stack.push(StackItem::Binary(BinOp { kind, span: token.span.clone() }));
        self.expect_operand = true;
        Ok(())
    }

    /// Applies operators from the top of the stack while `applies` accepts their precedence,
    /// stopping at an open bracket.
    fn reduce(&mut self, applies: impl Fn(op::Precedence) -> bool) -> Result<(), Error> {
        loop {
            let precedence = match self.stack.last() {
                Some(StackItem::Binary(op)) => op.kind.precedence(),
                Some(StackItem::Unary(op)) => op.precedence(),
                Some(StackItem::Open(_)) | None => return Ok(()),
            };
            if !applies(precedence) {
                return Ok(());
            }

            match self.stack.pop() {
                Some(StackItem::Binary(op)) => self.apply_binary(op)?,
                Some(StackItem::Unary(op)) => self.apply_unary(op)?,
                _ => return Ok(()),
            }
        }
    }

    fn apply_unary(&mut self, op: UnaryOp) -> Result<(), Error> {
        let operand = self.pop_operand(&op.span)?;
        let value = match op.kind {
            UnaryOpKind::Neg => operand.negate(),
            UnaryOpKind::Pos => operand,
        };
        self.output.push(value);
        Ok(())
    }

    /// Applies a binary operator to the top two operands. In suppress-errors mode, an operation
    /// on incompatible vectors or matrices leaves the left operand unchanged.
    fn apply_binary(&mut self, op: BinOp) -> Result<(), Error> {
        let rhs = self.pop_operand(&op.span)?;
        let lhs = self.pop_operand(&op.span)?;
        debug!(op = op.kind.symbol(), %lhs, %rhs, "applying operator");

        let settings = &self.ctxt.settings;
        let fallback = settings.suppress_errors.then(|| lhs.clone());
        let result = match op.kind {
            BinOpKind::Add => lhs.add(rhs),
            BinOpKind::Sub => lhs.sub(rhs),
            BinOpKind::Mul => lhs.mul(rhs, settings),
            BinOpKind::Div => lhs.div(rhs, settings),
            BinOpKind::Exp => lhs.pow(rhs, settings),
            BinOpKind::Comma => Ok(lhs.comma(rhs)),
        };

        let value = match (result, fallback) {
            (Ok(value), _) => value,
            (Err(err), Some(lhs))
                if err.is::<DimensionMismatch>() || err.is::<InvalidOperands>() =>
            {
                debug!(error = %err, "suppressed error, keeping left operand");
                lhs
            },
            (Err(err), _) => return Err(err.with_fallback_span(op.span)),
        };
        self.output.push(value);
        Ok(())
    }

    fn open(&mut self, kind: GroupKind<'source>, span: Range<usize>) {
        self.stack.push(StackItem::Open(Group { kind, span, output_len: self.output.len() }));
        self.expect_operand = true;
    }

    /// Reads a closing bracket. A closer without an opener, or one of the wrong shape, is
    /// ignored or matched anyway in suppress-errors mode.
    fn close(&mut self, token: &Token) -> Result<(), Error> {
        let square = token.kind == TokenKind::CloseSquare;
        let innermost = self.stack.iter().rev().find_map(|item| match item {
            StackItem::Open(group) => Some(group),
            _ => None,
        });

        let settings = &self.ctxt.settings;
        match innermost {
            None => {
                settings.recover(Error::new(vec![token.span.clone()], UnmatchedBracket {
                    opened: None,
                }))?;
                return Ok(());
            },
            Some(group) if group.kind.is_square() != square => {
                settings.recover(Error::new(vec![token.span.clone()], UnmatchedBracket {
                    opened: Some(group.kind.opener()),
                }))?;
            },
            Some(_) => (),
        }

        self.end_group(Some(token), token.span.clone())
    }

    /// Closes the innermost open bracket, applying the operators inside it. `closer` is the
    /// closing token, or [`None`] at the end of the input.
    fn end_group(&mut self, closer: Option<&Token>, end: Range<usize>) -> Result<(), Error> {
        if self.expect_operand {
            let empty = matches!(self.stack.last(), Some(StackItem::Open(group)) if group.kind.allows_empty());
            if !empty {
                return Err(match closer {
                    Some(token) => Error::new(vec![token.span.clone()], UnexpectedToken {
                        expected: OPERANDS,
                        found: token.kind,
                    }),
                    None => Error::new(vec![self.eof.clone()], UnexpectedEof),
                });
            }
        }

        self.reduce(|_| true)?;
        let group = match self.stack.pop() {
            Some(StackItem::Open(group)) => group,
            _ => return Err(Error::new(vec![end], UnmatchedBracket { opened: None })),
        };

        let inner = if self.output.len() > group.output_len {
            self.output.pop()
        } else {
            None
        };
        let span = group.span.start..end.end;

        let value = match group.kind {
            GroupKind::Paren => match inner {
                Some(value) => value,
                None => return Err(Error::new(vec![span], UnexpectedEof)),
            },
            GroupKind::Call { name, span: name_span } => {
                let args = arguments(inner);
                debug!(name, args = args.len(), "calling function");
                funcs::call(name, args, self.ctxt)
                    .map_err(|err| err.with_fallback_span(name_span.start..end.end))?
            },
            GroupKind::Vector => {
                let args = arguments(inner);
                let rows = !args.is_empty() && args.iter().all(|arg| matches!(arg, Value::Vector(_)));
                let name = if rows { "matrix" } else { "vector" };
                funcs::call(name, args, self.ctxt).map_err(|err| err.with_fallback_span(span))?
            },
            GroupKind::Index => {
                let base = self.pop_operand(&group.span)?;
                let index = match inner {
                    Some(index) => index,
                    None => return Err(Error::new(vec![span], UnexpectedEof)),
                };
                index_into(base, index).map_err(|err| err.with_fallback_span(span))?
            },
        };

        self.push_operand(value);
        Ok(())
    }

    /// Applies every remaining operator. An unclosed bracket fails, or is closed in
    /// suppress-errors mode.
    fn finish(mut self) -> Result<Value, Error> {
        while let Some(group) = self.stack.iter().rev().find_map(|item| match item {
            StackItem::Open(group) => Some(group.clone()),
            _ => None,
        }) {
            self.ctxt.settings.recover(Error::new(vec![group.span], UnmatchedParenthesis {
                square: group.kind.is_square(),
            }))?;
            self.end_group(None, self.eof.clone())?;
        }

        if self.expect_operand {
            return Err(Error::new(vec![self.eof.clone()], UnexpectedEof));
        }

        self.reduce(|_| true)?;
        let eof = self.eof.clone();
        self.pop_operand(&eof)
    }
}

/// Splits the contents of a bracket into arguments.
fn arguments(inner: Option<Value>) -> Vec<Value> {
    match inner {
        None => Vec::new(),
        Some(Value::List(values)) => values,
        Some(value) => vec![value],
    }
}

/// Indexes a vector or matrix with a 1-based index. Indexing a matrix returns a row.
fn index_into(base: Value, index: Value) -> Result<Value, Error> {
    let position = index
        .as_expr()
        .filter(|expr| expr.is_integer())
        .and_then(|expr| expr.multiplier().numer().to_usize());

    match (base, position) {
        (Value::Vector(vector), Some(i)) => vector.get(i).cloned().map(Value::Expr),
        (Value::Matrix(matrix), Some(i)) => matrix.row(i).map(Value::Vector),
        (Value::Vector(vector), None) => Err(Error::spanless(IndexOutOfBounds {
            index: index.to_string(),
            len: vector.len(),
        })),
        (Value::Matrix(matrix), None) => Err(Error::spanless(IndexOutOfBounds {
            index: index.to_string(),
            len: matrix.rows(),
        })),
        (base, _) => Err(Error::spanless(InvalidOperands {
            op: "[]",
            left: base.typename(),
            right: index.typename(),
        })),
    }
}
