//! The result of evaluating an expression: an [`Expr`], a vector, a matrix, or a list of values.
//!
//! Arithmetic on values dispatches on the kinds of both operands. Expressions combine through
//! the rewrite engine, vectors and matrices of the same shape combine element by element, and an
//! expression combined with a vector or matrix is broadcast over its elements. Any other pairing
//! fails with [`InvalidOperands`].

use cas_error::Error;
use std::fmt::{self, Display, Formatter};
use crate::{
    ctxt::Settings,
    error::kind::InvalidOperands,
    linalg::{Matrix, Vector},
    symbolic::{
        ops::{add, divide, multiply, pow, subtract},
        Expr,
    },
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value produced by evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// A scalar expression.
    Expr(Expr),

    /// A vector of expressions.
    Vector(Vector),

    /// A matrix of expressions.
    Matrix(Matrix),

    /// A comma-separated list of values.
    List(Vec<Value>),
}

impl From<Expr> for Value {
    fn from(expr: Expr) -> Self {
        Value::Expr(expr)
    }
}

impl Value {
    /// The name of the kind of value, used in error messages.
    pub fn typename(&self) -> &'static str {
        match self {
            Value::Expr(_) => "Expression",
            Value::Vector(_) => "Vector",
            Value::Matrix(_) => "Matrix",
            Value::List(_) => "List",
        }
    }

    /// Returns the expression, if this value is one.
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Converts the value into an expression, if it is one.
    pub fn into_expr(self) -> Option<Expr> {
        match self {
            Value::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    /// Applies a binary operation element-wise, broadcasting scalars over vectors and matrices.
    fn broadcast(
        self,
        rhs: Value,
        op: &'static str,
        f: impl Fn(Expr, Expr) -> Result<Expr, Error>,
    ) -> Result<Value, Error> {
        match (self, rhs) {
            (Value::Expr(a), Value::Expr(b)) => Ok(Value::Expr(f(a, b)?)),
            (Value::Vector(a), Value::Vector(b)) => Ok(Value::Vector(a.zip_with(b, &f)?)),
            (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.zip_with(b, &f)?)),
            (Value::Vector(v), Value::Expr(s)) => Ok(Value::Vector(v.map(|e| f(e, s.clone()))?)),
            (Value::Expr(s), Value::Vector(v)) => Ok(Value::Vector(v.map(|e| f(s.clone(), e))?)),
            (Value::Matrix(m), Value::Expr(s)) => Ok(Value::Matrix(m.map(|e| f(e, s.clone()))?)),
            (Value::Expr(s), Value::Matrix(m)) => Ok(Value::Matrix(m.map(|e| f(s.clone(), e))?)),
            (a, b) => Err(Error::spanless(InvalidOperands {
                op,
                left: a.typename(),
                right: b.typename(),
            })),
        }
    }

    /// Adds two values.
    pub fn add(self, rhs: Value) -> Result<Value, Error> {
        self.broadcast(rhs, "+", |a, b| Ok(add(a, b)))
    }

    /// Subtracts `rhs` from this value.
    pub fn sub(self, rhs: Value) -> Result<Value, Error> {
        self.broadcast(rhs, "-", |a, b| Ok(subtract(a, b)))
    }

    /// Multiplies two values. Two matrices, or a matrix and a vector, are multiplied as
    /// matrices; everything else is multiplied element-wise.
    pub fn mul(self, rhs: Value, settings: &Settings) -> Result<Value, Error> {
        match (self, rhs) {
            (Value::Matrix(a), Value::Matrix(b)) => Ok(Value::Matrix(a.multiply(&b, settings)?)),
            (Value::Matrix(a), Value::Vector(v)) => Ok(Value::Vector(a.apply(v, settings)?)),
            (a, b) => a.broadcast(b, "*", |a, b| multiply(a, b, settings)),
        }
    }

    /// Divides this value by `rhs`.
    pub fn div(self, rhs: Value, settings: &Settings) -> Result<Value, Error> {
        self.broadcast(rhs, "/", |a, b| divide(a, b, settings))
    }

    /// Raises this value to the power of `rhs`. Vectors are raised element-wise to an expression;
    /// nothing can be raised to a vector, and matrices cannot be raised.
    pub fn pow(self, rhs: Value, settings: &Settings) -> Result<Value, Error> {
        match (self, rhs) {
            (a @ (Value::Expr(_) | Value::Vector(_)), b @ Value::Expr(_)) => {
                a.broadcast(b, "^", |a, b| pow(a, b, settings))
            },
            (a, b) => Err(Error::spanless(InvalidOperands {
                op: "^",
                left: a.typename(),
                right: b.typename(),
            })),
        }
    }

    /// Negates the value, element-wise for vectors, matrices and lists.
    pub fn negate(self) -> Value {
        match self {
            Value::Expr(expr) => Value::Expr(expr.negate()),
            Value::Vector(v) => Value::Vector(v.map(|e| Ok(e.negate())).unwrap_or_default()),
            Value::Matrix(m) => Value::Matrix(m.map(|e| Ok(e.negate())).unwrap_or_default()),
            Value::List(values) => Value::List(values.into_iter().map(Value::negate).collect()),
        }
    }

    /// Joins two values into a list, extending the left operand if it already is one.
    pub fn comma(self, rhs: Value) -> Value {
        match self {
            Value::List(mut values) => {
                values.push(rhs);
                Value::List(values)
            },
            lhs => Value::List(vec![lhs, rhs]),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Expr(expr) => write!(f, "{}", expr),
            Value::Vector(v) => write!(f, "{}", v),
            Value::Matrix(m) => write!(f, "{}", m),
            Value::List(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value)?;
                }
                Ok(())
            },
        }
    }
}
