//! The table of built-in functions, and dispatch of function calls.
//!
//! Every built-in declares how many arguments it accepts and which handler evaluates it. Calls
//! are checked against the declared arity before they are dispatched; in suppress-errors mode, a
//! call with the wrong number of arguments is kept as a symbolic application instead.
//!
//! Functions with a [`Handler::Numeric`] handler have no symbolic rules. They are evaluated
//! numerically when every argument is a number and numeric-evaluation mode is on, and are kept as
//! symbolic applications otherwise.

pub mod numeric;

use cas_error::Error;
use levenshtein::levenshtein;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::debug;
use crate::{
    ctxt::Ctxt,
    error::kind::{ArityMismatch, InvalidOperands, UnsupportedFunction},
    linalg::{Matrix, Vector},
    symbolic::{
        ops::{abs, divide, log, parens, sqrt, symfunction},
        Expr,
    },
    value::Value,
};

/// How a built-in function is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Numerically, or as a symbolic application. See [`numeric::apply`].
    Numeric,

    /// [`sqrt`].
    Sqrt,

    /// [`log`].
    Log,

    /// [`abs`].
    Abs,

    /// [`parens`].
    Parens,

    /// The reciprocal of an expression, or the inverse of a matrix.
    Invert,

    /// The transpose of a matrix or vector.
    Transpose,

    /// The dot product of two vectors.
    Dot,

    /// Builds a vector from the arguments.
    Vector,

    /// Builds a matrix from vector arguments, one per row.
    Matrix,
}

/// A built-in function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Builtin {
    /// The name of the function.
    pub name: &'static str,

    /// The minimum number of arguments.
    pub min: usize,

    /// The maximum number of arguments, or [`None`] if the function is variadic.
    pub max: Option<usize>,

    /// How the function is evaluated.
    pub handler: Handler,
}

static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    macro_rules! build {
        ($($name:literal ($min:literal, $max:expr) $handler:ident),* $(,)?) => {
            [
                $(
                    ($name, Builtin { name: $name, min: $min, max: $max, handler: Handler::$handler }),
                )*
            ]
                .into_iter()
                .collect()
        };
    }

    build! {
        "cos" (1, Some(1)) Numeric,
        "sin" (1, Some(1)) Numeric,
        "tan" (1, Some(1)) Numeric,
        "sec" (1, Some(1)) Numeric,
        "csc" (1, Some(1)) Numeric,
        "cot" (1, Some(1)) Numeric,
        "acos" (1, Some(1)) Numeric,
        "asin" (1, Some(1)) Numeric,
        "atan" (1, Some(1)) Numeric,
        "sinh" (1, Some(1)) Numeric,
        "cosh" (1, Some(1)) Numeric,
        "tanh" (1, Some(1)) Numeric,
        "asinh" (1, Some(1)) Numeric,
        "acosh" (1, Some(1)) Numeric,
        "atanh" (1, Some(1)) Numeric,
        "exp" (1, Some(1)) Numeric,
        "erf" (1, Some(1)) Numeric,
        "floor" (1, Some(1)) Numeric,
        "ceil" (1, Some(1)) Numeric,
        "fact" (1, Some(1)) Numeric,
        "round" (1, Some(1)) Numeric,
        "min" (1, None) Numeric,
        "max" (1, None) Numeric,
        "mod" (2, Some(2)) Numeric,
        "sqrt" (1, Some(1)) Sqrt,
        "log" (1, Some(1)) Log,
        "abs" (1, Some(1)) Abs,
        "parens" (0, None) Parens,
        "invert" (1, Some(1)) Invert,
        "transpose" (1, Some(1)) Transpose,
        "dot" (2, Some(2)) Dot,
        "vector" (0, None) Vector,
        "matrix" (0, None) Matrix,
    }
});

/// Returns the built-in function with the given name.
pub fn get(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

/// Iterates over the names of all built-in functions, in no particular order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.keys().copied()
}

/// Returns the names of built-in functions that are spelled similarly to the given name.
pub fn similar(name: &str) -> Vec<String> {
    let mut names = names()
        .filter(|builtin| levenshtein(builtin, name) < 2)
        .map(str::to_string)
        .collect::<Vec<_>>();
    names.sort();
    names
}

/// Converts the arguments into expressions, failing if any of them is a vector or matrix.
fn into_exprs(args: Vec<Value>) -> Result<Vec<Expr>, Error> {
    args.into_iter()
        .map(|arg| match arg {
            Value::Expr(expr) => Ok(expr),
            other => Err(Error::spanless(InvalidOperands {
                op: "function call",
                left: "Expression",
                right: other.typename(),
            })),
        })
        .collect()
}

/// Takes the single argument of a unary function.
fn single(mut args: Vec<Value>) -> Value {
    args.pop().unwrap_or_else(|| Value::Expr(Expr::zero()))
}

/// Calls the named built-in function with the given arguments.
pub fn call(name: &str, args: Vec<Value>, ctxt: &Ctxt) -> Result<Value, Error> {
    let settings = &ctxt.settings;
    let Some(builtin) = ctxt.builtin(name) else {
        return Err(Error::spanless(UnsupportedFunction {
            name: name.to_string(),
            suggestions: similar(name),
        }));
    };

    let given = args.len();
    if given < builtin.min || builtin.max.map_or(false, |max| given > max) {
        settings.recover(Error::spanless(ArityMismatch {
            name: name.to_string(),
            min: builtin.min,
            max: builtin.max,
            given,
        }))?;
        return Ok(Value::Expr(symfunction(name, into_exprs(args)?)));
    }

    debug!(name, given, handler = ?builtin.handler, "calling builtin");
    let invalid = |op, value: &Value| {
        Error::spanless(InvalidOperands { op, left: value.typename(), right: value.typename() })
    };

    match builtin.handler {
        Handler::Numeric => Ok(Value::Expr(numeric::apply(name, into_exprs(args)?, settings))),
        Handler::Sqrt | Handler::Log | Handler::Abs => {
            let mut args = into_exprs(args)?;
            let arg = args.pop().unwrap_or_default();
            let result = match builtin.handler {
                Handler::Sqrt => sqrt(arg, settings)?,
                Handler::Log => log(arg, settings)?,
                _ => abs(arg, settings)?,
            };
            Ok(Value::Expr(result))
        },
        Handler::Parens => match given {
            0 => Ok(Value::List(Vec::new())),
            1 => match single(args) {
                Value::Expr(expr) => Ok(Value::Expr(parens(expr, settings))),
                other => Ok(other),
            },
            _ => Ok(Value::List(args)),
        },
        Handler::Invert => match single(args) {
            Value::Expr(expr) => Ok(Value::Expr(divide(Expr::one(), expr, settings)?)),
            Value::Matrix(matrix) => Ok(Value::Matrix(matrix.invert(settings)?)),
            other => Err(invalid("invert", &other)),
        },
        Handler::Transpose => match single(args) {
            Value::Matrix(matrix) => Ok(Value::Matrix(matrix.transpose())),
            Value::Vector(vector) => Ok(Value::Matrix(Matrix::column(vector))),
            Value::Expr(expr) => Ok(Value::Expr(expr)),
            other => Err(invalid("transpose", &other)),
        },
        Handler::Dot => {
            let mut args = args.into_iter();
            match (args.next(), args.next()) {
                (Some(Value::Vector(left)), Some(Value::Vector(right))) => {
                    Ok(Value::Expr(left.dot(right, settings)?))
                },
                (Some(left), Some(right)) => Err(Error::spanless(InvalidOperands {
                    op: "dot",
                    left: left.typename(),
                    right: right.typename(),
                })),
                _ => Err(invalid("dot", &Value::List(Vec::new()))),
            }
        },
        Handler::Vector => Ok(Value::Vector(Vector::new(into_exprs(args)?))),
        Handler::Matrix => {
            let rows = args
                .into_iter()
                .map(|arg| match arg {
                    Value::Vector(row) => Ok(row),
                    other => Err(invalid("matrix", &other)),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(Matrix::from_rows(rows)?))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ctxt::Settings, rational::Rational};
    use pretty_assertions::assert_eq;

    fn expr(value: i32) -> Value {
        Value::Expr(Expr::number(value))
    }

    #[test]
    fn unknown_function() {
        let ctxt = Ctxt::default();
        let err = call("sinn", vec![expr(1)], &ctxt).unwrap_err();
        let kind = err.downcast_ref::<UnsupportedFunction>().unwrap();
        assert_eq!(kind.suggestions, vec!["sin".to_string(), "sinh".to_string()]);
    }

    #[test]
    fn arity() {
        let ctxt = Ctxt::default();
        let err = call("sin", vec![expr(1), expr(2)], &ctxt).unwrap_err();
        assert!(err.is::<ArityMismatch>());

        let err = call("mod", vec![expr(1)], &ctxt).unwrap_err();
        assert!(err.is::<ArityMismatch>());
    }

    #[test]
    fn suppressed_arity() {
        let ctxt = Ctxt::new(Settings { suppress_errors: true, ..Settings::default() });
        let result = call("sin", vec![expr(1), expr(2)], &ctxt).unwrap();
        assert_eq!(result.to_string(), "sin(1,2)");
    }

    #[test]
    fn dedicated_handlers() {
        let ctxt = Ctxt::default();
        assert_eq!(call("sqrt", vec![expr(9)], &ctxt).unwrap(), expr(3));
        assert_eq!(call("abs", vec![expr(-9)], &ctxt).unwrap(), expr(9));
        assert_eq!(
            call("invert", vec![expr(4)], &ctxt).unwrap(),
            Value::Expr(Expr::number(Rational::new(1, 4).unwrap())),
        );
    }

    #[test]
    fn vectors() {
        let ctxt = Ctxt::default();
        let v = call("vector", vec![expr(1), expr(2)], &ctxt).unwrap();
        let w = call("vector", vec![expr(3), expr(4)], &ctxt).unwrap();
        assert_eq!(v.to_string(), "[1,2]");
        assert_eq!(call("dot", vec![v, w], &ctxt).unwrap(), expr(11));
    }

    #[test]
    fn excluded() {
        let ctxt = Ctxt::new(Settings { exclude: vec!["sqrt".to_string()], ..Settings::default() });
        let err = call("sqrt", vec![expr(4)], &ctxt).unwrap_err();
        assert!(err.is::<UnsupportedFunction>());
    }
}
