//! The rewrite engine: arithmetic on [`Expr`] nodes that keeps every result in canonical form.
//!
//! Each operation consumes its operands and may return one of them, modified in place, as the
//! result. Operations that can fail (division by zero, an exponent too large to evaluate) return
//! a [`Result`]; addition never fails.
//!
//! The engine never evaluates anything approximately unless
//! [`Settings::parse_to_number`](crate::ctxt::Settings::parse_to_number) is set, in which case
//! function applications on numbers are evaluated with arbitrary precision floats and converted
//! back into exact fractions.

mod add;
mod func;
mod multiply;
mod pow;
mod sqrt;

pub use add::add;
pub use func::{abs, log, parens, symfunction};
pub use multiply::multiply;
pub use pow::pow;
pub use sqrt::sqrt;

use cas_error::Error;
use crate::ctxt::Settings;
use super::expr::Expr;

/// Subtracts `b` from `a`.
pub fn subtract(a: Expr, b: Expr) -> Expr {
    add(a, b.negate())
}

/// Divides `a` by `b`. Two numbers are divided directly; otherwise `a` is multiplied by the
/// reciprocal of `b`.
pub fn divide(a: Expr, b: Expr, settings: &Settings) -> Result<Expr, Error> {
    if a.is_constant() && b.is_constant() {
        return Ok(Expr::number(a.multiplier.checked_div(&b.multiplier)?));
    }
    multiply(a, b.invert()?, settings)
}

/// Returns true if `literal` is an integer literal raised to the power of one and `number` is
/// the number it stands for. Such pairs are treated as like terms.
pub(crate) fn literal_matches(literal: &Expr, number: &Expr) -> bool {
    match &literal.node {
        crate::symbolic::expr::Node::Literal(n) => {
            number.is_constant() && number.multiplier.is_integer() && number.multiplier.numer() == n
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::kind::DivisionByZero, rational::Rational};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::variable("x").unwrap()
    }

    #[test]
    fn subtract_self() {
        assert!(subtract(x(), x()).is_zero());
    }

    #[test]
    fn divide_self() {
        let settings = Settings::default();
        assert_eq!(divide(x(), x(), &settings).unwrap(), Expr::one());
    }

    #[test]
    fn divide_numbers() {
        let settings = Settings::default();
        let quotient = divide(Expr::number(1), Expr::number(3), &settings).unwrap();
        assert_eq!(quotient, Expr::number(Rational::new(1, 3).unwrap()));
    }

    #[test]
    fn divide_by_zero() {
        let settings = Settings::default();
        let err = divide(x(), Expr::zero(), &settings).unwrap_err();
        assert!(err.is::<DivisionByZero>());
        let err = divide(Expr::one(), Expr::zero(), &settings).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }
}
