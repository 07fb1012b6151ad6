//! Numeric evaluation of built-in functions without a symbolic handler.
//!
//! Arguments are evaluated with arbitrary precision [`Float`](rug::Float)s and the result is
//! converted back into an exact fraction with [`Rational::convert`]. Rounding functions, `min`,
//! `max` and `mod` are computed exactly.

use rug::Integer;
use tracing::{debug, trace};
use crate::{
    ctxt::Settings,
    primitive::float,
    rational::Rational,
    symbolic::{ops::symfunction, Expr},
};

/// The largest argument for which the factorial is computed exactly.
const MAX_FACTORIAL: u32 = 1000;

/// Applies the named function to the arguments, evaluating it numerically if
/// [`Settings::parse_to_number`] is set and every argument is a number. Otherwise, or if the
/// result is not finite, the application is kept symbolic.
pub fn apply(name: &str, args: Vec<Expr>, settings: &Settings) -> Expr {
    if settings.parse_to_number && args.iter().all(Expr::is_constant) {
        let values = args.iter().map(|arg| arg.multiplier().clone()).collect::<Vec<_>>();
        if let Some(result) = evaluate(name, &values) {
            trace!(name, %result, "evaluated numerically");
            return Expr::number(result);
        }
        debug!(name, "numeric evaluation failed, keeping symbolic application");
    }
    symfunction(name, args)
}

/// Evaluates the named function on numbers. Returns [`None`] for unknown functions and results
/// that are not finite.
pub fn evaluate(name: &str, args: &[Rational]) -> Option<Rational> {
    let first = args.first()?;
    let x = || float(first.to_rug());
    let value = match name {
        "cos" => x().cos(),
        "sin" => x().sin(),
        "tan" => x().tan(),
        "sec" => x().sec(),
        "csc" => x().csc(),
        "cot" => x().cot(),
        "acos" => x().acos(),
        "asin" => x().asin(),
        "atan" => x().atan(),
        "sinh" => x().sinh(),
        "cosh" => x().cosh(),
        "tanh" => x().tanh(),
        "asinh" => x().asinh(),
        "acosh" => x().acosh(),
        "atanh" => x().atanh(),
        "exp" => x().exp(),
        "erf" => x().erf(),
        "floor" => return Some(first.floor()),
        "ceil" => return Some(first.ceil()),
        "round" => return Some(first.round()),
        "min" => return args.iter().min().cloned(),
        "max" => return args.iter().max().cloned(),
        "mod" => return first.trunc_rem(args.get(1)?).ok(),
        "fact" => return factorial(first),
        _ => return None,
    };
    Rational::convert(value.to_f64())
}

/// Computes `n!`, exactly for small non-negative integers and through the gamma function
/// otherwise.
fn factorial(n: &Rational) -> Option<Rational> {
    if n.is_integer() && !n.is_negative() {
        let n = n.numer().to_u32().filter(|&n| n <= MAX_FACTORIAL)?;
        return Some(Rational::from(Integer::from(Integer::factorial(n))));
    }
    Rational::convert((float(n.to_rug()) + 1u32).gamma().to_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn q(num: i32, den: i32) -> Rational {
        Rational::new(num, den).unwrap()
    }

    #[test]
    fn trigonometry() {
        assert_eq!(evaluate("cos", &[Rational::zero()]), Some(Rational::one()));
        assert_eq!(evaluate("sin", &[Rational::zero()]), Some(Rational::zero()));
        assert_eq!(evaluate("cosh", &[Rational::zero()]), Some(Rational::one()));
        assert_eq!(evaluate("atanh", &[Rational::zero()]), Some(Rational::zero()));
    }

    #[test]
    fn exact_functions() {
        assert_eq!(evaluate("floor", &[q(7, 2)]), Some(Rational::from(3)));
        assert_eq!(evaluate("ceil", &[q(7, 2)]), Some(Rational::from(4)));
        assert_eq!(evaluate("min", &[q(1, 2), q(1, 3)]), Some(q(1, 3)));
        assert_eq!(evaluate("max", &[q(1, 2), q(1, 3)]), Some(q(1, 2)));
        assert_eq!(evaluate("mod", &[Rational::from(7), Rational::from(3)]), Some(Rational::one()));
        assert_eq!(evaluate("fact", &[Rational::from(5)]), Some(Rational::from(120)));
    }

    #[test]
    fn unknown_or_infinite() {
        assert_eq!(evaluate("foo", &[Rational::one()]), None);
        assert_eq!(evaluate("fact", &[Rational::from(-1)]), None);
        assert_eq!(evaluate("mod", &[Rational::one(), Rational::zero()]), None);
    }

    #[test]
    fn symbolic_unless_numeric() {
        let symbolic = apply("cos", vec![Expr::zero()], &Settings::default());
        assert_eq!(symbolic.text(), "cos(0)");

        let numeric = Settings { parse_to_number: true, ..Settings::default() };
        assert_eq!(apply("cos", vec![Expr::zero()], &numeric), Expr::one());
    }
}
