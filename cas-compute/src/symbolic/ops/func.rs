//! Symbolic handlers for built-in functions that can simplify their argument.

use cas_error::Error;
use tracing::trace;
use crate::{
    consts::PI,
    ctxt::Settings,
    primitive::float,
    rational::Rational,
    symbolic::{
        expr::{Expr, Node, Power, PARENS},
        ops::{add::add, multiply::multiply},
    },
};

/// The name of the absolute value function.
pub const ABS: &str = "abs";

/// The name of the natural logarithm.
pub const LOG: &str = "log";

/// The name of the exponential function.
pub const EXP: &str = "exp";

/// Builds an application of the named function without simplifying it.
pub fn symfunction(name: &str, args: Vec<Expr>) -> Expr {
    Expr::function(name, args)
}

/// Returns true if the node is known to be non-negative for every value of its variables.
fn is_non_negative(expr: &Expr) -> bool {
    if expr.multiplier.is_negative() {
        return false;
    }
    match (&expr.node, &expr.power) {
        (Node::Number, _) => true,
        (Node::Literal(n), _) => *n >= 0,
        (Node::Function(call), Power::Rational(_)) => call.name == ABS,
        (_, Power::Rational(p)) => p.is_even_integer(),
        _ => false,
    }
}

/// Takes the absolute value of an expression.
///
/// Expressions that are already non-negative pass through, and the multiplier is pulled out of
/// the application, such that `abs(-2x) = 2*abs(x)`.
pub fn abs(symbol: Expr, settings: &Settings) -> Result<Expr, Error> {
    let mut symbol = symbol;
    symbol.multiplier = symbol.multiplier.abs();
    if is_non_negative(&symbol) {
        return Ok(symbol);
    }

    trace!(%symbol, "wrapping in abs");
    let multiplier = std::mem::replace(&mut symbol.multiplier, Rational::one());
    multiply(Expr::number(multiplier), symfunction(ABS, vec![symbol]), settings)
}

/// Takes the natural logarithm of an expression.
///
/// `log(exp(x)^p)` simplifies to `p*x`. Numbers are evaluated numerically only when
/// [`Settings::parse_to_number`] is set; the logarithm of a negative number then gains the term
/// `pi*i`.
pub fn log(symbol: Expr, settings: &Settings) -> Result<Expr, Error> {
    if symbol.is_one(false) {
        return Ok(Expr::zero());
    }

    if let (Node::Function(call), Power::Rational(p)) = (&symbol.node, &symbol.power) {
        if call.name == EXP && call.args.len() == 1 && symbol.multiplier.is_one() {
            trace!(%symbol, "log of exp");
            let p = Expr::number(p.clone());
            let arg = call.args[0].clone();
            return multiply(p, arg, settings);
        }
    }

    if settings.parse_to_number && symbol.is_constant() && !symbol.is_zero() {
        let value = symbol.multiplier.abs();
        let ln = float(value.to_rug()).ln().to_f64();
        if let Some(ln) = Rational::convert(ln) {
            let real = Expr::number(ln);
            if !symbol.multiplier.is_negative() {
                return Ok(real);
            }

            trace!(%symbol, "log of negative number");
            let unit = Expr::variable_unchecked(&settings.imaginary);
            let imaginary = multiply(Expr::number(PI.clone()), unit, settings)?;
            return Ok(add(real, imaginary));
        }
    }

    Ok(symfunction(LOG, vec![symbol]))
}

/// Groups an expression in parentheses. The grouping disappears in numeric-evaluation mode.
pub fn parens(symbol: Expr, settings: &Settings) -> Expr {
    if settings.parse_to_number {
        return symbol;
    }
    symfunction(PARENS, vec![symbol])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{ops::pow, Group};
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::variable(name).unwrap()
    }

    #[test]
    fn abs_of_numbers() {
        let settings = Settings::default();
        assert_eq!(abs(Expr::number(-3), &settings).unwrap(), Expr::number(3));
    }

    #[test]
    fn abs_pulls_out_multiplier() {
        let settings = Settings::default();
        let scaled = multiply(Expr::number(-2), var("x"), &settings).unwrap();
        assert_eq!(abs(scaled, &settings).unwrap().text(), "2*abs(x)");
    }

    #[test]
    fn abs_is_idempotent() {
        let settings = Settings::default();
        let once = abs(var("x"), &settings).unwrap();
        let twice = abs(once.clone(), &settings).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn abs_of_even_power() {
        let settings = Settings::default();
        let square = pow(var("x"), Expr::number(2), &settings).unwrap();
        assert_eq!(abs(square.clone(), &settings).unwrap(), square);
    }

    #[test]
    fn log_of_exp() {
        let settings = Settings::default();
        let exp = symfunction(EXP, vec![var("x")]);
        let cubed = pow(exp, Expr::number(3), &settings).unwrap();
        assert_eq!(log(cubed, &settings).unwrap().text(), "3*x");
    }

    #[test]
    fn log_stays_symbolic() {
        let settings = Settings::default();
        let result = log(Expr::number(2), &settings).unwrap();
        assert_eq!(result.group(), Group::Function);
        assert_eq!(result.text(), "log(2)");
        assert!(log(Expr::one(), &settings).unwrap().is_zero());
    }

    #[test]
    fn numeric_log() {
        let settings = Settings { parse_to_number: true, ..Settings::default() };
        let result = log(Expr::number(1), &settings).unwrap();
        assert!(result.is_zero());

        let result = log(Expr::number(-1), &settings).unwrap();
        assert!(result.contains("i"));
    }

    #[test]
    fn parens_unwraps_numerically() {
        let numeric = Settings { parse_to_number: true, ..Settings::default() };
        assert_eq!(parens(var("x"), &numeric), var("x"));
        assert_eq!(parens(var("x"), &Settings::default()).text(), "(x)");
    }
}
