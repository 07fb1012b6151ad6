use cas_error::Error;
use tracing::trace;
use crate::{
    ctxt::Settings,
    primitive::{int, split_square},
    rational::Rational,
    symbolic::{
        expr::{Expr, Node, Power},
        ops::{func::abs, multiply::multiply, pow::pow},
    },
};

/// The name of the square root function.
pub const SQRT: &str = "sqrt";

/// Takes the square root of an expression.
///
/// Square factors of numbers are moved outside of the root, and fractions are rationalized, such
/// that `sqrt(n/d) = sqrt(n*d)/d`. The square root of a negative number factors out the
/// imaginary unit named in the settings. Even powers are halved, taking the absolute value of
/// the base where the sign of the base would otherwise be lost.
pub fn sqrt(radicand: Expr, settings: &Settings) -> Result<Expr, Error> {
    if radicand.is_zero() {
        return Ok(radicand);
    }

    let half = Rational::new(1, 2)?;

    // sqrt(sqrt(x)^p) = x^(p/4)
    if let (Node::Function(call), Power::Rational(p)) = (&radicand.node, &radicand.power) {
        if call.name == SQRT && call.args.len() == 1 {
            trace!(%radicand, "unwrapping nested sqrt");
            let quarter = p * &Rational::new(1, 4)?;
            let Expr { multiplier, node, .. } = radicand;
            let coefficient = sqrt(Expr::number(multiplier), settings)?;
            let arg = match node {
                Node::Function(call) => call.into_args().pop().unwrap_or_default(),
                _ => Expr::zero(),
            };
            return multiply(coefficient, pow(arg, Expr::number(quarter), settings)?, settings);
        }
    }

    match &radicand.power {
        Power::Expr(_) => {
            trace!(%radicand, "halving symbolic power");
            let (multiplier, inner, power) = radicand.into_parts();
            let coefficient = sqrt(Expr::number(multiplier), settings)?;
            let halved = multiply(power.into_expr(), Expr::number(half), settings)?;
            let raised = Expr::with_power(Rational::one(), inner, Power::from_expr(halved))?;
            return multiply(coefficient, raised, settings);
        },
        Power::Rational(p) if !p.is_integer() => {
            trace!(%radicand, "halving fractional power");
            let halved = p * &half;
            let (multiplier, inner, _) = radicand.into_parts();
            let coefficient = sqrt(Expr::number(multiplier), settings)?;
            let raised = Expr::with_power(Rational::one(), inner, Power::Rational(halved))?;
            return multiply(coefficient, raised, settings);
        },
        Power::Rational(_) => {},
    }

    if radicand.is_constant() {
        let value = radicand.multiplier;
        if value.is_negative() {
            trace!(%value, "factoring out imaginary unit");
            let unit = Expr::variable_unchecked(&settings.imaginary);
            return multiply(unit, sqrt_rational(&-value)?, settings);
        }
        return sqrt_rational(&value);
    }

    let Expr { multiplier, power, node } = radicand;
    let coefficient = sqrt_rational(&multiplier.abs())?;
    let sign = if multiplier.is_negative() { Rational::from(-1) } else { Rational::one() };
    let symbol = Expr { multiplier: sign, power, node };

    let reduced = match &symbol.power {
        Power::Rational(p) if !symbol.multiplier.is_negative() && p.is_even_integer() => {
            let k = p * &half;
            let base = symbol.to_linear();
            if k.is_even_integer() {
                trace!(%base, %k, "halving even power");
                pow(base, Expr::number(k), settings)?
            } else {
                trace!(%base, %k, "halving even power with absolute value");
                let rest = pow(base.clone(), Expr::number(k - Rational::one()), settings)?;
                multiply(abs(base, settings)?, rest, settings)?
            }
        },
        _ => Expr::function(SQRT, vec![symbol]),
    };

    multiply(coefficient, reduced, settings)
}

/// Takes the square root of a non-negative rational number.
fn sqrt_rational(value: &Rational) -> Result<Expr, Error> {
    let product = int(value.numer() * value.denom());
    let (outside, inside) = split_square(&product);
    let coefficient = Rational::new(outside, value.denom().clone())?;
    if inside == 1 {
        return Ok(Expr::number(coefficient));
    }

    let mut radical = Expr::function(SQRT, vec![Expr::number(inside)]);
    radical.multiplier = coefficient;
    Ok(radical)
}

/// Replaces a square root raised to an even power with its radicand raised to half of that
/// power, such as `sqrt(x)^4 = x^2`. Other expressions are returned unchanged.
pub(crate) fn reduce_sqrt(expr: Expr, settings: &Settings) -> Result<Expr, Error> {
    let half = match (&expr.node, &expr.power) {
        (Node::Function(call), Power::Rational(p))
            if call.name == SQRT && call.args.len() == 1 && p.is_even_integer() && !p.is_zero() =>
        {
            p * &Rational::new(1, 2)?
        },
        _ => return Ok(expr),
    };

    trace!(%expr, "reducing squared sqrt");
    let Expr { multiplier, node, .. } = expr;
    let arg = match node {
        Node::Function(call) => call.into_args().pop().unwrap_or_default(),
        _ => Expr::zero(),
    };
    multiply(Expr::number(multiplier), pow(arg, Expr::number(half), settings)?, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{ops::add, Group};
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::variable(name).unwrap()
    }

    fn frac(num: i32, den: i32) -> Expr {
        Expr::number(Rational::new(num, den).unwrap())
    }

    #[test]
    fn perfect_squares() {
        let settings = Settings::default();
        assert_eq!(sqrt(Expr::number(16), &settings).unwrap(), Expr::number(4));
        assert_eq!(sqrt(frac(9, 4), &settings).unwrap(), frac(3, 2));
    }

    #[test]
    fn square_factors() {
        let settings = Settings::default();
        assert_eq!(sqrt(Expr::number(8), &settings).unwrap().text(), "2*sqrt(2)");
        assert_eq!(sqrt(Expr::number(2), &settings).unwrap().text(), "sqrt(2)");
    }

    #[test]
    fn rationalized() {
        let settings = Settings::default();
        assert_eq!(sqrt(frac(1, 2), &settings).unwrap().text(), "1/2*sqrt(2)");
    }

    #[test]
    fn negative_number() {
        let settings = Settings::default();
        assert_eq!(sqrt(Expr::number(-4), &settings).unwrap().text(), "2*i");
        assert_eq!(sqrt(Expr::number(-2), &settings).unwrap().text(), "i*sqrt(2)");
    }

    #[test]
    fn custom_imaginary_unit() {
        let settings = Settings { imaginary: "j".to_string(), ..Settings::default() };
        assert_eq!(sqrt(Expr::number(-1), &settings).unwrap().text(), "j");
    }

    #[test]
    fn squared_root() {
        let settings = Settings::default();
        let root = sqrt(var("x"), &settings).unwrap();
        let square = multiply(root.clone(), root, &settings).unwrap();
        assert_eq!(square, var("x"));
    }

    #[test]
    fn nested() {
        let settings = Settings::default();
        let inner = sqrt(var("x"), &settings).unwrap();
        let outer = sqrt(inner, &settings).unwrap();
        assert_eq!(outer.text(), "x^(1/4)");
    }

    #[test]
    fn even_powers() {
        let settings = Settings::default();
        let fourth = pow(var("x"), Expr::number(4), &settings).unwrap();
        assert_eq!(sqrt(fourth, &settings).unwrap().text(), "x^2");

        let square = pow(var("x"), Expr::number(2), &settings).unwrap();
        assert_eq!(sqrt(square, &settings).unwrap().text(), "abs(x)");
    }

    #[test]
    fn scaled_radicand() {
        let settings = Settings::default();
        let scaled = multiply(Expr::number(4), var("x"), &settings).unwrap();
        assert_eq!(sqrt(scaled, &settings).unwrap().text(), "2*sqrt(x)");

        let negated = add(var("y"), var("x")).negate();
        let root = sqrt(negated, &settings).unwrap();
        assert_eq!(root.group(), Group::Function);
    }
}
