use cas_error::Error;
use rug::Integer;
use tracing::trace;
use crate::{
    ctxt::Settings,
    error::kind::{DivisionByZero, ExponentTooLarge},
    primitive::perfect_root,
    rational::Rational,
    symbolic::{
        expr::{Expr, Node, Power},
        ops::{multiply::multiply, sqrt::{reduce_sqrt, sqrt}},
    },
};

/// Raises `base` to `exponent`.
///
/// Constant exponents are applied exactly: integer powers of numbers are evaluated, perfect
/// roots are extracted, and the power `1/2` is handed to [`sqrt`]. Symbolic exponents promote
/// the base into a [`Node::Exponential`] node.
pub fn pow(base: Expr, exponent: Expr, settings: &Settings) -> Result<Expr, Error> {
    if exponent.is_constant() {
        return pow_rational(base, exponent.multiplier, settings);
    }

    if base.is_zero() || base.is_one(false) {
        return Ok(base);
    }
    if base.is_constant() {
        return pow_number_symbolic(base.multiplier, exponent, settings);
    }

    trace!(%base, %exponent, "raising to symbolic power");
    let (multiplier, inner, power) = base.into_parts();
    let coefficient = if multiplier.is_one() {
        Expr::one()
    } else {
        pow_number_symbolic(multiplier, exponent.clone(), settings)?
    };
    let total = multiply(power.into_expr(), exponent, settings)?;
    let raised = Expr::with_power(Rational::one(), inner, Power::from_expr(total))?;
    multiply(coefficient, raised, settings)
}

/// Raises an expression to a constant power.
fn pow_rational(base: Expr, p: Rational, settings: &Settings) -> Result<Expr, Error> {
    if p.is_zero() {
        return Ok(Expr::one());
    }
    if p.is_one() {
        return Ok(base);
    }
    if p == Rational::new(1, 2)? {
        return sqrt(base, settings);
    }
    if base.is_constant() {
        return pow_number(base.multiplier, &p, settings);
    }

    let (multiplier, inner, power) = base.into_parts();
    let coefficient = pow_number(multiplier, &p, settings)?;
    let raised = match power {
        Power::Expr(exponent) => {
            trace!(%inner, %p, "scaling symbolic power");
            let total = multiply(*exponent, Expr::number(p), settings)?;
            Expr::with_power(Rational::one(), inner, Power::from_expr(total))?
        },
        Power::Rational(q) => {
            let total = &q * &p;
            match inner.node {
                Node::Literal(n) => pow_number(Rational::from(n), &total, settings)?,
                Node::Product(_) if total.is_integer() => {
                    trace!(%inner, %total, "distributing power over product");
                    let mut result = Expr::one();
                    for factor in inner.into_children() {
                        let raised = pow_rational(factor, total.clone(), settings)?;
                        result = multiply(result, raised, settings)?;
                    }
                    result
                },
                _ if total == Rational::new(1, 2)? => sqrt(inner, settings)?,
                _ => Expr::with_power(Rational::one(), inner, Power::Rational(total))?,
            }
        },
    };

    let result = multiply(coefficient, raised, settings)?;
    reduce_sqrt(result, settings)
}

/// Raises a number to a constant power.
pub(crate) fn pow_number(c: Rational, p: &Rational, settings: &Settings) -> Result<Expr, Error> {
    if p.is_zero() {
        return Ok(Expr::one());
    }
    if c.is_zero() {
        if p.is_negative() {
            return Err(Error::spanless(DivisionByZero));
        }
        return Ok(Expr::zero());
    }
    if c.is_one() || p.is_one() {
        return Ok(Expr::number(c));
    }
    if p.is_integer() {
        return Ok(Expr::number(c.pow_int(p.numer())?));
    }
    if *p == Rational::new(1, 2)? {
        return sqrt(Expr::number(c), settings);
    }

    trace!(%c, %p, "radical of a constant");
    let numerator = pow_literal(c.numer().clone(), p)?;
    let denominator = pow_literal(c.denom().clone(), p)?;
    multiply(numerator, denominator.invert()?, settings)
}

/// Raises an integer to a fractional power, extracting the root exactly if it is perfect.
fn pow_literal(n: Integer, p: &Rational) -> Result<Expr, Error> {
    if n == 1 {
        return Ok(Expr::one());
    }

    let k = p.denom().to_u32().ok_or_else(|| Error::spanless(ExponentTooLarge))?;
    if let Some(root) = perfect_root(&n, k) {
        return Ok(Expr::number(Rational::from(root).pow_int(p.numer())?));
    }

    Ok(Expr {
        multiplier: Rational::one(),
        power: Power::Rational(p.clone()),
        node: Node::Literal(n),
    })
}

/// Raises a number to a symbolic power, splitting a fraction into `num^x * den^(-x)`.
fn pow_number_symbolic(c: Rational, exponent: Expr, settings: &Settings) -> Result<Expr, Error> {
    let mut result = Expr::one();

    let num = c.numer().clone();
    if num != 1 {
        let power = Power::Expr(Box::new(exponent.clone()));
        result = Expr::with_power(Rational::one(), Expr::literal(num), power)?;
    }

    let den = c.denom().clone();
    if den != 1 {
        let power = Power::Expr(Box::new(exponent.negate()));
        let raised = Expr::with_power(Rational::one(), Expr::literal(den), power)?;
        result = multiply(result, raised, settings)?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::Group;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::variable(name).unwrap()
    }

    fn frac(num: i32, den: i32) -> Expr {
        Expr::number(Rational::new(num, den).unwrap())
    }

    #[test]
    fn integer_powers() {
        let settings = Settings::default();
        assert_eq!(pow(Expr::number(2), Expr::number(10), &settings).unwrap(), Expr::number(1024));
        assert_eq!(pow(Expr::number(2), Expr::number(-2), &settings).unwrap(), frac(1, 4));
        assert_eq!(pow(var("x"), Expr::zero(), &settings).unwrap(), Expr::one());
    }

    #[test]
    fn zero_to_negative_power() {
        let settings = Settings::default();
        let err = pow(Expr::zero(), Expr::number(-1), &settings).unwrap_err();
        assert!(err.is::<DivisionByZero>());
    }

    #[test]
    fn perfect_roots() {
        let settings = Settings::default();
        assert_eq!(pow(Expr::number(8), frac(1, 3), &settings).unwrap(), Expr::number(2));
        assert_eq!(pow(Expr::number(4), frac(3, 2), &settings).unwrap(), Expr::number(8));
        assert_eq!(pow(frac(1, 27), frac(1, 3), &settings).unwrap(), frac(1, 3));
    }

    #[test]
    fn irrational_root() {
        let settings = Settings::default();
        let root = pow(Expr::number(2), frac(1, 3), &settings).unwrap();
        assert_eq!(root.group(), Group::Literal);
        assert_eq!(root.text(), "2^(1/3)");

        let cube = pow(root, Expr::number(3), &settings).unwrap();
        assert_eq!(cube, Expr::number(2));
    }

    #[test]
    fn half_power_is_sqrt() {
        let settings = Settings::default();
        let root = pow(var("x"), frac(1, 2), &settings).unwrap();
        assert_eq!(root, sqrt(var("x"), &settings).unwrap());
        assert_eq!(root.text(), "sqrt(x)");
    }

    #[test]
    fn power_of_power() {
        let settings = Settings::default();
        let square = pow(var("x"), Expr::number(2), &settings).unwrap();
        let sixth = pow(square, Expr::number(3), &settings).unwrap();
        assert_eq!(sixth.text(), "x^6");
    }

    #[test]
    fn power_of_product() {
        let settings = Settings::default();
        let product = multiply(Expr::number(2), multiply(var("x"), var("y"), &settings).unwrap(), &settings).unwrap();
        let squared = pow(product, Expr::number(2), &settings).unwrap();
        assert_eq!(squared.text(), "4*x^2*y^2");
    }

    #[test]
    fn symbolic_exponent() {
        let settings = Settings::default();
        let raised = pow(var("x"), var("y"), &settings).unwrap();
        assert_eq!(raised.group(), Group::Exponential);
        assert_eq!(raised.text(), "x^y");

        let doubled = pow(raised, Expr::number(2), &settings).unwrap();
        assert_eq!(doubled.text(), "x^(2*y)");
    }

    #[test]
    fn fraction_to_symbolic_power() {
        let settings = Settings::default();
        let raised = pow(frac(2, 3), var("x"), &settings).unwrap();
        assert_eq!(raised.text(), "2^x*3^(-x)");
    }
}
