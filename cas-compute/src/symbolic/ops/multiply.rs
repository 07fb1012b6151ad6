use cas_error::Error;
use tracing::trace;
use crate::{
    ctxt::Settings,
    rational::Rational,
    symbolic::{
        expr::{Expr, Node, Power, Terms},
        ops::{add::add, sqrt::{reduce_sqrt, sqrt}},
        Group,
    },
};

/// Multiplies two expressions.
///
/// Multipliers are multiplied together, factors with the same base have their powers added,
/// and anything else is collected into a [`Node::Product`].
pub fn multiply(a: Expr, b: Expr, settings: &Settings) -> Result<Expr, Error> {
    if a.is_zero() || b.is_zero() {
        return Ok(Expr::zero());
    }
    if a.is_one(false) {
        return Ok(b);
    }
    if b.is_one(false) {
        return Ok(a);
    }

    // sums stay on the right, so that they are wrapped into a product instead of absorbing the
    // other factor
    let (mut a, mut b) = if b.group() > a.group() && b.group() != Group::Sum {
        (b, a)
    } else {
        (a, b)
    };

    // factors of a literal's base move into its power, such as `2^(1/3) * 12 = 3*2^(7/3)`
    if matches!(a.node, Node::Literal(_)) && b.is_constant() {
        trace!(lhs = %a, rhs = %b, "scaling literal");
        a.multiplier *= &b.multiplier;
        if a.power.as_rational().map_or(false, Rational::is_integer) {
            let (multiplier, base, power) = a.into_parts();
            return Expr::with_power(multiplier, base, power);
        }
        return Ok(a.absorb_base_factors());
    }

    if b.is_constant() {
        a.multiplier *= &b.multiplier;
        return Ok(a);
    }
    if a.is_constant() {
        b.multiplier *= &a.multiplier;
        return Ok(b);
    }

    let multiplier = &a.multiplier * &b.multiplier;
    a.multiplier = Rational::one();
    b.multiplier = Rational::one();

    let linear_product = |expr: &Expr| matches!(expr.node, Node::Product(_)) && expr.is_linear();
    let mut result = if !(linear_product(&a) && linear_product(&b)) && a.mul_identity() == b.mul_identity() {
        trace!(lhs = %a, rhs = %b, "adding powers");
        let (_, base, left) = a.into_parts();
        let power = match (left, b.power) {
            (Power::Rational(left), Power::Rational(right)) => Power::Rational(left + right),
            (left, right) => Power::from_expr(add(left.into_expr(), right.into_expr())),
        };
        if power == Power::Rational(Rational::new(1, 2)?) {
            let base = match base.node {
                Node::Literal(n) => Expr::number(n),
                _ => base,
            };
            sqrt(base, settings)?
        } else {
            Expr::with_power(Rational::one(), base, power)?
        }
    } else if linear_product(&a) {
        trace!(lhs = %a, rhs = %b, "combining into product");
        a.combine(b, settings)?;
        a
    } else {
        trace!(lhs = %a, rhs = %b, "building product");
        let mut product = Expr::from_node(Node::Product(Terms::default()));
        product.combine(a, settings)?;
        product.combine(b, settings)?;
        product
    };

    result.multiplier *= &multiplier;
    if result.multiplier.is_zero() {
        return Ok(Expr::zero());
    }
    reduce_sqrt(result.collapse(), settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::ops::{pow::pow, subtract};
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::variable(name).unwrap()
    }

    #[test]
    fn scalar() {
        let settings = Settings::default();
        let product = multiply(Expr::number(3), var("x"), &settings).unwrap();
        assert_eq!(product.text(), "3*x");
    }

    #[test]
    fn powers_add() {
        let settings = Settings::default();
        let square = multiply(var("x"), var("x"), &settings).unwrap();
        assert_eq!(square.text(), "x^2");

        let cube = multiply(square, var("x"), &settings).unwrap();
        assert_eq!(cube.text(), "x^3");
    }

    #[test]
    fn product_of_variables() {
        let settings = Settings::default();
        let product = multiply(var("y"), var("x"), &settings).unwrap();
        assert_eq!(product.group(), Group::Product);
        assert_eq!(product.text(), "x*y");

        let product = multiply(product, Expr::number(-2), &settings).unwrap();
        assert_eq!(product.text(), "-2*x*y");
    }

    #[test]
    fn products_merge() {
        let settings = Settings::default();
        let left = multiply(var("x"), var("y"), &settings).unwrap();
        let right = multiply(var("y"), var("z"), &settings).unwrap();
        let product = multiply(left, right, &settings).unwrap();
        assert_eq!(product.text(), "x*y^2*z");
    }

    #[test]
    fn factors_cancel() {
        let settings = Settings::default();
        let product = multiply(var("x"), var("y"), &settings).unwrap();
        let product = multiply(product, var("y").invert().unwrap(), &settings).unwrap();
        assert_eq!(product, var("x"));
    }

    #[test]
    fn symbolic_powers() {
        let settings = Settings::default();
        let raised = Expr::with_power(Rational::one(), var("x"), Power::Expr(Box::new(var("y")))).unwrap();
        let product = multiply(raised, var("x"), &settings).unwrap();
        assert_eq!(product.group(), Group::Exponential);
        assert_eq!(product.text(), "x^(1+y)");
    }

    #[test]
    fn numbers_fold_into_literal() {
        let settings = Settings::default();
        let third = || Expr::number(Rational::new(1, 3).unwrap());
        let cube_root = pow(Expr::number(2), third(), &settings).unwrap();
        let expected = pow(Expr::number(2), Expr::number(Rational::new(7, 3).unwrap()), &settings).unwrap();

        let once = multiply(cube_root.clone(), Expr::number(4), &settings).unwrap();
        let twice = multiply(
            multiply(cube_root.clone(), Expr::number(2), &settings).unwrap(),
            Expr::number(2),
            &settings,
        )
        .unwrap();
        let swapped = multiply(Expr::number(4), cube_root.clone(), &settings).unwrap();
        assert_eq!(once, expected);
        assert_eq!(twice, expected);
        assert_eq!(swapped, expected);
        assert!(subtract(once, expected).is_zero());

        let scaled = multiply(cube_root.clone(), Expr::number(12), &settings).unwrap();
        assert_eq!(scaled.text(), "3*2^(7/3)");
        let halved = multiply(cube_root.clone(), Expr::number(Rational::new(1, 2).unwrap()), &settings).unwrap();
        assert_eq!(halved.text(), "2^(-2/3)");

        let doubled = add(cube_root.clone(), cube_root.clone());
        assert_eq!(doubled, multiply(cube_root, Expr::number(2), &settings).unwrap());
    }

    #[test]
    fn powers_adding_to_half_give_sqrt() {
        let settings = Settings::default();
        let quarter = || Expr::number(Rational::new(1, 4).unwrap());
        let root = |base: Expr| pow(base, quarter(), &settings).unwrap();

        let product = multiply(root(var("x")), root(var("x")), &settings).unwrap();
        assert_eq!(product, sqrt(var("x"), &settings).unwrap());
        assert_eq!(product.text(), "sqrt(x)");

        let product = multiply(root(Expr::number(2)), root(Expr::number(2)), &settings).unwrap();
        assert_eq!(product, sqrt(Expr::number(2), &settings).unwrap());
    }

    #[test]
    fn sum_factor() {
        let settings = Settings::default();
        let sum = add(var("x"), Expr::number(1));
        let product = multiply(var("y"), sum, &settings).unwrap();
        assert_eq!(product.group(), Group::Product);
        assert_eq!(product.text(), "(1+x)*y");
    }
}
