use std::cmp::Ordering;
use tracing::trace;
use crate::{
    rational::Rational,
    symbolic::{
        expr::{Expr, Node, Power, Terms},
        Group,
    },
};
use super::literal_matches;

/// Compares the powers of two nodes. Constant powers compare numerically; symbolic powers
/// compare by their text.
fn compare_powers(a: &Power, b: &Power) -> Ordering {
    match (a, b) {
        (Power::Rational(a), Power::Rational(b)) => a.cmp(b),
        (a, b) => a.text().cmp(&b.text()),
    }
}

/// Returns true if `a` should be the left operand: the node of higher group, or of larger power
/// if the groups are equal.
fn goes_left(a: &Expr, b: &Expr) -> bool {
    match a.group().cmp(&b.group()) {
        Ordering::Equal => compare_powers(&a.power, &b.power) == Ordering::Greater,
        ordering => ordering == Ordering::Greater,
    }
}

/// Adds two expressions.
///
/// Like terms are merged by adding their multipliers. Terms that share a base but differ in
/// their powers are collected into a [`Node::PowerSum`], and anything else into a [`Node::Sum`].
pub fn add(a: Expr, b: Expr) -> Expr {
    if a.is_zero() {
        return b;
    }
    if b.is_zero() {
        return a;
    }

    let (mut a, mut b) = if goes_left(&b, &a) { (b, a) } else { (a, b) };

    let literal = literal_matches(&a, &b) && a.is_linear();
    if literal || (a.add_identity() == b.add_identity() && a.power == b.power) {
        trace!(lhs = %a, rhs = %b, "merging like terms");
        if literal {
            a.multiplier += &Rational::one();
        } else {
            a.multiplier += &b.multiplier;
        }
        if a.multiplier.is_zero() {
            return Expr::zero();
        }
        a.distribute_multiplier();
        return a.absorb_base_factors();
    }

    let a_sum = a.is_linear_sum();
    let b_sum = b.is_linear_sum();

    if a_sum && a.group() == Group::PowerSum && !b.group().is_collection() && a.value() == b.value() {
        trace!(lhs = %a, rhs = %b, "extending power sum");
        a.distribute_multiplier();
        a.attach(b);
        return a.collapse();
    }

    let same_base = !a.group().is_collection()
        && !b.group().is_collection()
        && !a.is_constant()
        && a.value() == b.value();
    if same_base {
        trace!(lhs = %a, rhs = %b, "building power sum");
        let mut sum = Expr::from_node(Node::PowerSum(Terms::with_value(a.value().into_owned())));
        sum.attach(a);
        sum.attach(b);
        return sum.collapse();
    }

    let folds = |a: &Expr, b: &Expr| {
        a.group() == Group::Sum
            || (a.group() == Group::PowerSum && b.group() == Group::PowerSum && a.value() == b.value())
    };
    if a_sum && folds(&a, &b) {
        trace!(lhs = %a, rhs = %b, "attaching to sum");
        a.distribute_multiplier();
        a.attach(b);
        return a.collapse();
    }
    if b_sum && folds(&b, &a) {
        trace!(lhs = %a, rhs = %b, "attaching to sum");
        b.distribute_multiplier();
        b.attach(a);
        return b.collapse();
    }

    trace!(lhs = %a, rhs = %b, "building sum");
    let mut sum = Expr::from_node(Node::Sum(Terms::default()));
    sum.attach(a);
    sum.attach(b);
    sum.collapse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn var(name: &str) -> Expr {
        Expr::variable(name).unwrap()
    }

    fn raise(expr: Expr, power: i32) -> Expr {
        Expr { power: Power::Rational(Rational::from(power)), ..expr }
    }

    #[test]
    fn numbers() {
        let sum = add(Expr::number(Rational::new(1, 2).unwrap()), Expr::number(Rational::new(1, 3).unwrap()));
        assert_eq!(sum, Expr::number(Rational::new(5, 6).unwrap()));
    }

    #[test]
    fn like_terms() {
        let sum = add(var("x"), var("x"));
        assert_eq!(sum.text(), "2*x");
        assert_eq!(sum.group(), Group::Variable);
    }

    #[test]
    fn cancellation() {
        assert!(add(var("x"), var("x").negate()).is_zero());
    }

    #[test]
    fn power_sum() {
        let sum = add(var("x"), raise(var("x"), 2));
        assert_eq!(sum.group(), Group::PowerSum);
        assert_eq!(sum.text(), "x+x^2");

        let reversed = add(raise(var("x"), 2), var("x"));
        assert_eq!(sum, reversed);
    }

    #[test]
    fn extend_power_sum() {
        let sum = add(var("x"), raise(var("x"), 2));
        let sum = add(sum, raise(var("x"), 3));
        assert_eq!(sum.terms().map(Terms::len), Some(3));

        let sum = add(sum, raise(var("x"), 2).negate());
        assert_eq!(sum.text(), "x+x^3");
    }

    #[test]
    fn general_sum() {
        let sum = add(add(var("x"), var("y")), Expr::number(1));
        assert_eq!(sum.group(), Group::Sum);
        assert_eq!(sum.text(), "1+x+y");

        let sum = add(sum, var("y").negate());
        assert_eq!(sum.text(), "1+x");

        let sum = add(sum, Expr::number(-1));
        assert_eq!(sum, var("x"));
    }

    #[test]
    fn sum_of_sums() {
        let left = add(var("x"), var("y"));
        let right = add(var("y"), var("z"));
        let sum = add(left, right);
        assert_eq!(sum.text(), "2*y+x+z");
    }

    #[test]
    fn product_beside_its_power() {
        let settings = crate::ctxt::Settings::default();
        let xy = super::super::multiply(var("x"), var("y"), &settings).unwrap();
        let raised = Expr::with_power(Rational::one(), xy.clone(), Power::Expr(Box::new(var("z")))).unwrap();

        let sum = add(xy.clone(), raised.clone());
        assert_eq!(sum.group(), Group::Sum);
        assert_eq!(sum.terms().map(Terms::len), Some(2));
        assert_eq!(sum.text(), "(x*y)^z+x*y");
        assert_eq!(add(sum, xy.negate()), raised);
    }

    #[test]
    fn literal_and_number() {
        let sum = add(Expr::literal(2), Expr::number(2));
        assert_eq!(sum.multiplier, Rational::from(2));
        assert_eq!(sum.group(), Group::Literal);
    }
}
