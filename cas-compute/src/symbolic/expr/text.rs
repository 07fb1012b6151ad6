//! Rendering of expressions as text.
//!
//! The rendered text is valid input for the parser, and parsing it back yields a structurally
//! equal expression. Children of collections are sorted by their text, so the output does not
//! depend on the order in which the terms were inserted.

use std::fmt::{self, Display, Formatter};
use super::{Expr, Node, Power};

/// Returns true if the text must be wrapped in parentheses before it is raised to a power or
/// used as the base of an exponential.
fn bracket(text: String, needed: bool) -> String {
    if needed {
        format!("({})", text)
    } else {
        text
    }
}

/// Renders the children of a sum, joined by `+`.
fn join_terms(children: &[&Expr]) -> String {
    let mut texts = children.iter().map(|child| child.text()).collect::<Vec<_>>();
    texts.sort();
    texts.join("+").replace("+-", "-")
}

/// Renders the factors of a product, joined by `*`. Linear sums with a unit multiplier are
/// bracketed, since their own rendering would not be.
fn join_factors(children: &[&Expr]) -> String {
    let mut texts = children
        .iter()
        .map(|child| {
            let needed = child.is_linear_sum() && child.multiplier.is_one();
            bracket(child.text(), needed)
        })
        .collect::<Vec<_>>();
    texts.sort();
    texts.join("*")
}

/// Renders the power of a node, bracketing it when the parser would otherwise read it
/// differently.
fn power_text(expr: &Expr) -> String {
    match &expr.power {
        Power::Rational(p) => bracket(p.to_string(), !p.is_integer() || p.is_negative()),
        Power::Expr(power) => {
            let needed = power.group().is_collection() || !power.multiplier.is_one();
            bracket(power.text(), needed)
        },
    }
}

fn render(expr: &Expr, hash: bool) -> String {
    let (mut sign, mut coefficient, mut power) = ("", String::new(), String::new());
    if !hash {
        if expr.multiplier == -1 {
            sign = "-";
        } else if !expr.multiplier.is_one() {
            coefficient = expr.multiplier.to_string();
        }
        if !expr.is_linear() {
            power = power_text(expr);
        }
    }

    let mut value = match &expr.node {
        Node::Number => return expr.multiplier.to_string(),
        Node::Literal(n) => bracket(n.to_string(), *n < 0 && !power.is_empty()),
        Node::Variable(name) => name.clone(),
        Node::Function(call) => call.value.clone(),
        Node::Exponential(base) => {
            let bare = hash || match &base.node {
                Node::Variable(_) | Node::Function(_) => true,
                Node::Literal(n) => *n >= 0,
                _ => false,
            };
            bracket(base.text(), !bare)
        },
        Node::PowerSum(terms) | Node::Sum(terms) => {
            join_terms(&terms.iter().collect::<Vec<_>>())
        },
        Node::Product(terms) => join_factors(&terms.iter().collect::<Vec<_>>()),
    };

    let scaled = !sign.is_empty() || !coefficient.is_empty();
    let needs_brackets = match &expr.node {
        Node::PowerSum(_) | Node::Sum(_) => scaled || !power.is_empty(),
        Node::Product(_) => !power.is_empty(),
        _ => false,
    };
    value = bracket(value, needs_brackets);

    if !power.is_empty() {
        value = format!("{}^{}", value, power);
    }
    if !coefficient.is_empty() {
        value = format!("{}*{}", coefficient, value);
    }
    format!("{}{}", sign, value)
}

impl Expr {
    /// Renders the expression as text that the parser accepts.
    pub fn text(&self) -> String {
        render(self, false)
    }

    /// Renders the expression without its multiplier and power. This is the identity used to
    /// compare products and sums for combination.
    pub fn hash(&self) -> String {
        render(self, true)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{rational::Rational, symbolic::expr::PARENS};
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::variable("x").unwrap()
    }

    #[test]
    fn numbers() {
        assert_eq!(Expr::number(5).text(), "5");
        assert_eq!(Expr::number(Rational::new(-1, 2).unwrap()).text(), "-1/2");
    }

    #[test]
    fn scaled_variable() {
        let mut expr = x();
        expr.multiplier = Rational::from(3);
        assert_eq!(expr.text(), "3*x");
        assert_eq!(expr.hash(), "x");

        expr.multiplier = Rational::from(-1);
        assert_eq!(expr.text(), "-x");
    }

    #[test]
    fn powers() {
        let mut expr = x();
        expr.power = Power::Rational(Rational::from(2));
        assert_eq!(expr.text(), "x^2");

        expr.power = Power::Rational(Rational::new(1, 3).unwrap());
        assert_eq!(expr.text(), "x^(1/3)");

        expr.power = Power::Rational(Rational::from(-1));
        assert_eq!(expr.text(), "x^(-1)");
    }

    #[test]
    fn negative_literal_power() {
        let expr = Expr {
            multiplier: Rational::one(),
            power: Power::Rational(Rational::new(1, 3).unwrap()),
            node: Node::Literal((-2).into()),
        };
        assert_eq!(expr.text(), "(-2)^(1/3)");
    }

    #[test]
    fn parens_function() {
        let expr = Expr::function(PARENS, vec![x()]);
        assert_eq!(expr.text(), "(x)");
    }
}
