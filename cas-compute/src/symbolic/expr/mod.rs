//! The expression node used by the rewrite engine.
//!
//! Every expression is a single [`Expr`]: a [`Node`] describing _what_ is being multiplied and
//! raised, a rational multiplier in front of it, and a [`Power`] it is raised to. The node decides
//! the expression's [`Group`], and the group decides how the engine combines it with other
//! expressions.
//!
//! ```text
//! multiplier * node ^ power
//! ```
//!
//! Collection nodes ([`Node::PowerSum`], [`Node::Product`] and [`Node::Sum`]) hold their children
//! in a [`Terms`] map. Each child is stored under a key computed by [`Expr::key_for_group`], so
//! that two children which can be combined always collide on the same key. Because the map is
//! ordered by key, iterating over the children is deterministic.
//!
//! # Canonical value
//!
//! Every node has a canonical [`value`](Expr::value), a string used to decide whether two nodes
//! describe the same thing. Variables use their name, literals their digits and functions their
//! call text. Collections cache a value that is recomputed whenever their children change, which
//! is why they must only be modified through the engine's insertion routines.
//!
//! # Equality
//!
//! The [`PartialEq`] implementation compares nodes structurally. Since collections are ordered
//! maps keyed by canonical text, `x + x^2` and `x^2 + x` build equal nodes.

mod convert;
mod terms;
mod text;

pub use terms::{Call, Terms, PARENS};

use cas_error::Error;
use rug::Integer;
use std::borrow::Cow;
use crate::{error::kind::InvalidName, rational::Rational};
use super::Group;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The canonical value shared by every [`Node::Number`].
pub const CONST_HASH: &str = "#";

/// Returns true if the given string is a valid variable name: a letter or underscore, followed by
/// any number of letters, digits or underscores.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// The power a node is raised to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Power {
    /// A constant power.
    Rational(Rational),

    /// A symbolic power. Only [`Node::Exponential`] nodes carry one.
    Expr(Box<Expr>),
}

impl Power {
    /// The power of one, carried by linear nodes.
    pub fn one() -> Self {
        Power::Rational(Rational::one())
    }

    /// Wraps an expression, unwrapping it into a constant power if it is a plain number.
    pub fn from_expr(expr: Expr) -> Self {
        if expr.is_constant() {
            Power::Rational(expr.multiplier)
        } else {
            Power::Expr(Box::new(expr))
        }
    }

    /// Returns true if this is the constant power `1`.
    pub fn is_one(&self) -> bool {
        matches!(self, Power::Rational(p) if p.is_one())
    }

    /// Returns the power if it is constant.
    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Power::Rational(p) => Some(p),
            Power::Expr(_) => None,
        }
    }

    /// Converts the power into an expression.
    pub fn into_expr(self) -> Expr {
        match self {
            Power::Rational(p) => Expr::number(p),
            Power::Expr(expr) => *expr,
        }
    }

    /// Negates the power.
    pub fn negate(self) -> Self {
        match self {
            Power::Rational(p) => Power::Rational(-p),
            Power::Expr(expr) => Power::Expr(Box::new(expr.negate())),
        }
    }

    /// Renders the power as text.
    pub fn text(&self) -> String {
        match self {
            Power::Rational(p) => p.to_string(),
            Power::Expr(expr) => expr.text(),
        }
    }
}

/// The structure of an expression node, which determines its [`Group`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Node {
    /// A pure number. Its value is the multiplier of the enclosing [`Expr`].
    Number,

    /// An integer acting as a symbol, such as the `2` in `2^(1/3)`.
    Literal(Integer),

    /// A variable.
    Variable(String),

    /// The base of a node raised to a symbolic power. The base is linear and has a unit
    /// multiplier; its own group is the group the node had before it was raised. A node
    /// explicitly converted into this group keeps its constant power.
    Exponential(Box<Expr>),

    /// A function application.
    Function(Call),

    /// A sum of terms that share a base and differ in their powers, keyed by power.
    PowerSum(Terms),

    /// A product of factors with distinct bases.
    Product(Terms),

    /// A general sum of terms.
    Sum(Terms),
}

/// A node of the expression tree, representing `multiplier * node ^ power`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    pub(crate) multiplier: Rational,
    pub(crate) power: Power,
    pub(crate) node: Node,
}

impl Default for Expr {
    fn default() -> Self {
        Expr::zero()
    }
}

impl Expr {
    /// Creates a linear node with a unit multiplier.
    pub(crate) fn from_node(node: Node) -> Self {
        Expr { multiplier: Rational::one(), power: Power::one(), node }
    }

    /// Creates a number.
    pub fn number(value: impl Into<Rational>) -> Self {
        Expr { multiplier: value.into(), power: Power::one(), node: Node::Number }
    }

    /// The number zero.
    pub fn zero() -> Self {
        Expr::number(Rational::zero())
    }

    /// The number one.
    pub fn one() -> Self {
        Expr::number(Rational::one())
    }

    /// Creates a variable, checking that the name is valid.
    pub fn variable(name: &str) -> Result<Self, Error> {
        if !is_valid_name(name) {
            return Err(Error::spanless(InvalidName { name: name.to_string() }));
        }
        Ok(Expr::variable_unchecked(name))
    }

    /// Creates a variable without checking the name.
    pub(crate) fn variable_unchecked(name: &str) -> Self {
        Expr::from_node(Node::Variable(name.to_string()))
    }

    /// Creates an integer literal that is treated as a symbol.
    pub fn literal(value: impl Into<Integer>) -> Self {
        Expr::from_node(Node::Literal(value.into()))
    }

    /// Creates an application of the named function to the given arguments, without evaluating
    /// it.
    pub fn function(name: &str, args: Vec<Expr>) -> Self {
        Expr::from_node(Node::Function(Call::new(name, args)))
    }

    /// Raises `base` to `power` and scales it by `multiplier`, normalizing the result.
    ///
    /// `base` must be linear with a unit multiplier, and must not be a number. A power of zero
    /// yields the multiplier, a constant power on a literal is evaluated when it is an integer,
    /// and a symbolic power promotes the base into an [`Node::Exponential`] node.
    pub(crate) fn with_power(multiplier: Rational, base: Expr, power: Power) -> Result<Self, Error> {
        let power = match power {
            Power::Expr(expr) => Power::from_expr(*expr),
            power => power,
        };

        match power {
            Power::Rational(p) if p.is_zero() => Ok(Expr::number(multiplier)),
            Power::Rational(p) => match base.node {
                Node::Literal(n) if p.is_integer() => {
                    let value = Rational::from(n).pow_int(p.numer())?;
                    Ok(Expr::number(multiplier * value))
                },
                node => Ok(Expr { multiplier, power: Power::Rational(p), node }),
            },
            power => Ok(Expr {
                multiplier,
                power,
                node: Node::Exponential(Box::new(base)),
            }),
        }
    }

    /// Moves the factors of a literal's base out of the multiplier and into its fractional power,
    /// so that `4*2^(1/3)` becomes `2^(7/3)` and `12*2^(1/3)` becomes `3*2^(7/3)`. Any other
    /// node is returned unchanged.
    pub(crate) fn absorb_base_factors(mut self) -> Self {
        let (rest, shift) = match (&self.node, &self.power) {
            (Node::Literal(n), Power::Rational(p)) if !p.is_integer() => self.multiplier.remove_factor(n),
            _ => return self,
        };
        if shift != 0 {
            if let Power::Rational(p) = &mut self.power {
                *p += &Rational::from(shift);
            }
            self.multiplier = rest;
        }
        self
    }

    /// Splits the node into its multiplier, its base (a linear node with a unit multiplier) and
    /// its power. The base of an [`Node::Exponential`] node is returned as is.
    pub(crate) fn into_parts(self) -> (Rational, Expr, Power) {
        let Expr { multiplier, power, node } = self;
        let base = match node {
            Node::Exponential(base) => *base,
            node => Expr::from_node(node),
        };
        (multiplier, base, power)
    }

    /// Returns the group of the node.
    pub fn group(&self) -> Group {
        match self.node {
            Node::Number => Group::Number,
            Node::Literal(_) => Group::Literal,
            Node::Variable(_) => Group::Variable,
            Node::Exponential(_) => Group::Exponential,
            Node::Function(_) => Group::Function,
            Node::PowerSum(_) => Group::PowerSum,
            Node::Product(_) => Group::Product,
            Node::Sum(_) => Group::Sum,
        }
    }

    /// The group the node had before it was raised to a symbolic power, if it was.
    pub fn previous_group(&self) -> Option<Group> {
        match &self.node {
            Node::Exponential(base) => Some(base.group()),
            _ => None,
        }
    }

    /// The rational multiplier in front of the node.
    pub fn multiplier(&self) -> &Rational {
        &self.multiplier
    }

    /// The power the node is raised to.
    pub fn power(&self) -> &Power {
        &self.power
    }

    /// The structure of the node.
    pub fn node(&self) -> &Node {
        &self.node
    }

    /// The children of a collection node.
    pub fn terms(&self) -> Option<&Terms> {
        match &self.node {
            Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => Some(terms),
            _ => None,
        }
    }

    pub(crate) fn terms_mut(&mut self) -> Option<&mut Terms> {
        match &mut self.node {
            Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => Some(terms),
            _ => None,
        }
    }

    /// The function call of a [`Node::Function`] node.
    pub fn call(&self) -> Option<&Call> {
        match &self.node {
            Node::Function(call) => Some(call),
            _ => None,
        }
    }

    /// Consumes a collection node, returning its children in key order.
    pub(crate) fn into_children(self) -> Vec<Expr> {
        match self.node {
            Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => {
                terms.children.into_values().collect()
            },
            _ => Vec::new(),
        }
    }

    /// The canonical value of the node, used to decide whether two nodes describe the same
    /// thing.
    pub fn value(&self) -> Cow<'_, str> {
        match &self.node {
            Node::Number => Cow::Borrowed(CONST_HASH),
            Node::Literal(n) => Cow::Owned(n.to_string()),
            Node::Variable(name) => Cow::Borrowed(name),
            Node::Exponential(base) => Cow::Owned(base.hash()),
            Node::Function(call) => Cow::Borrowed(&call.value),
            Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => {
                Cow::Borrowed(&terms.value)
            },
        }
    }

    /// Returns true if the node is a plain number.
    pub fn is_constant(&self) -> bool {
        matches!(self.node, Node::Number)
    }

    /// Returns true if the node is the number zero.
    pub fn is_zero(&self) -> bool {
        self.is_constant() && self.multiplier.is_zero()
    }

    /// Returns true if the node is the number one, or `-1` as well if `abs` is set.
    pub fn is_one(&self, abs: bool) -> bool {
        self.is_constant()
            && if abs {
                self.multiplier.abs().is_one()
            } else {
                self.multiplier.is_one()
            }
    }

    /// Returns true if the node is an integer.
    pub fn is_integer(&self) -> bool {
        self.is_constant() && self.multiplier.is_integer()
    }

    /// Returns true if the node is raised to the power of one.
    pub fn is_linear(&self) -> bool {
        self.power.is_one()
    }

    /// Returns true for sums: [`Node::PowerSum`] and [`Node::Sum`].
    pub fn is_composite(&self) -> bool {
        matches!(self.node, Node::PowerSum(_) | Node::Sum(_))
    }

    /// Returns true for sums that are raised to the power of one, whose children can be
    /// distributed over.
    pub(crate) fn is_linear_sum(&self) -> bool {
        self.is_composite() && self.is_linear()
    }

    /// Negates the node. The multiplier of a linear sum is distributed into its terms.
    pub fn negate(mut self) -> Self {
        self.multiplier = -self.multiplier;
        self.distribute_multiplier();
        self
    }

    /// Takes the reciprocal of the node.
    ///
    /// The factors of a linear product are inverted individually. Fails on zero.
    pub fn invert(mut self) -> Result<Self, Error> {
        self.multiplier = self.multiplier.recip()?;
        if self.is_constant() {
            return Ok(self);
        }

        if matches!(self.node, Node::Product(_)) && self.is_linear() {
            let multiplier = std::mem::take(&mut self.multiplier);
            let mut product = Expr::from_node(Node::Product(Terms::default()));
            product.multiplier = multiplier;
            for child in self.into_children() {
                let inverted = Expr { power: child.power.clone().negate(), ..child };
                let key = inverted.key_for_group(Group::Product);
                if let Some(terms) = product.terms_mut() {
                    terms.children.insert(key, inverted);
                }
            }
            product.update_hash();
            return Ok(product);
        }

        self.power = std::mem::replace(&mut self.power, Power::one()).negate();
        Ok(self)
    }

    /// Pushes the multiplier of a linear sum into each of its terms, leaving a unit multiplier.
    /// Does nothing for other nodes.
    pub(crate) fn distribute_multiplier(&mut self) {
        if !self.is_linear_sum() || self.multiplier.is_one() {
            return;
        }

        let multiplier = std::mem::replace(&mut self.multiplier, Rational::one());
        let group = self.group();
        if let Some(terms) = self.terms_mut() {
            let children = std::mem::take(&mut terms.children);
            terms.children = children
                .into_values()
                .map(|mut child| {
                    child.multiplier *= &multiplier;
                    child.distribute_multiplier();
                    (child.key_for_group(group), child)
                })
                .collect();
        }
        self.update_hash();
    }

    /// Returns the node with its multiplier set to one, or to its sign if `keep_sign` is set.
    pub fn to_unit_multiplier(mut self, keep_sign: bool) -> Self {
        self.multiplier = if keep_sign && self.multiplier.is_negative() {
            Rational::from(-1)
        } else {
            Rational::one()
        };
        self
    }

    /// Returns the node with its power set to one. A node raised to a symbolic power returns
    /// its base, scaled by the multiplier.
    pub fn to_linear(self) -> Self {
        let (multiplier, base, _) = self.into_parts();
        Expr { multiplier, ..base }
    }

    /// Returns true if the named variable appears anywhere in the node.
    pub fn contains(&self, name: &str) -> bool {
        let in_power = match &self.power {
            Power::Expr(expr) => expr.contains(name),
            Power::Rational(_) => false,
        };
        in_power
            || match &self.node {
                Node::Number | Node::Literal(_) => false,
                Node::Variable(variable) => variable == name,
                Node::Exponential(base) => base.contains(name),
                Node::Function(call) => call.args.iter().any(|arg| arg.contains(name)),
                Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => {
                    terms.iter().any(|child| child.contains(name))
                },
            }
    }

    /// Returns the sorted, unique names of the variables in the node.
    pub fn variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names.sort();
        names.dedup();
        names
    }

    fn collect_variables(&self, names: &mut Vec<String>) {
        if let Power::Expr(expr) = &self.power {
            expr.collect_variables(names);
        }
        match &self.node {
            Node::Number | Node::Literal(_) => {},
            Node::Variable(name) => names.push(name.clone()),
            Node::Exponential(base) => base.collect_variables(names),
            Node::Function(call) => call.args.iter().for_each(|arg| arg.collect_variables(names)),
            Node::PowerSum(terms) | Node::Product(terms) | Node::Sum(terms) => {
                terms.iter().for_each(|child| child.collect_variables(names))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn names() {
        assert!(is_valid_name("x"));
        assert!(is_valid_name("_tmp1"));
        assert!(is_valid_name("Alpha_2"));
        assert!(!is_valid_name("2x"));
        assert!(!is_valid_name("x$"));
        assert!(!is_valid_name(""));
        assert!(Expr::variable("x$").is_err());
    }

    #[test]
    fn predicates() {
        assert!(Expr::zero().is_zero());
        assert!(Expr::one().is_one(false));
        assert!(Expr::number(-1).is_one(true));
        assert!(!Expr::number(-1).is_one(false));
        assert!(Expr::number(4).is_integer());
        assert_eq!(Expr::literal(2).group(), Group::Literal);
        assert_eq!(Expr::zero().value(), CONST_HASH);
    }

    #[test]
    fn integer_power_of_literal() {
        let expr = Expr::with_power(Rational::one(), Expr::literal(2), Power::Rational(Rational::from(3))).unwrap();
        assert_eq!(expr, Expr::number(8));
    }

    #[test]
    fn zero_power() {
        let x = Expr::variable("x").unwrap();
        let expr = Expr::with_power(Rational::from(5), x, Power::Rational(Rational::zero())).unwrap();
        assert_eq!(expr, Expr::number(5));
    }

    #[test]
    fn symbolic_power_promotes() {
        let x = Expr::variable("x").unwrap();
        let y = Expr::variable("y").unwrap();
        let expr = Expr::with_power(Rational::one(), x, Power::Expr(Box::new(y))).unwrap();
        assert_eq!(expr.group(), Group::Exponential);
        assert_eq!(expr.previous_group(), Some(Group::Variable));
        assert_eq!(expr.value(), "x");
    }

    #[test]
    fn variable_listing() {
        let f = Expr::function("f", vec![
            Expr::variable("y").unwrap(),
            Expr::variable("x").unwrap(),
            Expr::variable("y").unwrap(),
        ]);
        assert_eq!(f.variables(), vec!["x".to_string(), "y".to_string()]);
        assert!(f.contains("x"));
        assert!(!f.contains("z"));
    }
}
