//! Conversion between groups and insertion of children into collections.

use cas_error::Error;
use replace_with::replace_with_or_abort;
use std::collections::BTreeMap;
use crate::{
    ctxt::Settings,
    error::kind::InvalidConversion,
    rational::Rational,
    symbolic::{ops::{add, multiply}, Group},
};
use super::{Expr, Node, Power, Terms, CONST_HASH};

impl Expr {
    /// The identity used to decide whether two terms can be added together.
    pub(crate) fn add_identity(&self) -> String {
        match self.node {
            Node::PowerSum(_) => self.hash(),
            _ => self.value().into_owned(),
        }
    }

    /// The identity used to decide whether two factors can be multiplied by adding their powers.
    pub(crate) fn mul_identity(&self) -> String {
        self.add_identity()
    }

    /// The key of a collection node, suffixed with its power when it is not linear, so that
    /// powers of the same collection do not collide inside a sum.
    fn collection_key(&self) -> String {
        if self.is_linear() {
            self.hash()
        } else {
            format!("({})^{}", self.hash(), self.power.text())
        }
    }

    /// Computes the key this node is stored under when it is a child of a collection of the
    /// given group.
    ///
    /// Terms of a [`Node::PowerSum`] are keyed by their power, since they share a base. In sums
    /// and products, terms that can be combined share a key.
    pub fn key_for_group(&self, target: Group) -> String {
        match self.group() {
            Group::Number => CONST_HASH.to_string(),
            Group::Literal | Group::Variable => match target {
                Group::PowerSum => self.power.text(),
                _ => self.value().into_owned(),
            },
            Group::Exponential => match target {
                Group::PowerSum => self.power.text(),
                Group::Sum if self.previous_group().map_or(false, Group::is_collection) => {
                    self.collection_key()
                },
                _ => self.hash(),
            },
            Group::Function => match target {
                Group::PowerSum => self.power.text(),
                _ => self.hash(),
            },
            Group::PowerSum => match target {
                Group::Product => self.hash(),
                Group::Sum if self.is_linear() => self.value().into_owned(),
                Group::Sum => self.collection_key(),
                Group::PowerSum => self.power.text(),
                _ => self.value().into_owned(),
            },
            Group::Product => match target {
                Group::PowerSum => self.power.text(),
                Group::Sum => self.collection_key(),
                _ => self.hash(),
            },
            Group::Sum => match target {
                Group::PowerSum => self.power.text(),
                Group::Sum => self.collection_key(),
                _ => self.value().into_owned(),
            },
        }
    }

    /// Converts the node into the given group.
    ///
    /// Converting into a collection wraps the node as its only child. A product keeps the
    /// multiplier on the wrapper, while sums keep it on the child. Converting into
    /// [`Group::Exponential`] wraps the base and keeps its power as is, and converting into
    /// [`Group::Number`] discards everything except the multiplier.
    pub fn convert(self, target: Group) -> Result<Expr, Error> {
        let from = self.group();
        let invalid = |reason: &'static str| -> Result<Expr, Error> {
            Err(Error::spanless(InvalidConversion { from, to: target, reason }))
        };

        match target {
            Group::PowerSum | Group::Product | Group::Sum => {
                let (multiplier, child) = if target == Group::Product {
                    let multiplier = self.multiplier.clone();
                    (multiplier, self.to_unit_multiplier(false))
                } else {
                    (Rational::one(), self)
                };

                let value = match target {
                    Group::PowerSum => child.value().into_owned(),
                    _ => String::new(),
                };
                let key = child.key_for_group(target);
                let terms = Terms { value, children: BTreeMap::from([(key, child)]) };
                let node = match target {
                    Group::PowerSum => Node::PowerSum(terms),
                    Group::Product => Node::Product(terms),
                    _ => Node::Sum(terms),
                };

                let mut expr = Expr { multiplier, power: Power::one(), node };
                expr.update_hash();
                Ok(expr)
            },
            Group::Exponential => match self.node {
                Node::Exponential(_) => Ok(self),
                Node::Number if !self.multiplier.is_integer() => {
                    invalid("only integers can become the base of an exponential")
                },
                Node::Number => {
                    let base = Expr::literal(self.multiplier.numer().clone());
                    Ok(Expr {
                        multiplier: Rational::one(),
                        power: Power::one(),
                        node: Node::Exponential(Box::new(base)),
                    })
                },
                _ => {
                    let (multiplier, base, power) = self.into_parts();
                    Ok(Expr { multiplier, power, node: Node::Exponential(Box::new(base)) })
                },
            },
            Group::Number => Ok(Expr::number(self.multiplier)),
            Group::Literal => match self.node {
                Node::Literal(_) => Ok(self),
                Node::Number if self.multiplier.is_integer() => {
                    Ok(Expr::literal(self.multiplier.numer().clone()))
                },
                Node::Number => invalid("only integers can be converted into literals"),
                _ => invalid("only numbers can be converted into literals"),
            },
            Group::Variable | Group::Function if from == target => Ok(self),
            Group::Variable | Group::Function => {
                invalid("nodes can only be converted into numbers, literals, exponentials or collections")
            },
        }
    }

    /// Recomputes the cached canonical value of a sum or product from its children.
    pub(crate) fn update_hash(&mut self) {
        if matches!(self.node, Node::Sum(_) | Node::Product(_)) {
            let hash = self.hash();
            if let Some(terms) = self.terms_mut() {
                terms.value = hash;
            }
        }
    }

    /// Inserts a term into a sum, adding it to the existing term with the same key if there is
    /// one. Linear sums of the same kind are flattened into this one. Terms that cancel are
    /// removed, and a sum left without terms becomes zero.
    ///
    /// If this node is not a sum, the term is added to it with [`add`].
    pub(crate) fn attach(&mut self, child: Expr) {
        if child.is_zero() {
            return;
        }

        if !self.is_composite() {
            replace_with_or_abort(self, |this| add(this, child));
            return;
        }

        let flatten = child.is_linear_sum()
            && child.group() == self.group()
            && (child.group() == Group::Sum || child.value() == self.value());
        if flatten {
            let mut child = child;
            child.distribute_multiplier();
            for grandchild in child.into_children() {
                self.attach(grandchild);
            }
            return;
        }

        let key = child.key_for_group(self.group());
        if let Some(terms) = self.terms_mut() {
            let merged = match terms.children.remove(&key) {
                Some(existing) => add(existing, child),
                None => child,
            };
            if !merged.is_zero() {
                terms.children.insert(key, merged);
            }

            if terms.is_empty() {
                *self = Expr::zero();
                return;
            }
        }
        self.update_hash();
    }

    /// Inserts a factor into a product, multiplying it with the existing factor with the same
    /// key if there is one. The multiplier of the factor is moved onto the product, linear
    /// products are flattened into this one, and factors that reduce to one are dropped. A
    /// product left without factors becomes its multiplier.
    ///
    /// If this node is not a product, the factor is multiplied with it using [`multiply`].
    pub(crate) fn combine(&mut self, child: Expr, settings: &Settings) -> Result<(), Error> {
        if !matches!(self.node, Node::Product(_)) {
            let this = std::mem::take(self);
            *self = multiply(this, child, settings)?;
            return Ok(());
        }

        let mut child = child;
        self.multiplier *= &child.multiplier;
        child.multiplier = Rational::one();

        if matches!(child.node, Node::Product(_)) && child.is_linear() {
            for grandchild in child.into_children() {
                self.combine(grandchild, settings)?;
                if !matches!(self.node, Node::Product(_)) {
                    return Ok(());
                }
            }
            return Ok(());
        }

        if !child.is_constant() {
            let key = child.key_for_group(Group::Product);
            let existing = self.terms_mut().and_then(|terms| terms.children.remove(&key));
            let mut product = match existing {
                Some(existing) => multiply(existing, child, settings)?,
                None => child,
            };

            self.multiplier *= &product.multiplier;
            product.multiplier = Rational::one();

            if !product.is_constant() {
                let flatten = matches!(product.node, Node::Product(_)) && product.is_linear();
                let new_key = product.key_for_group(Group::Product);
                if new_key == key && !flatten {
                    if let Some(terms) = self.terms_mut() {
                        terms.children.insert(key, product);
                    }
                } else {
                    self.combine(product, settings)?;
                    return Ok(());
                }
            }
        }

        if self.multiplier.is_zero() {
            *self = Expr::zero();
            return Ok(());
        }
        if self.terms().map_or(false, Terms::is_empty) {
            *self = Expr::number(std::mem::take(&mut self.multiplier));
            return Ok(());
        }
        self.update_hash();
        Ok(())
    }

    /// Simplifies a collection that no longer needs to be one. A linear collection with a
    /// single child becomes that child, scaled by the collection's multiplier; an empty sum
    /// becomes zero and an empty product becomes its multiplier.
    pub(crate) fn collapse(self) -> Expr {
        let Some(terms) = self.terms() else {
            return self;
        };

        if terms.is_empty() {
            return match self.node {
                Node::Product(_) => Expr::number(self.multiplier),
                _ => Expr::zero(),
            };
        }

        if terms.len() == 1 && self.is_linear() {
            let multiplier = self.multiplier.clone();
            if let Some(mut child) = self.into_children().pop() {
                child.multiplier *= &multiplier;
                if child.multiplier.is_zero() {
                    return Expr::zero();
                }
                return child;
            }
            return Expr::zero();
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::variable("x").unwrap()
    }

    #[test]
    fn keys() {
        let mut x2 = x();
        x2.power = Power::Rational(Rational::from(2));
        assert_eq!(x2.key_for_group(Group::PowerSum), "2");
        assert_eq!(x2.key_for_group(Group::Sum), "x");
        assert_eq!(x2.key_for_group(Group::Product), "x");
        assert_eq!(Expr::number(3).key_for_group(Group::Sum), CONST_HASH);
    }

    #[test]
    fn raised_product_keys_apart_from_product_in_sum() {
        let y = Expr::variable("y").unwrap();
        let z = Expr::variable("z").unwrap();
        let xy = multiply(x(), y, &Settings::default()).unwrap();
        let raised = Expr::with_power(Rational::one(), xy.clone(), Power::Expr(Box::new(z))).unwrap();

        assert_ne!(raised.key_for_group(Group::Sum), xy.key_for_group(Group::Sum));
        assert_eq!(raised.key_for_group(Group::Product), xy.key_for_group(Group::Product));
    }

    #[test]
    fn convert_to_product() {
        let mut term = x();
        term.multiplier = Rational::from(3);
        let product = term.convert(Group::Product).unwrap();
        assert_eq!(product.group(), Group::Product);
        assert_eq!(product.multiplier, Rational::from(3));
        assert_eq!(product.text(), "3*x");
    }

    #[test]
    fn convert_to_exponential() {
        let expr = Expr::number(2).convert(Group::Exponential).unwrap();
        assert_eq!(expr.group(), Group::Exponential);
        assert_eq!(expr.previous_group(), Some(Group::Literal));
        assert_eq!(expr.power(), &Power::one());
        assert!(expr.is_linear());
        assert_eq!(expr.text(), "2");

        let mut x2 = x();
        x2.power = Power::Rational(Rational::from(2));
        let raised = x2.convert(Group::Exponential).unwrap();
        assert_eq!(raised.power(), &Power::Rational(Rational::from(2)));
        assert_eq!(raised.text(), "x^2");

        let half = Expr::number(Rational::new(1, 2).unwrap());
        assert!(half.convert(Group::Exponential).is_err());
    }

    #[test]
    fn convert_to_literal() {
        assert_eq!(Expr::number(7).convert(Group::Literal).unwrap(), Expr::literal(7));
        let err = Expr::number(Rational::new(7, 2).unwrap()).convert(Group::Literal).unwrap_err();
        assert!(err.is::<InvalidConversion>());
        assert!(x().convert(Group::Literal).is_err());
    }

    #[test]
    fn convert_to_number() {
        let mut term = x();
        term.multiplier = Rational::from(4);
        assert_eq!(term.convert(Group::Number).unwrap(), Expr::number(4));
    }

    #[test]
    fn cancelling_terms_empty_the_sum() {
        let mut sum = x().convert(Group::Sum).unwrap();
        sum.attach(x().negate());
        assert!(sum.is_zero());
    }

    #[test]
    fn product_flattens_factor_that_became_linear_product() {
        let settings = Settings::default();
        let (y, z) = (Expr::variable("y").unwrap(), Expr::variable("z").unwrap());
        let xy = multiply(x(), y.clone(), &settings).unwrap();
        let cube_root = |p: i64| {
            Expr::with_power(Rational::one(), xy.clone(), Power::Rational(Rational::new(p, 3).unwrap()))
                .unwrap()
        };

        let mut product = cube_root(1).convert(Group::Product).unwrap();
        product.combine(z.clone(), &settings).unwrap();
        product.combine(cube_root(2), &settings).unwrap();
        product.combine(x().invert().unwrap(), &settings).unwrap();

        assert_eq!(product, multiply(y, z, &settings).unwrap());
    }

    #[test]
    fn product_drops_unit_factors() {
        let settings = Settings::default();
        let mut product = x().convert(Group::Product).unwrap();
        product.combine(x().invert().unwrap(), &settings).unwrap();
        assert!(product.is_one(false));
    }
}
