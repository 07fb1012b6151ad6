use cas_error::Error;
use std::fmt::{self, Display, Formatter};
use crate::{
    ctxt::Settings,
    error::kind::{DimensionMismatch, IndexOutOfBounds},
    symbolic::{
        ops::{add, multiply},
        Expr,
    },
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A vector of expressions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector {
    elements: Vec<Expr>,
}

impl Vector {
    /// Creates a vector with the given elements.
    pub fn new(elements: Vec<Expr>) -> Self {
        Vector { elements }
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The elements of the vector.
    pub fn elements(&self) -> &[Expr] {
        &self.elements
    }

    pub(crate) fn into_elements(self) -> Vec<Expr> {
        self.elements
    }

    /// Returns the element at the given 1-based index.
    pub fn get(&self, index: usize) -> Result<&Expr, Error> {
        index
            .checked_sub(1)
            .and_then(|i| self.elements.get(i))
            .ok_or_else(|| Error::spanless(IndexOutOfBounds {
                index: index.to_string(),
                len: self.elements.len(),
            }))
    }

    /// Applies a fallible function to every element.
    pub fn map(self, f: impl FnMut(Expr) -> Result<Expr, Error>) -> Result<Self, Error> {
        Ok(Vector { elements: self.elements.into_iter().map(f).collect::<Result<_, _>>()? })
    }

    /// Combines the elements of two vectors of the same length pairwise.
    pub fn zip_with(
        self,
        other: Self,
        mut f: impl FnMut(Expr, Expr) -> Result<Expr, Error>,
    ) -> Result<Self, Error> {
        if self.len() != other.len() {
            return Err(Error::spanless(DimensionMismatch {
                left: format!("vector of length {}", self.len()),
                right: format!("vector of length {}", other.len()),
            }));
        }

        let elements = self.elements
            .into_iter()
            .zip(other.elements)
            .map(|(a, b)| f(a, b))
            .collect::<Result<_, _>>()?;
        Ok(Vector { elements })
    }

    /// Computes the dot product of two vectors of the same length.
    pub fn dot(self, other: Self, settings: &Settings) -> Result<Expr, Error> {
        let products = self.zip_with(other, |a, b| multiply(a, b, settings))?;
        Ok(products.elements.into_iter().fold(Expr::zero(), add))
    }
}

impl Display for Vector {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", element)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::ops::subtract;
    use pretty_assertions::assert_eq;

    fn vector(values: &[i32]) -> Vector {
        Vector::new(values.iter().map(|&v| Expr::number(v)).collect())
    }

    #[test]
    fn indexing() {
        let v = vector(&[4, 5, 6]);
        assert_eq!(v.get(1).unwrap(), &Expr::number(4));
        assert!(v.get(0).unwrap_err().is::<IndexOutOfBounds>());
        assert!(v.get(4).is_err());
    }

    #[test]
    fn elementwise() {
        let sum = vector(&[1, 2]).zip_with(vector(&[3, 4]), |a, b| Ok(add(a, b))).unwrap();
        assert_eq!(sum, vector(&[4, 6]));

        let err = vector(&[1]).zip_with(vector(&[1, 2]), |a, b| Ok(subtract(a, b))).unwrap_err();
        assert!(err.is::<DimensionMismatch>());
    }

    #[test]
    fn dot_product() {
        let settings = Settings::default();
        let dot = vector(&[1, 2, 3]).dot(vector(&[4, 5, 6]), &settings).unwrap();
        assert_eq!(dot, Expr::number(32));
    }

    #[test]
    fn display() {
        assert_eq!(vector(&[1, 2]).to_string(), "[1,2]");
        assert_eq!(Vector::default().to_string(), "[]");
    }
}
