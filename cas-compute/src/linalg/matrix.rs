use cas_error::Error;
use std::fmt::{self, Display, Formatter};
use tracing::trace;
use crate::{
    ctxt::Settings,
    error::kind::{DimensionMismatch, IndexOutOfBounds, SingularMatrix},
    symbolic::{
        ops::{add, divide, multiply, subtract},
        Expr,
    },
};
use super::Vector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A matrix of expressions, stored row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Matrix {
    rows: Vec<Vec<Expr>>,
    cols: usize,
}

impl Matrix {
    /// Creates a matrix from its rows, which must all have the same length.
    pub fn from_rows(rows: Vec<Vector>) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vector::len);
        if let Some(row) = rows.iter().find(|row| row.len() != cols) {
            return Err(Error::spanless(DimensionMismatch {
                left: format!("row of length {}", cols),
                right: format!("row of length {}", row.len()),
            }));
        }

        Ok(Matrix {
            rows: rows.into_iter().map(Vector::into_elements).collect(),
            cols,
        })
    }

    /// Creates a single-column matrix from a vector.
    pub fn column(vector: Vector) -> Self {
        Matrix {
            rows: vector.into_elements().into_iter().map(|e| vec![e]).collect(),
            cols: 1,
        }
    }

    /// Creates the identity matrix of the given size.
    pub fn identity(size: usize) -> Self {
        let rows = (0..size)
            .map(|i| (0..size).map(|j| if i == j { Expr::one() } else { Expr::zero() }).collect())
            .collect();
        Matrix { rows, cols: size }
    }

    /// The number of rows.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the row at the given 1-based index as a vector.
    pub fn row(&self, index: usize) -> Result<Vector, Error> {
        index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .map(|row| Vector::new(row.clone()))
            .ok_or_else(|| Error::spanless(IndexOutOfBounds {
                index: index.to_string(),
                len: self.rows.len(),
            }))
    }

    fn shape(&self) -> String {
        format!("{}x{} matrix", self.rows(), self.cols)
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let rows = (0..self.cols)
            .map(|j| self.rows.iter().map(|row| row[j].clone()).collect())
            .collect();
        Matrix { rows, cols: self.rows.len() }
    }

    /// Applies a fallible function to every element.
    pub fn map(self, mut f: impl FnMut(Expr) -> Result<Expr, Error>) -> Result<Self, Error> {
        let rows = self.rows
            .into_iter()
            .map(|row| row.into_iter().map(&mut f).collect::<Result<Vec<_>, _>>())
            .collect::<Result<_, _>>()?;
        Ok(Matrix { rows, cols: self.cols })
    }

    /// Combines the elements of two matrices of the same shape pairwise.
    pub fn zip_with(
        self,
        other: Self,
        mut f: impl FnMut(Expr, Expr) -> Result<Expr, Error>,
    ) -> Result<Self, Error> {
        if self.rows() != other.rows() || self.cols != other.cols {
            return Err(Error::spanless(DimensionMismatch {
                left: self.shape(),
                right: other.shape(),
            }));
        }

        let cols = self.cols;
        let rows = self.rows
            .into_iter()
            .zip(other.rows)
            .map(|(a, b)| a.into_iter().zip(b).map(|(a, b)| f(a, b)).collect::<Result<Vec<_>, _>>())
            .collect::<Result<_, _>>()?;
        Ok(Matrix { rows, cols })
    }

    /// Computes the matrix product.
    pub fn multiply(&self, other: &Self, settings: &Settings) -> Result<Self, Error> {
        if self.cols != other.rows() {
            return Err(Error::spanless(DimensionMismatch {
                left: self.shape(),
                right: other.shape(),
            }));
        }

        let mut rows = Vec::with_capacity(self.rows());
        for row in &self.rows {
            let mut out = Vec::with_capacity(other.cols);
            for j in 0..other.cols {
                let mut sum = Expr::zero();
                for (k, element) in row.iter().enumerate() {
                    let product = multiply(element.clone(), other.rows[k][j].clone(), settings)?;
                    sum = add(sum, product);
                }
                out.push(sum);
            }
            rows.push(out);
        }
        Ok(Matrix { rows, cols: other.cols })
    }

    /// Multiplies the matrix by a column vector.
    pub fn apply(&self, vector: Vector, settings: &Settings) -> Result<Vector, Error> {
        let product = self.multiply(&Matrix::column(vector), settings)?;
        Ok(Vector::new(product.rows.into_iter().flatten().collect()))
    }

    /// Computes the inverse of a square matrix with Gauss-Jordan elimination.
    pub fn invert(&self, settings: &Settings) -> Result<Self, Error> {
        let n = self.rows();
        if n != self.cols {
            return Err(Error::spanless(DimensionMismatch {
                left: self.shape(),
                right: "square matrix".to_string(),
            }));
        }

        let mut left = self.rows.clone();
        let mut right = Matrix::identity(n).rows;

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&r| !left[r][col].is_zero())
                .ok_or_else(|| Error::spanless(SingularMatrix))?;
            left.swap(col, pivot_row);
            right.swap(col, pivot_row);

            let pivot = left[col][col].clone();
            trace!(col, %pivot, "eliminating column");
            for j in 0..n {
                left[col][j] = divide(std::mem::take(&mut left[col][j]), pivot.clone(), settings)?;
                right[col][j] = divide(std::mem::take(&mut right[col][j]), pivot.clone(), settings)?;
            }

            for r in (0..n).filter(|&r| r != col) {
                let factor = left[r][col].clone();
                if factor.is_zero() {
                    continue;
                }
                for j in 0..n {
                    let scaled = multiply(factor.clone(), left[col][j].clone(), settings)?;
                    left[r][j] = subtract(std::mem::take(&mut left[r][j]), scaled);
                    let scaled = multiply(factor.clone(), right[col][j].clone(), settings)?;
                    right[r][j] = subtract(std::mem::take(&mut right[r][j]), scaled);
                }
            }
        }

        Ok(Matrix { rows: right, cols: n })
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "matrix(")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", Vector::new(row.clone()))?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rational::Rational;
    use pretty_assertions::assert_eq;

    fn matrix(rows: &[&[i32]]) -> Matrix {
        let rows = rows
            .iter()
            .map(|row| Vector::new(row.iter().map(|&v| Expr::number(v)).collect()))
            .collect();
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn ragged_rows() {
        let rows = vec![
            Vector::new(vec![Expr::one(), Expr::one()]),
            Vector::new(vec![Expr::one()]),
        ];
        assert!(Matrix::from_rows(rows).unwrap_err().is::<DimensionMismatch>());
    }

    #[test]
    fn transpose() {
        let m = matrix(&[&[1, 2, 3], &[4, 5, 6]]);
        assert_eq!(m.transpose(), matrix(&[&[1, 4], &[2, 5], &[3, 6]]));
    }

    #[test]
    fn product() {
        let settings = Settings::default();
        let a = matrix(&[&[1, 2], &[3, 4]]);
        let b = matrix(&[&[5, 6], &[7, 8]]);
        assert_eq!(a.multiply(&b, &settings).unwrap(), matrix(&[&[19, 22], &[43, 50]]));
    }

    #[test]
    fn inverse() {
        let settings = Settings::default();
        let m = matrix(&[&[2, 0], &[0, 4]]);
        let inverse = m.invert(&settings).unwrap();
        let frac = |num: i32, den: i32| Expr::number(Rational::new(num, den).unwrap());
        let expected = Matrix::from_rows(vec![
            Vector::new(vec![frac(1, 2), Expr::zero()]),
            Vector::new(vec![Expr::zero(), frac(1, 4)]),
        ])
        .unwrap();
        assert_eq!(inverse, expected);

        let m = matrix(&[&[1, 2], &[3, 4]]);
        let product = m.multiply(&m.invert(&settings).unwrap(), &settings).unwrap();
        assert_eq!(product, Matrix::identity(2));
    }

    #[test]
    fn singular() {
        let settings = Settings::default();
        let err = matrix(&[&[1, 2], &[2, 4]]).invert(&settings).unwrap_err();
        assert!(err.is::<SingularMatrix>());
    }

    #[test]
    fn display() {
        assert_eq!(matrix(&[&[1, 2], &[3, 4]]).to_string(), "matrix([1,2],[3,4])");
    }
}
