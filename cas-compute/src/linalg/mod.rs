//! Vectors and matrices of expressions.
//!
//! These are minimal containers: element-wise arithmetic, broadcasting of scalars, the dot
//! product, transposition and inversion. Every element is an exact [`Expr`](crate::symbolic::Expr),
//! so inversion works on symbolic matrices as well.

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
