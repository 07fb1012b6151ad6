//! Exact symbolic computation: rational numbers, canonical expression trees, and the rewrite
//! engine that combines them.
//!
//! Expressions are usually built by the parser in `cas-parser`, which evaluates the input with
//! the operations in [`symbolic::ops`] as it reads it. The operations can also be used directly:
//!
//! ```
//! use cas_compute::ctxt::Settings;
//! use cas_compute::rational::Rational;
//! use cas_compute::symbolic::{ops::{multiply, pow}, SymExpr};
//!
//! let settings = Settings::default();
//! let x = SymExpr::variable("x").unwrap();
//! let half = SymExpr::number(Rational::new(1, 2).unwrap());
//!
//! // sqrt(x^2) keeps the sign of x
//! let square = multiply(x.clone(), x, &settings).unwrap();
//! let root = pow(square, half, &settings).unwrap();
//! assert_eq!(root.to_string(), "abs(x)");
//! ```

pub mod approx;
pub mod consts;
pub mod ctxt;
pub mod error;
pub mod funcs;
pub mod linalg;
pub mod primitive;
pub mod rational;
pub mod symbolic;
pub mod value;
