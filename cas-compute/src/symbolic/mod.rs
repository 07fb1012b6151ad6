//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions are represented as a tree of [`SymExpr`] nodes. Unlike a syntax tree,
//! the tree is kept in a canonical form at all times: every node is built by the operations in
//! [`ops`], which merge like terms, collect powers of the same base, and flatten nested sums and
//! products as they go.
//!
//! For example, `x + (y + z)` is represented as a single [`Node::Sum`] node with _three_
//! children, `x`, `y`, and `z`, and `x*x` is represented as the variable `x` raised to the power
//! of `2`.
//!
//! ```
//! use cas_compute::symbolic::{ops::add, Group, SymExpr};
//!
//! let x = SymExpr::variable("x").unwrap();
//! let y = SymExpr::variable("y").unwrap();
//! let z = SymExpr::variable("z").unwrap();
//!
//! let sum = add(x, add(y, z));
//! assert_eq!(sum.group(), Group::Sum);
//! assert_eq!(sum.terms().map(|terms| terms.len()), Some(3));
//! assert_eq!(sum.to_string(), "x+y+z");
//! ```
//!
//! # Groups
//!
//! Each node belongs to a [`Group`], which decides how it is combined with other nodes. The
//! groups are ranked; when two nodes are combined, the node of higher rank is usually the one
//! that absorbs the other.

pub mod expr;
mod group;
pub mod ops;

pub use expr::{Expr, Expr as SymExpr, Node, Power};
pub use group::Group;
