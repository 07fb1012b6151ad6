//! Parser and evaluator for mathematical expressions.
//!
//! Input is evaluated as it is parsed: numbers are read as exact fractions, names are resolved to
//! variables, and every operator is applied through the rewrite engine in `cas-compute` as soon
//! as its precedence allows. The result is a canonical [`Value`].
//!
//! ```
//! use cas_parser::parse;
//!
//! let value = parse("x^2 + 2x + x^2").unwrap();
//! assert_eq!(value, parse("2x^2 + 2x").unwrap());
//! ```
//!
//! Errors point into the input, and can be rendered with [`ariadne`]:
//!
//! ```
//! use cas_parser::parse;
//!
//! let err = parse("sin(1, 2)").unwrap_err();
//! assert_eq!(err.spans, vec![0..9]);
//! let report = err.build_report("input");
//! ```
//!
//! [`Value`]: cas_compute::value::Value

pub mod parser;
pub mod tokenizer;

pub use parser::{evaluate, parse, Parser};
