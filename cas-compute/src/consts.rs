//! Constants substituted by the parser for the names `PI` and `E`. Both are computed with
//! arbitrary precision and then converted into exact fractions, so they are rational
//! approximations.

use once_cell::sync::Lazy;
use super::{primitive::float, rational::Rational};

/// The names of the constants, which cannot be reassigned.
pub const NAMES: [&str; 2] = ["PI", "E"];

/// An approximation of pi.
pub static PI: Lazy<Rational> = Lazy::new(|| {
    Rational::convert(float(-1).acos().to_f64()).unwrap_or_default()
});

/// An approximation of Euler's number.
pub static E: Lazy<Rational> = Lazy::new(|| {
    Rational::convert(float(1).exp().to_f64()).unwrap_or_default()
});

/// Returns the constant with the given name.
pub fn get(name: &str) -> Option<Rational> {
    match name {
        "PI" => Some(PI.clone()),
        "E" => Some(E.clone()),
        _ => None,
    }
}
