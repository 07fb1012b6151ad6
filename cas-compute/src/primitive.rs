//! Functions to construct [`Integer`]s and [`Float`]s from various types.

use rug::{ops::Pow, Assign, Float, Integer};

/// The number of bits of precision to use when numerically evaluating functions.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates an [`Integer`] from a string slice of decimal digits, if it is one.
pub fn int_from_str(s: &str) -> Option<Integer> {
    Integer::from_str_radix(s, 10).ok()
}

/// Creates an [`Integer`] from the integral part of an `f64`. Returns zero for non-finite input.
pub fn int_from_f64(f: f64) -> Integer {
    Integer::from_f64(f.trunc()).unwrap_or_default()
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Returns the integer `r` such that `r^k = n`, if there is one.
///
/// Odd roots of negative numbers are negative; even roots of negative numbers do not exist.
pub fn perfect_root(n: &Integer, k: u32) -> Option<Integer> {
    if k == 0 {
        return None;
    }

    if *n < 0 {
        if k % 2 == 0 {
            return None;
        }
        return perfect_root(&int(-n), k).map(|r| -r);
    }

    let root = n.clone().root(k);
    if root.clone().pow(k) == *n {
        Some(root)
    } else {
        None
    }
}

/// Splits a non-negative integer into `(outside, inside)` such that `outside^2 * inside = n`, with
/// as much of `n` moved outside of the square root as trial division by small primes can find.
pub fn split_square(n: &Integer) -> (Integer, Integer) {
    if n.is_perfect_square() {
        return (n.clone().sqrt(), int(1));
    }

    let mut outside = int(1);
    let mut inside = int(1);
    let mut rest = n.clone();

    let mut factor = int(2);
    while factor < 10_000 && int(&factor * &factor) <= rest {
        let mut count = 0u32;
        while rest.is_divisible(&factor) {
            rest /= &factor;
            count += 1;
        }

        for _ in 0..count / 2 {
            outside *= &factor;
        }
        if count % 2 == 1 {
            inside *= &factor;
        }

        factor += 1;
    }

    if rest.is_perfect_square() {
        outside *= rest.sqrt();
    } else {
        inside *= rest;
    }

    (outside, inside)
}
