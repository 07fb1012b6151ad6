//! Conversion of floating-point numbers into exact fractions.
//!
//! This is the only place where floating-point input enters the exact domain, so every number
//! parsed from a decimal literal or produced by numeric evaluation passes through here.

use rug::{ops::Pow, Integer};
use super::primitive::{int, int_from_f64, int_from_str};

/// The continued fraction expansion stops once the approximation is this close to the input.
pub const EPSILON: f64 = 1e-13;

/// The maximum number of terms computed in the continued fraction expansion.
pub const MAX_TERMS: usize = 30;

/// The absolute upper bound on iterations of the continued fraction loop.
pub const HARD_CAP: usize = 10_000;

/// Magnitudes below this value are converted with [`quick_conversion`].
pub const QUICK_LOWER: f64 = 1e-6;

/// Magnitudes above this value are converted with [`quick_conversion`].
pub const QUICK_UPPER: f64 = 1e20;

/// Approximates the given float as a fraction using its continued fraction expansion, returning
/// the numerator and denominator.
///
/// The expansion stops when the remaining fractional part is smaller than [`EPSILON`], when the
/// convergent is within [`EPSILON`] of the input, or after [`MAX_TERMS`] terms.
///
/// See
/// [Wikipedia](https://en.wikipedia.org/wiki/Continued_fraction#Calculating_continued_fraction_representations)
/// for more information.
pub fn continued_fraction(value: f64) -> (Integer, Integer) {
    // the two most recent convergents
    let (mut n1, mut d1) = (int(0), int(1));
    let (mut n2, mut d2) = (int(1), int(0));

    let mut q = value;
    let mut num = int(0);
    let mut den = int(1);

    for term in 1..=HARD_CAP {
        let a = int_from_f64(q.floor());
        num = n1.clone() + int(&a * &n2);
        den = d1.clone() + int(&a * &d2);

        let e = q - q.floor();
        if e < EPSILON {
            break;
        }

        n1 = std::mem::replace(&mut n2, num.clone());
        d1 = std::mem::replace(&mut d2, den.clone());
        q = 1.0 / e;

        if (num.to_f64() / den.to_f64() - value).abs() < EPSILON || term > MAX_TERMS {
            break;
        }
    }

    (num, den)
}

/// Converts the given float exactly, using the digits of its shortest round-trip decimal
/// representation. Used for very small and very large magnitudes, where the continued fraction
/// expansion would need an excessive number of terms.
pub fn quick_conversion(value: f64) -> Option<(Integer, Integer)> {
    let text = format!("{:e}", value.abs());
    let (mantissa, exponent) = text.split_once('e')?;
    let exponent = exponent.parse::<i64>().ok()?;

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = int_from_str(&format!("{}{}", whole, fraction))?;
    let shift = exponent - fraction.len() as i64;

    let ten = int(10);
    let (mut num, den) = if shift >= 0 {
        (digits * ten.pow(u32::try_from(shift).ok()?), int(1))
    } else {
        (digits, ten.pow(u32::try_from(-shift).ok()?))
    };

    if value < 0.0 {
        num = -num;
    }
    Some((num, den))
}
