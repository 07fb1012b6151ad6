//! Exact rational numbers.
//!
//! Every [`Rational`] is kept in lowest terms with a positive denominator, so two rationals are
//! equal exactly when their numerators and denominators are equal, and the derived
//! [`PartialEq`] and [`Hash`] implementations can be used directly.

use cas_error::Error;
use rug::{ops::{DivRounding, Pow}, Integer};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
    str::FromStr,
};
use super::{
    approx::{self, QUICK_LOWER, QUICK_UPPER},
    error::kind::{DivisionByZero, ExponentTooLarge},
    primitive::{int, int_from_str, perfect_root},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An exact fraction `num / den`, always in lowest terms with `den > 0`.
/// The largest number of bits an exact power may take before it is rejected.
pub const MAX_POWER_BITS: u64 = 1 << 22;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rational {
    num: Integer,
    den: Integer,
}

impl Rational {
    /// Creates a new rational number `num / den`. Returns [`DivisionByZero`] if `den` is zero.
    pub fn new(num: impl Into<Integer>, den: impl Into<Integer>) -> Result<Self, Error> {
        let den = den.into();
        if den == 0 {
            return Err(Error::spanless(DivisionByZero));
        }
        Ok(Self::reduced(num.into(), den))
    }

    /// Reduces the fraction to lowest terms. `den` must be non-zero.
    fn reduced(mut num: Integer, mut den: Integer) -> Self {
        if den < 0 {
            num = -num;
            den = -den;
        }

        let divisor = num.clone().gcd(&den);
        if divisor != 1 {
            num /= &divisor;
            den /= &divisor;
        }

        Self { num, den }
    }

    /// The rational number `0`.
    pub fn zero() -> Self {
        Self { num: int(0), den: int(1) }
    }

    /// The rational number `1`.
    pub fn one() -> Self {
        Self { num: int(1), den: int(1) }
    }

    /// Converts a floating-point number into the exact domain.
    ///
    /// Integral values convert exactly. Magnitudes below `1e-6` or above `1e20` are converted
    /// exactly from their shortest decimal representation; everything else is approximated with
    /// a bounded continued fraction expansion. Returns [`None`] for infinities and NaN.
    ///
    /// ```
    /// use cas_compute::rational::Rational;
    ///
    /// assert_eq!(Rational::convert(0.75), Some(Rational::new(3, 4).unwrap()));
    /// assert_eq!(Rational::convert(0.1), Some(Rational::new(1, 10).unwrap()));
    /// assert_eq!(Rational::convert(f64::NAN), None);
    /// ```
    pub fn convert(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        if value == 0.0 {
            return Some(Self::zero());
        }

        if value.fract() == 0.0 {
            return Integer::from_f64(value).map(Self::from);
        }

        let magnitude = value.abs();
        let (num, den) = if magnitude < QUICK_LOWER || magnitude > QUICK_UPPER {
            approx::quick_conversion(value)?
        } else {
            approx::continued_fraction(value)
        };

        Self::new(num, den).ok()
    }

    /// Returns the numerator.
    pub fn numer(&self) -> &Integer {
        &self.num
    }

    /// Returns the denominator, which is always positive.
    pub fn denom(&self) -> &Integer {
        &self.den
    }

    /// Returns true if this number is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Returns true if this number is one.
    pub fn is_one(&self) -> bool {
        self.num == 1 && self.den == 1
    }

    /// Returns true if this number is less than zero.
    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// Returns true if this number is an integer.
    pub fn is_integer(&self) -> bool {
        self.den == 1
    }

    /// Returns true if this number is an even integer.
    pub fn is_even_integer(&self) -> bool {
        self.is_integer() && self.num.is_even()
    }

    /// Returns the absolute value of this number.
    pub fn abs(&self) -> Self {
        Self { num: self.num.clone().abs(), den: self.den.clone() }
    }

    /// Returns the reciprocal of this number. Returns [`DivisionByZero`] if it is zero.
    pub fn recip(&self) -> Result<Self, Error> {
        Self::new(self.den.clone(), self.num.clone())
    }

    /// Divides this number by another. Returns [`DivisionByZero`] if the divisor is zero.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, Error> {
        if rhs.is_zero() {
            return Err(Error::spanless(DivisionByZero));
        }
        Ok(Self::reduced(int(&self.num * &rhs.den), int(&self.den * &rhs.num)))
    }

    /// Raises this number to an integer power. Returns [`ExponentTooLarge`] if the result would
    /// need more than [`MAX_POWER_BITS`] bits.
    pub fn pow_int(&self, exp: &Integer) -> Result<Self, Error> {
        let magnitude = exp.clone().abs().to_u32().ok_or_else(|| Error::spanless(ExponentTooLarge))?;
        let unit = self.den == 1 && self.num.clone().abs() <= 1;
        let width = u64::from(self.num.significant_bits().max(self.den.significant_bits()));
        if !unit && width * u64::from(magnitude) > MAX_POWER_BITS {
            return Err(Error::spanless(ExponentTooLarge));
        }

        let raised = Self {
            num: self.num.clone().pow(magnitude),
            den: self.den.clone().pow(magnitude),
        };

        if *exp < 0 {
            raised.recip()
        } else {
            Ok(raised)
        }
    }

    /// Divides every factor of `factor` out of the numerator and denominator. Returns the rest
    /// and the number of factors removed, negative if they came from the denominator.
    pub fn remove_factor(&self, factor: &Integer) -> (Self, i64) {
        if *factor <= 1 || self.is_zero() {
            return (self.clone(), 0);
        }

        let (mut num, mut den) = (self.num.clone(), self.den.clone());
        let up = num.remove_factor_mut(factor);
        let down = den.remove_factor_mut(factor);
        (Self { num, den }, i64::from(up) - i64::from(down))
    }

    /// Returns the rational `r` such that `r^k` equals this number, if both the numerator and
    /// denominator are perfect `k`-th powers.
    pub fn perfect_root(&self, k: u32) -> Option<Self> {
        Some(Self {
            num: perfect_root(&self.num, k)?,
            den: perfect_root(&self.den, k)?,
        })
    }

    /// Returns the largest integer less than or equal to this number.
    pub fn floor(&self) -> Self {
        Self::from(self.num.clone().div_floor(&self.den))
    }

    /// Returns the smallest integer greater than or equal to this number.
    pub fn ceil(&self) -> Self {
        Self::from(self.num.clone().div_ceil(&self.den))
    }

    /// Rounds half-way cases towards positive infinity.
    pub fn round(&self) -> Self {
        (self + &Self { num: int(1), den: int(2) }).floor()
    }

    /// Returns the remainder of truncated division, which has the sign of the dividend.
    pub fn trunc_rem(&self, rhs: &Self) -> Result<Self, Error> {
        let quotient = self.checked_div(rhs)?;
        let truncated = Self::from(quotient.num.clone().div_trunc(&quotient.den));
        Ok(self - &(rhs * &truncated))
    }

    /// Converts this number to the nearest `f64`.
    pub fn to_f64(&self) -> f64 {
        self.to_rug().to_f64()
    }

    /// Converts this number to a [`rug::Rational`].
    pub fn to_rug(&self) -> rug::Rational {
        rug::Rational::from((self.num.clone(), self.den.clone()))
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<Integer> for Rational {
    fn from(num: Integer) -> Self {
        Self { num, den: int(1) }
    }
}

impl From<i32> for Rational {
    fn from(num: i32) -> Self {
        Self::from(int(num))
    }
}

impl From<i64> for Rational {
    fn from(num: i64) -> Self {
        Self::from(int(num))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl FromStr for Rational {
    type Err = ();

    /// Parses an integer, decimal or scientific literal, such as `42`, `.25` or `1.5e-3`. The
    /// result is exact: `0.1` is exactly one tenth.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (mantissa, exponent) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(i) => (&s[..i], s[i + 1..].parse::<i64>().map_err(|_| ())?),
            None => (s, 0),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(());
        }

        let digits = int_from_str(&format!("{}{}", whole, fraction)).ok_or(())?;
        let scale = exponent - fraction.len() as i64;
        let power = Self::from(10).pow_int(&int(scale)).map_err(|_| ())?;
        Ok(Self::from(digits) * power)
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        int(&self.num * &other.den).cmp(&int(&other.num * &self.den))
    }
}

impl PartialEq<i32> for Rational {
    fn eq(&self, other: &i32) -> bool {
        self.den == 1 && self.num == *other
    }
}

impl PartialOrd<i32> for Rational {
    fn partial_cmp(&self, other: &i32) -> Option<Ordering> {
        Some(self.num.cmp(&int(&self.den * *other)))
    }
}

impl PartialEq<f64> for Rational {
    fn eq(&self, other: &f64) -> bool {
        self.to_f64() == *other
    }
}

impl PartialOrd<f64> for Rational {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.to_f64().partial_cmp(other)
    }
}

impl Add<&Rational> for &Rational {
    type Output = Rational;

    fn add(self, rhs: &Rational) -> Rational {
        if self.den == rhs.den {
            return Rational::reduced(int(&self.num + &rhs.num), self.den.clone());
        }

        Rational::reduced(
            int(&self.num * &rhs.den) + int(&rhs.num * &self.den),
            int(&self.den * &rhs.den),
        )
    }
}

impl Add for Rational {
    type Output = Rational;

    fn add(self, rhs: Rational) -> Rational {
        &self + &rhs
    }
}

impl AddAssign<&Rational> for Rational {
    fn add_assign(&mut self, rhs: &Rational) {
        *self = &*self + rhs;
    }
}

impl Sub<&Rational> for &Rational {
    type Output = Rational;

    fn sub(self, rhs: &Rational) -> Rational {
        self + &-rhs
    }
}

impl Sub for Rational {
    type Output = Rational;

    fn sub(self, rhs: Rational) -> Rational {
        &self - &rhs
    }
}

impl Mul<&Rational> for &Rational {
    type Output = Rational;

    fn mul(self, rhs: &Rational) -> Rational {
        Rational::reduced(int(&self.num * &rhs.num), int(&self.den * &rhs.den))
    }
}

impl Mul for Rational {
    type Output = Rational;

    fn mul(self, rhs: Rational) -> Rational {
        &self * &rhs
    }
}

impl MulAssign<&Rational> for Rational {
    fn mul_assign(&mut self, rhs: &Rational) {
        *self = &*self * rhs;
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational { num: int(-&self.num), den: self.den.clone() }
    }
}

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational { num: -self.num, den: self.den }
    }
}
