// Decimal - Arbitrary-precision decimal used for fractions and token amounts
// Principle: exact add/sub, products and quotients rounded to a fixed number of
// significant digits, plain normalized text everywhere ("0.2", never "2E-1")

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// Significant digits kept by multiplication and division
pub const PRECISION: u64 = 34;

/// Largest decimal exponent accepted from text input, in either direction
pub const MAX_EXPONENT: i64 = 96;

/// Decimal number with no upper bound on magnitude
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(BigDecimal);

impl Decimal {
    /// `mantissa × 10^-scale`, e.g. `Decimal::new(13, 2)` is 0.13
    pub fn new(mantissa: i64, scale: u32) -> Self {
        Self(BigDecimal::new(BigInt::from(mantissa), i64::from(scale)))
    }

    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    pub fn one() -> Self {
        Self::new(1, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.cmp(&BigDecimal::zero()) == Ordering::Less
    }

    /// Quotient rounded to `PRECISION` significant digits; `None` for a zero divisor
    pub fn checked_div(&self, divisor: &Decimal) -> Option<Decimal> {
        if divisor.is_zero() {
            return None;
        }
        Some(Self((self.0.clone() / divisor.0.clone()).with_prec(PRECISION)))
    }

    /// Round to `dp` decimal places
    pub fn round_dp(&self, dp: u32) -> Decimal {
        Self(self.0.round(i64::from(dp)))
    }

    /// Drop the fractional part
    pub fn trunc(&self) -> Decimal {
        Self(self.0.with_scale(0))
    }

    pub fn abs(&self) -> Decimal {
        Self(self.0.abs())
    }

    /// Integer part, `None` if negative or wider than u64
    pub fn to_u64(&self) -> Option<u64> {
        self.trunc().to_string().parse().ok()
    }

    /// Integer part, `None` if negative or wider than u128
    pub fn to_u128(&self) -> Option<u128> {
        self.trunc().to_string().parse().ok()
    }

    /// Lossy conversion for display
    pub fn to_f64(&self) -> Option<f64> {
        self.to_string().parse().ok()
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Self(BigDecimal::new(BigInt::from(value), 0))
    }
}

impl From<u128> for Decimal {
    fn from(value: u128) -> Self {
        Self(BigDecimal::new(BigInt::from(value), 0))
    }
}

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;

    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 + &rhs.0)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;

    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 - &rhs.0)
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;

    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal((&self.0 * &rhs.0).with_prec(PRECISION))
    }
}

/// Decimal text errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDecimalError {
    #[error("invalid decimal: {0}")]
    Invalid(String),

    #[error("decimal exponent out of range: {0}")]
    ExponentOutOfRange(String),
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = BigDecimal::from_str(s.trim()).map_err(|_| ParseDecimalError::Invalid(s.to_string()))?;
        let (digits, scale) = value.normalized().as_bigint_and_exponent();
        if !digits.is_zero() && scale.abs() > MAX_EXPONENT {
            return Err(ParseDecimalError::ExponentOutOfRange(s.to_string()));
        }
        Ok(Self(value))
    }
}

/// Plain notation with trailing zeros removed
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (digits, scale) = self.0.normalized().as_bigint_and_exponent();
        if digits.is_zero() {
            return f.write_str("0");
        }

        let mut text = digits.magnitude().to_string();
        if scale <= 0 {
            text.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        } else {
            let scale = scale as usize;
            if text.len() <= scale {
                text = format!("0.{}{}", "0".repeat(scale - text.len()), text);
            } else {
                text.insert(text.len() - scale, '.');
            }
        }
        if digits.sign() == Sign::Minus {
            text.insert(0, '-');
        }
        f.write_str(&text)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DecimalVisitor)
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or decimal string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Decimal::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal(BigDecimal::new(BigInt::from(v), 0)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("non-finite decimal: {}", v)));
        }
        // Debug gives the shortest round-trip text (0.13, 1e27)
        Decimal::from_str(&format!("{:?}", v)).map_err(E::custom)
    }
}
