//! FHIR `decimal` values
//!
//! FHIR decimals carry their precision in the JSON text: `1.50` and `1.5` are
//! different values on the wire. [`Decimal`] keeps the digits and scale it was
//! read with so a parse/serialize cycle writes back the same number. It relies
//! on serde_json's `arbitrary_precision` feature to see the original text.
//!
//! Exponent forms such as `1e2` are accepted and written back in plain
//! notation (`100`).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::de::{Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;

use super::error::Error;

/// A decimal number that keeps its scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Decimal(rust_decimal::Decimal);

impl Decimal {
    /// `num * 10^-scale`, e.g. `Decimal::new(150, 2)` is `1.50`
    pub fn new(num: i64, scale: u32) -> Self {
        Decimal(rust_decimal::Decimal::new(num, scale))
    }

    /// Closest decimal to `value`, `None` for NaN, infinities and
    /// out-of-range magnitudes
    pub fn from_f64(value: f64) -> Option<Self> {
        rust_decimal::Decimal::from_f64(value).map(Decimal)
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    /// Digits after the decimal point
    pub fn scale(&self) -> u32 {
        self.0.scale()
    }

    pub fn value(&self) -> rust_decimal::Decimal {
        self.0
    }
}

impl From<rust_decimal::Decimal> for Decimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for rust_decimal::Decimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl From<i32> for Decimal {
    fn from(value: i32) -> Self {
        Decimal(value.into())
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(value.into())
    }
}

impl From<u32> for Decimal {
    fn from(value: u32) -> Self {
        Decimal(value.into())
    }
}

impl FromStr for Decimal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        rust_decimal::Decimal::from_str_exact(s)
            .or_else(|_| rust_decimal::Decimal::from_scientific(s))
            .map(Decimal)
            .map_err(|e| Error::InvalidFieldValue(format!("'{}' is not a FHIR decimal: {}", s, e)))
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Self {
        iter.fold(Decimal::default(), Add::add)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.0.to_string()).map_err(ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        number
            .to_string()
            .parse()
            .map_err(Error::into_de_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn round_trip(text: &str) -> String {
        let value: Decimal = serde_json::from_str(text).unwrap();
        serde_json::to_string(&value).unwrap()
    }

    #[test]
    fn test_scale_is_kept() {
        assert_eq!(round_trip("1.50"), "1.50");
        assert_eq!(round_trip("72"), "72");
        assert_eq!(round_trip("0.000100"), "0.000100");
        assert_eq!(round_trip("-3.0"), "-3.0");
    }

    #[test]
    fn test_integer_stays_integer_in_value() {
        let value: Decimal = serde_json::from_value(json!(72)).unwrap();
        assert_eq!(value.scale(), 0);
        assert_eq!(serde_json::to_value(value).unwrap(), json!(72));
    }

    #[test]
    fn test_trailing_zero_survives_value_tree() {
        let tree: Value = serde_json::from_str(r#"{"value": 1.50}"#).unwrap();
        let value: Decimal = serde_json::from_value(tree["value"].clone()).unwrap();
        assert_eq!(value, Decimal::new(150, 2));
        assert_eq!(serde_json::to_string(&value).unwrap(), "1.50");
    }

    #[test]
    fn test_exponent_is_written_plain() {
        assert_eq!(round_trip("1e2"), "100");
        assert_eq!(round_trip("2.5e-3"), "0.0025");
    }

    #[test]
    fn test_rejects_non_numbers() {
        assert!(serde_json::from_str::<Decimal>(r#""1.5""#).is_err());
        assert!("abc".parse::<Decimal>().is_err());
    }

    #[test]
    fn test_arithmetic_keeps_scale() {
        let total: Decimal = [Decimal::new(13557, 2), Decimal::new(205, 1)].into_iter().sum();
        assert_eq!(total.to_string(), "156.07");
        assert_eq!((Decimal::new(100, 0) * Decimal::new(75, 2)).to_string(), "75.00");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Decimal::from_f64(72.5), Some(Decimal::new(725, 1)));
        assert!(Decimal::from_f64(f64::NAN).is_none());
    }
}
