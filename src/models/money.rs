//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) so that savings allocation is
//! exact: splitting a monthly balance across goals never creates or loses a
//! fraction of a cent. Files exchange amounts as decimal currency units.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use balance::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use balance::models::Money;
    /// assert_eq!(Money::from_units(2000).cents(), 200_000);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    /// Create a Money amount from a decimal, rounding to the nearest cent
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// The amount as a decimal number of currency units
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Clamp negative amounts to zero
    pub const fn non_negative(&self) -> Self {
        if self.0 < 0 {
            Self(0)
        } else {
            *self
        }
    }

    /// Multiply by a whole factor
    pub const fn times(&self, factor: i64) -> Self {
        Self(self.0 * factor)
    }

    /// Split into `parts` shares that differ by at most one cent.
    ///
    /// The first `self % parts` shares carry the extra cent, so the shares
    /// always sum back to `self`. Returns an empty vector for zero parts.
    pub fn split_evenly(&self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.0 / n;
        let extra = self.0 % n;
        (0..n)
            .map(|i| Self(base + if i < extra { 1 } else { 0 }))
            .collect()
    }

    /// Percentage this amount represents of `total` (0.0 when total is zero)
    pub fn percent_of(&self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.0 as f64 / total.0 as f64 * 100.0
        }
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "$-10.50", "S/ 10.50",
    /// "10", "1,250.75". Digits past the second decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let trimmed = s.trim();

        let (mut negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        // Currency prefix ("$", "S/", "PEN"), which may precede the sign
        let rest = rest.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-');
        let rest = match rest.strip_prefix('-') {
            Some(_) if negative => return Err(invalid()),
            Some(unsigned) => {
                negative = true;
                unsigned
            }
            None => rest,
        };

        let digits: String = rest
            .chars()
            .filter(|c| *c != ',' && !c.is_whitespace())
            .collect();
        let (whole, frac) = digits.split_once('.').unwrap_or((digits.as_str(), ""));

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_cents = frac
            .chars()
            .chain(std::iter::repeat('0'))
            .take(2)
            .filter_map(|c| c.to_digit(10))
            .fold(0i64, |acc, d| acc * 10 + i64::from(d));

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Whole currency units as Money, or `None` if the amount does not fit
    pub fn checked_from_units(units: i64) -> Option<Self> {
        units.checked_mul(100).map(Self)
    }

    /// A decimal amount as Money, or `None` if it is not finite or does not fit
    pub fn checked_from_decimal(value: f64) -> Option<Self> {
        let cents = (value * 100.0).round();
        if cents.is_finite() && cents >= i64::MIN as f64 && cents < i64::MAX as f64 {
            Some(Self(cents as i64))
        } else {
            None
        }
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_i64(self.units())
        } else {
            serializer.serialize_f64(self.as_decimal())
        }
    }
}

/// An amount as written in a file: a number of currency units or text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Whole(i64),
    Decimal(f64),
    Text(String),
}

impl RawAmount {
    pub fn to_money(&self) -> Result<Money, MoneyParseError> {
        match self {
            Self::Whole(units) => Money::checked_from_units(*units)
                .ok_or_else(|| MoneyParseError::InvalidFormat(units.to_string())),
            Self::Decimal(value) => Money::checked_from_decimal(*value)
                .ok_or_else(|| MoneyParseError::InvalidFormat(value.to_string())),
            Self::Text(text) => Money::parse(text),
        }
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(units) => write!(f, "{}", units),
            Self::Decimal(value) => write!(f, "{}", value),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawAmount::deserialize(deserializer)?
            .to_money()
            .map_err(serde::de::Error::custom)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "0.05");
        assert_eq!(Money::from_cents(-250).format_with_symbol("S/ "), "-S/ 2.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((-a).cents(), -1000);
        assert_eq!(Money::from_cents(-3).non_negative(), Money::zero());
        assert_eq!(a.times(6).cents(), 6000);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("S/ 10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("1,250.75").unwrap().cents(), 125075);
        assert_eq!(Money::parse("10.509").unwrap().cents(), 1050);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse(".").is_err());
    }

    #[test]
    fn test_parse_sign_after_currency_prefix() {
        assert_eq!(Money::parse("$-10").unwrap().cents(), -1000);
        assert_eq!(Money::parse("S/ -2.50").unwrap().cents(), -250);
        assert!(Money::parse("-$-10").is_err());
    }

    #[test]
    fn test_parse_rejects_non_ascii_fraction() {
        assert_eq!(
            Money::parse("12.5€"),
            Err(MoneyParseError::InvalidFormat("12.5€".to_string()))
        );
        assert!(Money::parse("12.€5").is_err());
        assert!(Money::parse("1٢.50").is_err());
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(Money::parse("999999999999999999").is_err());
        assert!(Money::parse("92233720368547758.08").is_err());
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_amounts() {
        assert!(serde_json::from_str::<Money>("\"12.5€\"").is_err());
        assert!(serde_json::from_str::<Money>("9223372036854775807").is_err());
        assert!(serde_json::from_str::<Money>("1e300").is_err());
        assert_eq!(Money::checked_from_units(i64::MAX), None);
    }

    #[test]
    fn test_split_evenly_conserves_cents() {
        let shares = Money::from_cents(1001).split_evenly(3);
        assert_eq!(
            shares,
            vec![
                Money::from_cents(334),
                Money::from_cents(334),
                Money::from_cents(333)
            ]
        );
        assert_eq!(shares.iter().sum::<Money>(), Money::from_cents(1001));
        assert!(Money::from_cents(5).split_evenly(0).is_empty());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(Money::from_units(25).percent_of(Money::from_units(100)), 25.0);
        assert_eq!(Money::from_units(25).percent_of(Money::zero()), 0.0);
    }

    #[test]
    fn test_serialization_uses_currency_units() {
        assert_eq!(serde_json::to_string(&Money::from_units(2000)).unwrap(), "2000");
        assert_eq!(serde_json::to_string(&Money::from_cents(1050)).unwrap(), "10.5");

        let whole: Money = serde_json::from_str("2000").unwrap();
        let decimal: Money = serde_json::from_str("10.5").unwrap();
        let text: Money = serde_json::from_str("\"1,250.00\"").unwrap();
        assert_eq!(whole.cents(), 200_000);
        assert_eq!(decimal.cents(), 1050);
        assert_eq!(text.cents(), 125_000);
    }
}
