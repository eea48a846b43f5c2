//! Money type for representing currency amounts
//!
//! Internally stores amounts in minor units (hundredths of the currency unit,
//! halalas for SAR) as i64 to avoid floating-point precision issues. Catalog
//! prices are whole currency units, so most values are built with
//! [`Money::from_units`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Largest amount accepted from user input: one trillion riyals
pub const MAX_AMOUNT: Money = Money::from_units(1_000_000_000_000);

/// Amount in minor units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use budget_wizard::models::Money;
    /// let amount = Money::from_minor(1050); // 10.50
    /// assert_eq!(amount.units(), 10);
    /// ```
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Create a Money amount from whole currency units
    ///
    /// # Examples
    /// ```
    /// use budget_wizard::models::Money;
    /// let amount = Money::from_units(195_975);
    /// assert_eq!(amount.minor(), 19_597_500);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Halalas, always 0-99
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Saturates instead of wrapping
    pub const fn times(&self, quantity: i64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }

    /// Split into `parts` amounts that sum exactly to `self`
    ///
    /// The remainder is spread one minor unit at a time over the first parts.
    pub fn split_evenly(&self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let base = self.0.div_euclid(n);
        let remainder = self.0.rem_euclid(n) as usize;
        (0..parts)
            .map(|i| Money(if i < remainder { base + 1 } else { base }))
            .collect()
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "SAR 10.50", "1,000", "10".
    /// Digits after the second decimal place are dropped. Amounts above
    /// [`MAX_AMOUNT`] are rejected.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(input.to_string());

        let (negative, rest) = match input.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, input),
        };
        let rest = rest.strip_prefix("SAR").unwrap_or(rest).trim();
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        let (units, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }

        let units: i64 = units
            .parse()
            .map_err(|_| MoneyParseError::OutOfRange(input.to_string()))?;
        // ASCII only from here, so byte slicing stays on char boundaries
        let cents: i64 = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction[..2].parse().map_err(|_| invalid())?,
        };

        let minor = units
            .checked_mul(100)
            .and_then(|m| m.checked_add(cents))
            .filter(|m| *m <= MAX_AMOUNT.0)
            .ok_or_else(|| MoneyParseError::OutOfRange(input.to_string()))?;

        Ok(Self(if negative { -minor } else { minor }))
    }

    /// Whether the amount lies within what a form may enter
    pub const fn is_within_limit(&self) -> bool {
        self.0.unsigned_abs() <= MAX_AMOUNT.0 as u64
    }

    /// Format with a currency symbol, e.g. "SAR 19,680.00"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format!("{} {}", symbol, self)
    }
}

/// Insert thousands separators into a non-negative integer
fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            group_thousands(self.units().abs()),
            self.minor_part()
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    fn mul(self, quantity: i64) -> Self {
        self.times(quantity)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    /// Well formed but above the accepted maximum
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::OutOfRange(s) => write!(f, "Amount too large: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
