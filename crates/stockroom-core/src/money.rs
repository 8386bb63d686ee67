//! # Money
//!
//! Amounts are whole cents in an `i64`. Line totals (`quantity × unit`)
//! and the `SUM()`s behind reports are exact, which they would not be with
//! `f64`:
//!
//! ```text
//!   f64:    0.10 + 0.20            = 0.30000000000000004
//!   Money:  Money(10) + Money(20)  = Money(30)  → "0.30"
//! ```
//!
//! The currency itself is not stored. The symbol is a display setting
//! applied by [`Money::display_with`].
//!
//! ```rust
//! use stockroom_core::money::Money;
//!
//! let price: Money = "10.99".parse().unwrap();
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 3297);
//! assert_eq!(line.to_string(), "32.97");
//! assert_eq!(line.display_with("₹"), "₹32.97");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An amount in cents (paise, pence, ...).
///
/// Signed, so that a negative input survives parsing and is then refused
/// by validation with a field-specific message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Whole units, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// The cents part, 0-99 regardless of sign.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// `unit × quantity`. Callers keep both inside the validation caps, so
    /// this cannot overflow.
    #[inline]
    pub const fn multiply_quantity(&self, quantity: i64) -> Self {
        Money(self.0 * quantity)
    }

    /// `₹1,234.50` style: symbol prefix, thousands separators, two decimals.
    pub fn display_with(&self, symbol: &str) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{sign}{symbol}{}.{:02}",
            grouped(self.major().unsigned_abs()),
            self.minor()
        )
    }
}

fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.char_indices() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Accepts `12`, `12.5`, `12.50`, `.75` and a leading `-`.
///
/// A third decimal is an error, never rounded away.
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let text = input.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
            return Err(invalid("expected a number such as 12.50"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let too_large = || invalid("amount is too large");
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| too_large())?
        };
        // "5" means 50 cents, "05" means 5.
        let fraction: i64 = format!("{fraction:0<2}").parse().map_err(|_| too_large())?;

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(too_large)?;
        Ok(Money(if negative { -cents } else { cents }))
    }
}

/// Bare decimal (`-5.50`), as written to CSV files.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{sign}{}.{:02}", self.major().abs(), self.minor())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, quantity: i64) -> Money {
        self.multiply_quantity(quantity)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        Money(iter.map(|m| m.0).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let money = Money::from_cents(-1099);
        assert_eq!(money.major(), -10);
        assert_eq!(money.minor(), 99);
        assert!(money.is_negative());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_display_with_symbol() {
        assert_eq!(Money::from_cents(123_456_789).display_with("$"), "$1,234,567.89");
        assert_eq!(Money::from_cents(12_345_678).display_with("$"), "$123,456.78");
        assert_eq!(Money::from_cents(99).display_with("₹"), "₹0.99");
        assert_eq!(Money::from_cents(-100_000).display_with("€"), "-€1,000.00");
    }

    #[test]
    fn test_parse() {
        let cents = |s: &str| s.parse::<Money>().unwrap().cents();
        assert_eq!(cents("12"), 1200);
        assert_eq!(cents("12.5"), 1250);
        assert_eq!(cents("12.05"), 1205);
        assert_eq!(cents(".75"), 75);
        assert_eq!(cents("7."), 700);
        assert_eq!(cents(" 3.10 "), 310);
        assert_eq!(cents("-2.5"), -250);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "abc", "1.234", "1,50", "+1", "99999999999999999999"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut running = Money::zero();
        running += a;
        assert_eq!(running, a);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }
}
