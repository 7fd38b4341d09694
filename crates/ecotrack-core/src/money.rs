//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Stored as REAL:                                                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ totals drift from line sums      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    10 + 20 = 30 paise, always                                           │
//! │    total_price == Σ unit_price × qty holds exactly                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ecotrack_core::money::Money;
//!
//! let price = Money::from_cents(250);                   // 2.50
//! let line = price.checked_mul_quantity(3).unwrap();    // 7.50
//! assert_eq!(line.to_string(), "7.50");
//!
//! // Arithmetic that would leave i64 yields None instead of wrapping
//! assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_none());
//!
//! // Decimal text from a form is parsed, never converted from f64
//! assert_eq!(Money::parse_decimal("2.5").unwrap(), price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents, paise, ...).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences such as profit may be negative
/// - **Transparent serde**: serialized as a bare integer of minor units
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► LineItem.unit_price ──► line amount ──► Cart.total()
///                                                               │
/// Product.cost_price ──► LineItem.unit_cost ──► Cart.total_cost()
///                                                               │
///                                        SaleDraft ──► sales row
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity; `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Pen 2.00
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_mul_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line amount: 6.00
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts; `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Subtraction clamped at the i64 bounds.
    #[inline]
    pub const fn saturating_sub(&self, other: Money) -> Self {
        Money(self.0.saturating_sub(other.0))
    }

    /// Sums amounts, stopping at the first overflow.
    ///
    /// ```rust
    /// use ecotrack_core::money::Money;
    ///
    /// let parts = [Money::from_cents(600), Money::from_cents(4550)];
    /// assert_eq!(Money::checked_sum(parts), Some(Money::from_cents(5150)));
    /// assert_eq!(Money::checked_sum([Money::from_cents(i64::MAX), Money::from_cents(1)]), None);
    /// ```
    pub fn checked_sum(amounts: impl IntoIterator<Item = Money>) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, m| acc.checked_add(m))
    }

    /// Parses a decimal amount such as `"12"`, `"12.5"` or `"12.50"`.
    ///
    /// At most two fractional digits are accepted; anything more precise
    /// than the minor unit is rejected instead of silently rounded.
    ///
    /// ```rust
    /// use ecotrack_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.50").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal("-0.05").unwrap().cents(), -5);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// assert!(Money::parse_decimal("abc").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let text = input.trim();
        let (negative, digits) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let (major_text, minor_text) = match digits.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (digits, ""),
        };

        if major_text.is_empty() && minor_text.is_empty() {
            return Err(invalid("expected a decimal number"));
        }
        if !major_text.chars().all(|c| c.is_ascii_digit())
            || !minor_text.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a decimal number"));
        }
        if minor_text.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let major: i64 = if major_text.is_empty() {
            0
        } else {
            major_text
                .parse()
                .map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match minor_text.len() {
            0 => 0,
            1 => minor_text.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => minor_text.parse().map_err(|_| invalid("bad fraction"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Formats with thousands separators, e.g. `1,234.50`.
    ///
    /// Used for the invoice total line.
    pub fn format_grouped(&self) -> String {
        let digits = self.major().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, grouped, self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering (`12.34`); the currency label is added by
/// whoever prints it.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(Money::from_cents(123_456_789).format_grouped(), "1,234,567.89");
        assert_eq!(Money::from_cents(100_000).format_grouped(), "1,000.00");
        assert_eq!(Money::from_cents(99_999).format_grouped(), "999.99");
        assert_eq!(Money::from_cents(-100_050).format_grouped(), "-1,000.50");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("2").unwrap().cents(), 200);
        assert_eq!(Money::parse_decimal("2.5").unwrap().cents(), 250);
        assert_eq!(Money::parse_decimal("2.05").unwrap().cents(), 205);
        assert_eq!(Money::parse_decimal(".75").unwrap().cents(), 75);
        assert_eq!(Money::parse_decimal(" 10.00 ").unwrap().cents(), 1000);

        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("1.234").is_err());
        assert!(Money::parse_decimal("1,000").is_err());
        assert!(Money::parse_decimal("1e3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(b.saturating_sub(a).cents(), -500);
        assert_eq!(a.checked_mul_quantity(3), Some(Money::from_cents(3000)));
        assert_eq!(Money::checked_sum([a, b, b]), Some(Money::from_cents(2000)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_overflow_is_reported_not_wrapped() {
        let huge = Money::parse_decimal("92233720368547758").unwrap();

        assert_eq!(huge.checked_mul_quantity(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(Money::checked_sum([huge, huge]), None);
        assert_eq!(
            Money::from_cents(i64::MIN).saturating_sub(Money::from_cents(1)).cents(),
            i64::MIN
        );
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(600)).unwrap();
        assert_eq!(json, "600");
        let back: Money = serde_json::from_str("600").unwrap();
        assert_eq!(back, Money::from_cents(600));
    }
}
