//! Type-safe money representation using decimal arithmetic.

use std::iter::Sum;
use std::ops::{Add, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount with currency information.
///
/// Amounts are kept as [`Decimal`] to avoid floating-point drift in
/// checkout arithmetic. The default currency is VND, which has no minor
/// unit, so amounts like 500 000 are whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// A VND amount from a whole number.
    #[must_use]
    pub fn vnd(amount: i64) -> Self {
        Self::new(Decimal::from(amount), CurrencyCode::VND)
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency)
    }

    /// Whether the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero(CurrencyCode::default())
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Self::new(self.amount + rhs.amount, self.currency)
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        debug_assert_eq!(self.currency, rhs.currency, "currency mismatch");
        Self::new(self.amount - rhs.amount, self.currency)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, item| {
            if acc.is_zero() {
                Self::new(acc.amount + item.amount, item.currency)
            } else {
                acc + item
            }
        })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency.code())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    VND,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The ISO 4217 code string.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::VND => "VND",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_vnd_constructor() {
        let m = Money::vnd(500_000);
        assert_eq!(m.amount, Decimal::from(500_000));
        assert_eq!(m.currency, CurrencyCode::VND);
    }

    #[test]
    fn test_times_quantity() {
        let unit = Money::vnd(1_200_000);
        assert_eq!(unit.times(3), Money::vnd(3_600_000));
        assert_eq!(unit.times(0), Money::vnd(0));
    }

    #[test]
    fn test_add_sub() {
        let a = Money::vnd(30_000);
        let b = Money::vnd(470_000);
        assert_eq!(a + b, Money::vnd(500_000));
        assert_eq!(b - a, Money::vnd(440_000));
    }

    #[test]
    fn test_sum_over_lines() {
        let total: Money = [Money::vnd(100), Money::vnd(200), Money::vnd(300)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::vnd(600));
    }

    #[test]
    fn test_sum_empty_is_zero() {
        let total: Money = std::iter::empty::<Money>().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::vnd(30_000).to_string(), "30000 VND");
    }

    #[test]
    fn test_ordering() {
        assert!(Money::vnd(499_999) < Money::vnd(500_000));
    }
}
