//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Brazilian Real (BRL); the shop sells in a single currency,
//! so the type carries no currency code. Prices serialize transparently as
//! `Decimal` does by default - JSON strings like `"38.50"` on the way out,
//! with strings and numbers both accepted on the way in. The backend coerces
//! the strings into its `numeric` columns.

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Brazilian Real.
///
/// Backed by [`Decimal`] so arithmetic is exact; never use floats for money.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in centavos.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply the unit price by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Format for display, e.g. "R$ 38,50".
    ///
    /// Uses the Brazilian convention of a comma decimal separator.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {:.2}", self.0).replace('.', ",")
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_comma_separator() {
        assert_eq!(Price::from_cents(3850).display(), "R$ 38,50");
        assert_eq!(Price::from_cents(1500).display(), "R$ 15,00");
    }

    #[test]
    fn test_display_pads_to_two_places() {
        assert_eq!(Price::new(Decimal::from(8)).display(), "R$ 8,00");
    }

    #[test]
    fn test_times() {
        let unit = Price::from_cents(1500);
        assert_eq!(unit.times(2), Price::from_cents(3000));
        assert_eq!(unit.times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(3000), Price::from_cents(850)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(3850));
    }

    #[test]
    fn test_serde_transparent() {
        let price: Price = serde_json::from_str("15.5").unwrap();
        assert_eq!(price, Price::from_cents(1550));
    }
}
