//! Type-safe price representation using decimal arithmetic.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// Catalog prices cannot be negative.
    #[error("price cannot be negative")]
    Negative,
    /// A subtotal or total does not fit in a `Decimal`.
    #[error("amount overflow")]
    Overflow,
}

/// A price with currency information.
///
/// Used both for catalog prices and for derived amounts (line subtotals,
/// order totals). Amounts are kept in the currency's standard unit (reais,
/// not centavos).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the store currency (BRL).
    #[must_use]
    pub const fn brl(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::BRL)
    }

    /// A zero amount in the store currency.
    #[must_use]
    pub const fn zero() -> Self {
        Self::brl(Decimal::ZERO)
    }

    /// Parse a non-negative BRL price from its decimal text form (e.g. `"40.00"`).
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Invalid` if the text is not a decimal number and
    /// `PriceError::Negative` if it is below zero.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(s.trim()).map_err(|e| PriceError::Invalid(format!("{s:?}: {e}")))?;
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        Ok(Self::brl(amount))
    }

    /// This price multiplied by a quantity.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the product does not fit in a `Decimal`.
    pub fn times(self, quantity: u32) -> Result<Self, PriceError> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Sum of two amounts in the same currency.
    ///
    /// The result keeps `self`'s currency; the store only ever deals in one.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the sum does not fit in a `Decimal`.
    pub fn plus(self, other: Self) -> Result<Self, PriceError> {
        debug_assert_eq!(self.currency_code, other.currency_code);
        self.amount
            .checked_add(other.amount)
            .map(|amount| Self::new(amount, self.currency_code))
            .ok_or(PriceError::Overflow)
    }

    /// Amount with exactly two decimal places, without the currency symbol.
    ///
    /// This is the form stored in the database and sent to payment providers.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        format!("{:.2}", self.amount)
    }

    /// Format for display (e.g., `"R$ 19.99"`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.currency_code.symbol(), self.to_plain_string())
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    BRL,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Currency symbol used when rendering amounts.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::BRL => "R$",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let price = Price::parse("40").unwrap();
        assert_eq!(price.amount, Decimal::new(40, 0));
        assert_eq!(price.display(), "R$ 40.00");
        assert_eq!(price.to_plain_string(), "40.00");
    }

    #[test]
    fn test_parse_rejects_negative_and_garbage() {
        assert_eq!(Price::parse("-1.50"), Err(PriceError::Negative));
        assert!(matches!(Price::parse("abc"), Err(PriceError::Invalid(_))));
        assert!(Price::parse("0").is_ok());
    }

    #[test]
    fn test_times_and_plus() {
        let a = Price::parse("40.0").unwrap().times(2).unwrap();
        let b = Price::parse("30.0").unwrap().times(1).unwrap();
        assert_eq!(a.amount, Decimal::new(80, 0));
        assert_eq!(a.plus(b).unwrap().display(), "R$ 110.00");
    }

    #[test]
    fn test_times_and_plus_overflow() {
        let max = Price::parse("79228162514264337593543950335").unwrap();
        assert_eq!(max.times(2), Err(PriceError::Overflow));
        assert_eq!(max.plus(Price::parse("1").unwrap()), Err(PriceError::Overflow));
        assert_eq!(max.times(1), Ok(max));
    }

    #[test]
    fn test_display_rounds_to_cents() {
        let price = Price::brl(Decimal::new(19_999, 3));
        assert_eq!(price.display(), "R$ 20.00");
    }
}
