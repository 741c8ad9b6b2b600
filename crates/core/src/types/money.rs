//! Decimal-backed money type.
//!
//! Amounts are stored in the currency's standard unit (rupees, not paise)
//! and converted to minor units only at the payment-gateway boundary.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors from money arithmetic and conversion.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// Two amounts in different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: Currency,
        /// Currency of the right operand.
        right: Currency,
    },
    /// Amount does not fit the gateway's minor-unit integer representation.
    #[error("amount {0} not representable in minor units")]
    NotRepresentable(Decimal),
}

/// ISO 4217 currency codes accepted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl Currency {
    /// The ISO 4217 code as a string.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
        }
    }

    /// Parse a currency from its ISO code.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INR" => Some(Self::INR),
            "USD" => Some(Self::USD),
            "EUR" => Some(Self::EUR),
            "GBP" => Some(Self::GBP),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An amount of money in a specific currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: Currency,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Build an amount from minor units (e.g., paise for INR).
    #[must_use]
    pub fn from_minor_units(minor: i64, currency: Currency) -> Self {
        Self {
            amount: Decimal::new(minor, 2),
            currency,
        }
    }

    /// Convert to minor units for the payment gateway.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::NotRepresentable` if the amount has more than
    /// two decimal places of precision or does not fit in an `i64`.
    pub fn minor_units(&self) -> Result<i64, MoneyError> {
        let scaled = self
            .amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or(MoneyError::NotRepresentable(self.amount))?;
        if scaled.fract() != Decimal::ZERO {
            return Err(MoneyError::NotRepresentable(self.amount));
        }
        scaled
            .to_i64()
            .ok_or(MoneyError::NotRepresentable(self.amount))
    }

    /// Multiply a unit amount by a quantity.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency: self.currency,
        }
    }

    /// Add another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::CurrencyMismatch` if the currencies differ.
    pub fn add(&self, other: &Self) -> Result<Self, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(Self {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_minor_units() {
        let m = Money::new(dec("499.50"), Currency::INR);
        assert_eq!(m.minor_units().unwrap(), 49950);
    }

    #[test]
    fn test_minor_units_rejects_sub_paise() {
        let m = Money::new(dec("1.005"), Currency::INR);
        assert!(matches!(
            m.minor_units(),
            Err(MoneyError::NotRepresentable(_))
        ));
    }

    #[test]
    fn test_from_minor_units_roundtrip() {
        let m = Money::from_minor_units(123_45, Currency::INR);
        assert_eq!(m.amount, dec("123.45"));
        assert_eq!(m.minor_units().unwrap(), 123_45);
    }

    #[test]
    fn test_times_and_add() {
        let unit = Money::new(dec("500"), Currency::INR);
        let line = unit.times(2);
        assert_eq!(line.amount, dec("1000"));

        let total = line.add(&Money::new(dec("250"), Currency::INR)).unwrap();
        assert_eq!(total.amount, dec("1250"));
    }

    #[test]
    fn test_add_currency_mismatch() {
        let a = Money::new(dec("1"), Currency::INR);
        let b = Money::new(dec("1"), Currency::USD);
        assert!(matches!(
            a.add(&b),
            Err(MoneyError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        let m = Money::new(dec("99.9"), Currency::INR);
        assert_eq!(m.to_string(), "99.90 INR");
    }
}
