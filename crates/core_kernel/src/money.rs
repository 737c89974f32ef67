//! Money types with precise decimal arithmetic
//!
//! Claim amounts are carried as `rust_decimal::Decimal` so that charged and
//! paid totals never pick up floating-point drift. Amounts in different
//! currencies are never combined.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
}

impl Currency {
    /// Digits after the decimal point in display
    pub fn minor_units(self) -> u32 {
        2
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CAD => "C$",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Amount currency {found} does not match {expected}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    #[error("{currency} total exceeds the representable range")]
    Overflow { currency: Currency },
}

/// A monetary amount with associated currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value, keeping at most 4 decimal places
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Adds up amounts already known to be in `currency`
    pub fn total<I>(amounts: I, currency: Currency) -> Result<Self, MoneyError>
    where
        I: IntoIterator<Item = Decimal>,
    {
        let sum = amounts
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(amount))
            .ok_or(MoneyError::Overflow { currency })?;
        Ok(Self::new(sum, currency))
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Fails unless this amount is denominated in `currency`
    pub fn ensure_currency(&self, currency: Currency) -> Result<(), MoneyError> {
        if self.currency != currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: currency,
                found: self.currency,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.minor_units() as usize;
        write!(f, "{}{:.dp$}", self.currency.symbol(), self.amount)
    }
}
