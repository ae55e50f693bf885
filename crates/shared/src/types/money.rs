//! Money type in integer minor units with currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are stored as `i64` counts of the currency's smallest unit, so
//! "fully settled" is an exact equality check. `rust_decimal::Decimal` is only
//! used at the edges to read and print major-unit values such as `"12.50"`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a monetary amount with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in the smallest currency unit (e.g., cents, dong).
    pub amount: i64,
    /// ISO 4217 currency code (e.g., "VND", "USD").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Vietnamese Dong
    Vnd,
    /// US Dollar
    Usd,
    /// Indonesian Rupiah
    Idr,
    /// Euro
    Eur,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

/// Errors converting between major-unit decimals and minor units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Value has more fractional digits than the currency allows.
    #[error("{value} has more than {scale} decimal places for {currency}")]
    TooPrecise {
        /// The rejected value.
        value: Decimal,
        /// Decimal places allowed by the currency.
        scale: u32,
        /// The currency.
        currency: Currency,
    },

    /// Value does not fit in 64-bit minor units.
    #[error("{0} is out of range")]
    OutOfRange(Decimal),

    /// Value could not be parsed as a decimal number.
    #[error("Invalid amount: {0}")]
    Invalid(String),
}

impl Currency {
    /// Number of decimal places in the currency's major unit.
    #[must_use]
    pub const fn minor_unit_scale(self) -> u32 {
        match self {
            Self::Vnd | Self::Jpy => 0,
            Self::Usd | Self::Idr | Self::Eur | Self::Sgd => 2,
        }
    }
}

impl Money {
    /// Creates a new Money instance from minor units.
    #[must_use]
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Converts a major-unit decimal (e.g. `12.50` USD) into minor units.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::TooPrecise` if the value has sub-minor-unit digits
    /// and `MoneyError::OutOfRange` if it does not fit in an `i64`.
    pub fn from_major(value: Decimal, currency: Currency) -> Result<Self, MoneyError> {
        let scale = currency.minor_unit_scale();
        let normalized = value.normalize();
        if normalized.scale() > scale {
            return Err(MoneyError::TooPrecise {
                value,
                scale,
                currency,
            });
        }

        let factor = Decimal::from(10_i64.pow(scale));
        let minor = value
            .checked_mul(factor)
            .ok_or(MoneyError::OutOfRange(value))?;
        let amount = i64::try_from(minor).map_err(|_| MoneyError::OutOfRange(value))?;

        Ok(Self { amount, currency })
    }

    /// Parses a major-unit string such as `"150000"` or `"12.50"`.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Invalid` for non-numeric input, otherwise the
    /// errors of [`Money::from_major`].
    pub fn parse_major(s: &str, currency: Currency) -> Result<Self, MoneyError> {
        let value: Decimal = s
            .trim()
            .parse()
            .map_err(|_| MoneyError::Invalid(s.to_string()))?;
        Self::from_major(value, currency)
    }

    /// Returns the amount in major units with the currency's scale.
    #[must_use]
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.amount, self.currency.minor_unit_scale())
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.amount < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.to_major(), self.currency)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vnd => write!(f, "VND"),
            Self::Usd => write!(f, "USD"),
            Self::Idr => write!(f, "IDR"),
            Self::Eur => write!(f, "EUR"),
            Self::Sgd => write!(f, "SGD"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "VND" => Ok(Self::Vnd),
            "USD" => Ok(Self::Usd),
            "IDR" => Ok(Self::Idr),
            "EUR" => Ok(Self::Eur),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}
