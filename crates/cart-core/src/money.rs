//! # Money
//!
//! Store prices are integer cents in one of a handful of two-decimal
//! currencies. A currency whose minor unit is not 1/100 cannot be configured,
//! so every line cost and total is exact to two decimal places.

use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minor units per major unit for every supported currency
pub const CENTS_PER_UNIT: i64 = 100;

/// Store currency; all variants have a two-decimal minor unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Cad,
}

impl Currency {
    /// ISO 4217 code, upper case
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "CAD" => Ok(Currency::Cad),
            other => Err(CartError::Configuration(format!(
                "store currency {other:?} is not a supported two-decimal currency"
            ))),
        }
    }
}

/// An amount of money in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Cents
    pub amount: i64,
    pub currency: Currency,
}

impl Price {
    /// Round a decimal value to the nearest cent, halves away from zero.
    pub fn new(value: f64, currency: Currency) -> Self {
        Self {
            amount: (value * CENTS_PER_UNIT as f64).round() as i64,
            currency,
        }
    }

    /// Accept a submitted price.
    ///
    /// # Errors
    /// `Validation("Invalid price")` unless the value is finite and non-negative.
    pub fn checked(value: f64, currency: Currency) -> Result<Self, CartError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self::new(value, currency))
        } else {
            Err(CartError::Validation("Invalid price".to_string()))
        }
    }

    /// Parse a user-entered price such as `"12.5"`, with the same rules as
    /// [`Price::checked`].
    pub fn parse(raw: &str, currency: Currency) -> Result<Self, CartError> {
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|_| CartError::Validation("Invalid price".to_string()))?;
        Self::checked(value, currency)
    }

    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: 0,
            currency,
        }
    }

    /// Cost of `quantity` units at this price
    pub fn times(&self, quantity: u32) -> Self {
        Self {
            amount: self.amount.saturating_mul(i64::from(quantity)),
            currency: self.currency,
        }
    }

    /// Decimal value for JSON view models
    pub fn as_decimal(&self) -> f64 {
        self.amount as f64 / CENTS_PER_UNIT as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let cents = self.amount.unsigned_abs();
        let per_unit = CENTS_PER_UNIT.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02} {}",
            cents / per_unit,
            cents % per_unit,
            self.currency
        )
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    /// Both operands must share a currency; the cart enforces this on insert.
    fn add(self, rhs: Price) -> Price {
        debug_assert_eq!(self.currency, rhs.currency);
        Price {
            amount: self.amount.saturating_add(rhs.amount),
            currency: self.currency,
        }
    }
}
