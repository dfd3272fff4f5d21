//! Prices

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::NonZeroU32,
};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use thiserror::Error;

/// Errors related to prices and money conversion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),

    /// The amount does not fit in the minor units of the currency.
    #[error("amount {0} is out of range for {1}")]
    OutOfRange(Decimal, &'static str),
}

/// A non-negative unit price, in major units of the shop currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }

        Ok(Self(amount.normalize()))
    }

    /// The amount as a decimal.
    pub fn amount(self) -> Decimal {
        self.0
    }

    /// Price multiplied by a quantity. Saturates instead of overflowing.
    pub fn times(self, quantity: Quantity) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity.get()))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

// Prices are JSON numbers on the wire and in snapshots, written with every
// decimal digit so they read back unchanged.
impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;

        Self::new(amount).map_err(D::Error::custom)
    }
}

/// A strictly positive line quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// One unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, `None` for zero.
    pub fn new(quantity: u32) -> Option<Self> {
        NonZeroU32::new(quantity).map(Self)
    }

    /// Quantity from a signed request: `None` for zero or below, saturating
    /// at `u32::MAX` above.
    pub fn from_signed(quantity: i64) -> Option<Self> {
        if quantity <= 0 {
            return None;
        }

        Self::new(u32::try_from(quantity).unwrap_or(u32::MAX))
    }

    /// The numeric value.
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Add another quantity, saturating at `u32::MAX`.
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.get()))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<NonZeroU32> for Quantity {
    fn from(value: NonZeroU32) -> Self {
        Self(value)
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Convert a major-unit decimal amount into money of the given currency.
///
/// The amount is rounded half away from zero to the currency's exponent.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] if the amount does not fit in `i64`
/// minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    let out_of_range = || PriceError::OutOfRange(amount, currency.iso_alpha_code);

    let minor = amount
        .round_dp_with_strategy(currency.exponent, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::from(10_i64.pow(currency.exponent)))
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(out_of_range)?;

    Ok(Money::from_minor(minor, currency))
}
