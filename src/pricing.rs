//! Pricing
//!
//! Amounts are carried as integer minor units (`u64`) on every domain type and
//! only become [`Money`] or decimal major units where arithmetic needs them.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors that can occur while converting or totalling amounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount does not fit in the target integer type.
    #[error("amount overflowed while calculating a price")]
    AmountOverflow,

    /// A negative amount was produced where only non-negative amounts are valid.
    #[error("amount must not be negative")]
    NegativeAmount,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The currency every storefront amount is denominated in.
pub fn store_currency() -> &'static Currency {
    iso::INR
}

/// Number of minor units in one major unit of `currency`.
fn minor_factor(currency: &Currency) -> Decimal {
    Decimal::from(10_u64.saturating_pow(currency.exponent))
}

/// Convert minor units into a decimal amount of major units.
pub fn to_major(minor: u64, currency: &Currency) -> Decimal {
    Decimal::from(minor) / minor_factor(currency)
}

/// Convert a decimal amount of major units into minor units, rounding half away from zero.
///
/// # Errors
///
/// - [`PricingError::NegativeAmount`]: the amount is below zero.
/// - [`PricingError::AmountOverflow`]: the amount does not fit in `u64` minor units.
pub fn to_minor(major: Decimal, currency: &Currency) -> Result<u64, PricingError> {
    if major.is_sign_negative() && !major.is_zero() {
        return Err(PricingError::NegativeAmount);
    }

    major
        .checked_mul(minor_factor(currency))
        .ok_or(PricingError::AmountOverflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(PricingError::AmountOverflow)
}

/// Build a [`Money`] value from minor units.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the amount exceeds `i64::MAX` minor units.
pub fn money(minor: u64, currency: &'static Currency) -> Result<Money<'static, Currency>, PricingError> {
    let minor = i64::try_from(minor).map_err(|_overflow| PricingError::AmountOverflow)?;

    Ok(Money::from_minor(minor, currency))
}

/// Shopper-facing rendering of a store currency amount, e.g. `₹299.00`.
pub fn display_amount(minor: u64) -> String {
    let currency = store_currency();

    money(minor, currency).map_or_else(
        |_overflow| format!("{} {}", to_major(minor, currency), currency.iso_alpha_code),
        |amount| amount.to_string(),
    )
}

/// Read the minor units back out of a [`Money`] value.
///
/// # Errors
///
/// Returns [`PricingError::NegativeAmount`] if the money value is negative.
pub fn minor_units(amount: &Money<'_, Currency>) -> Result<u64, PricingError> {
    u64::try_from(amount.to_minor_units()).map_err(|_negative| PricingError::NegativeAmount)
}

/// Price of `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::AmountOverflow`] if the multiplication overflows.
pub fn line_total(unit_price: u64, quantity: u32) -> Result<u64, PricingError> {
    unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::AmountOverflow)
}

/// Calculates the total of a set of amounts as [`Money`].
///
/// An empty set totals zero in the given currency.
///
/// # Errors
///
/// - [`PricingError::AmountOverflow`]: an amount exceeds the representable range.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn total_price(
    amounts: impl IntoIterator<Item = u64>,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    amounts
        .into_iter()
        .try_fold(
            Money::from_minor(0, currency),
            |acc, amount| -> Result<_, PricingError> { Ok(acc.add(money(amount, currency)?)?) },
        )
}
