//! Discounts
//!
//! Percentage arithmetic shared by coupons, loyalty redemption and checkout.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,
}

/// Build a [`Percentage`] from a whole-number percent, e.g. `20` for 20%.
pub fn percent(points: Decimal) -> Percentage {
    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Calculate the discount amount in minor units for a percentage of a minor unit amount.
///
/// Rounds half away from zero.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or the result
/// cannot be represented as a non-negative minor unit amount.
pub fn percent_of_minor(percent: &Percentage, minor: u64) -> Result<u64, DiscountError> {
    let minor = Decimal::from_u64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // the percentage wrapper only exposes its value through arithmetic
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .ok_or(DiscountError::PercentConversion)
}

/// Clamp a discount so it never exceeds the amount it is taken from.
pub fn clamp_to(discount: u64, amount: u64) -> u64 {
    discount.min(amount)
}
