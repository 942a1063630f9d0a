//! Redeeming points against an order

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    discounts::percent,
    pricing::{self, PricingError},
};

use super::LoyaltyError;

/// Store-wide redemption and earning settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltySettings {
    /// Value of one point in minor units.
    pub point_value: u64,

    /// Largest share of an order that points may cover, as a whole-number percent.
    pub max_redeem_percentage: Decimal,

    /// Smallest available balance that allows redemption.
    pub min_redeem_points: u64,

    /// Points earned per major currency unit spent.
    pub points_per_currency_unit: Decimal,
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        Self {
            point_value: 10,
            max_redeem_percentage: Decimal::from(20),
            min_redeem_points: 100,
            points_per_currency_unit: Decimal::new(1, 1),
        }
    }
}

/// How many points a shopper may redeem on one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionQuote {
    /// Spendable points.
    pub available_points: u64,

    /// Most points redeemable on this order; never above `available_points`.
    pub max_redeemable_points: u64,

    /// Value of one point in minor units.
    pub point_value: u64,

    /// Whether the balance meets the redemption minimum.
    pub eligible: bool,

    /// The redemption minimum.
    pub min_redeem_points: u64,
}

impl RedemptionQuote {
    /// Quote a redemption for an order total in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`LoyaltyError::Pricing`] if the cap cannot be represented.
    pub fn new(
        available_points: u64,
        order_total: u64,
        settings: &LoyaltySettings,
    ) -> Result<Self, LoyaltyError> {
        let cap = redeemable_cap(order_total, settings)?;

        Ok(Self {
            available_points,
            max_redeemable_points: available_points.min(cap),
            point_value: settings.point_value,
            eligible: available_points >= settings.min_redeem_points,
            min_redeem_points: settings.min_redeem_points,
        })
    }

    /// Discount in minor units for redeeming `selected` points.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::BelowMinimumRedemption`]: the balance is under the minimum.
    /// - [`LoyaltyError::ExceedsRedeemable`]: more points than the order allows.
    /// - [`LoyaltyError::Pricing`]: the discount overflows.
    pub fn discount_for(&self, selected: u64) -> Result<u64, LoyaltyError> {
        if selected == 0 {
            return Ok(0);
        }

        if !self.eligible {
            return Err(LoyaltyError::BelowMinimumRedemption {
                minimum: self.min_redeem_points,
            });
        }

        if selected > self.max_redeemable_points {
            return Err(LoyaltyError::ExceedsRedeemable {
                maximum: self.max_redeemable_points,
            });
        }

        Ok(selected
            .checked_mul(self.point_value)
            .ok_or(PricingError::AmountOverflow)?)
    }
}

// floor(order_total * max_redeem_percentage / 100 / point_value)
fn redeemable_cap(order_total: u64, settings: &LoyaltySettings) -> Result<u64, LoyaltyError> {
    if settings.point_value == 0 {
        return Ok(0);
    }

    let share = (percent(settings.max_redeem_percentage) * Decimal::ONE)
        .checked_mul(Decimal::from(order_total))
        .ok_or(PricingError::AmountOverflow)?;

    let cap = (share / Decimal::from(settings.point_value)).floor();

    if cap.is_sign_negative() {
        return Ok(0);
    }

    Ok(cap.to_u64().ok_or(PricingError::AmountOverflow)?)
}

/// Points earned on an order total in minor units, rounded down.
///
/// # Errors
///
/// Returns [`LoyaltyError::Pricing`] if the result cannot be represented.
pub fn points_for_order(
    order_total: u64,
    settings: &LoyaltySettings,
    currency: &Currency,
) -> Result<u64, LoyaltyError> {
    let points = pricing::to_major(order_total, currency)
        .checked_mul(settings.points_per_currency_unit)
        .ok_or(PricingError::AmountOverflow)?
        .floor();

    if points.is_sign_negative() {
        return Ok(0);
    }

    Ok(points.to_u64().ok_or(PricingError::AmountOverflow)?)
}
