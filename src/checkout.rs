//! Checkout
//!
//! Order lines and the payable amount once a coupon and redeemed points are
//! taken off. The coupon is applied first and points only cover what remains.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{Cart, CartItem},
    discounts,
    pricing::{self, PricingError},
};

/// A priced line on an order or invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Product identifier.
    pub product_id: Uuid,

    /// Variant identifier.
    pub variant_id: Option<Uuid>,

    /// Product name, with the variant name appended when present.
    pub description: String,

    /// Unit price in minor units.
    pub unit_price: u64,

    /// Quantity ordered.
    pub quantity: u32,

    /// Unit price times quantity.
    pub line_total: u64,
}

impl TryFrom<&CartItem> for OrderLine {
    type Error = PricingError;

    fn try_from(item: &CartItem) -> Result<Self, Self::Error> {
        let description = match &item.variant_name {
            Some(variant) => format!("{} ({variant})", item.name),
            None => item.name.clone(),
        };

        Ok(Self {
            product_id: item.product_id,
            variant_id: item.variant_id,
            description,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total()?,
        })
    }
}

/// Convert every cart line into an order line.
///
/// # Errors
///
/// Returns a [`PricingError`] if a line total overflows.
pub fn order_lines(cart: &Cart) -> Result<Vec<OrderLine>, PricingError> {
    cart.items().iter().map(OrderLine::try_from).collect()
}

/// Amounts shown at checkout, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    /// Sum of line totals.
    pub subtotal: u64,

    /// Coupon discount, at most the subtotal.
    pub coupon_discount: u64,

    /// Points discount, at most what the coupon left.
    pub points_discount: u64,

    /// Delivery charge.
    pub delivery_fee: u64,

    /// Amount to pay.
    pub payable: u64,
}

impl CheckoutSummary {
    /// Work out the payable amount.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountOverflow`] if adding the delivery fee overflows.
    pub fn new(
        subtotal: u64,
        coupon_discount: u64,
        points_discount: u64,
        delivery_fee: u64,
    ) -> Result<Self, PricingError> {
        let coupon_discount = discounts::clamp_to(coupon_discount, subtotal);
        let remainder = subtotal - coupon_discount;

        let points_discount = discounts::clamp_to(points_discount, remainder);

        let payable = (remainder - points_discount)
            .checked_add(delivery_fee)
            .ok_or(PricingError::AmountOverflow)?;

        Ok(Self {
            subtotal,
            coupon_discount,
            points_discount,
            delivery_fee,
            payable,
        })
    }

    /// Total discount.
    pub fn savings(&self) -> u64 {
        self.coupon_discount + self.points_discount
    }

    /// Savings relative to the subtotal.
    pub fn savings_percent(&self) -> Percentage {
        if self.subtotal == 0 {
            return Percentage::from(Decimal::ZERO);
        }

        Percentage::from(Decimal::from(self.savings()) / Decimal::from(self.subtotal))
    }

    /// The payable amount as [`Money`].
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::AmountOverflow`] if the amount exceeds the money range.
    pub fn payable_money(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PricingError> {
        pricing::money(self.payable, currency)
    }
}
