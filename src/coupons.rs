//! Coupons
//!
//! Coupon validation and discount computation. Checks run in a fixed order and
//! the first failing check is reported.

use decimal_percentage::Percentage;
use jiff::Timestamp;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    discounts::{self, DiscountError},
    pricing,
};

/// Reasons a coupon cannot be applied. The messages are shown to the shopper.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CouponRejection {
    /// No coupon exists with the given code.
    #[error("Invalid coupon code")]
    NotFound,

    /// The coupon exists but has been switched off.
    #[error("This coupon is no longer active")]
    Inactive,

    /// The validity window has not started.
    #[error("This coupon is not valid yet")]
    NotYetValid,

    /// The validity window has ended.
    #[error("This coupon has expired")]
    Expired,

    /// The order total is below the coupon's minimum.
    #[error("Minimum order amount for this coupon is {}", pricing::display_amount(*.minimum))]
    BelowMinimumOrder {
        /// Minimum order amount in minor units.
        minimum: u64,
    },

    /// The coupon has been used as many times as it allows.
    #[error("This coupon has reached its usage limit")]
    UsageLimitReached,

    /// The shopper has already used the coupon as many times as allowed.
    #[error("You have already used this coupon the maximum number of times")]
    PerUserLimitReached,

    /// The discount could not be calculated.
    #[error("This coupon could not be applied")]
    InvalidDiscount(#[from] DiscountError),
}

/// How a coupon discounts an order.
#[derive(Debug, Clone, Copy)]
pub enum CouponDiscount {
    /// A percentage of the order total, optionally capped.
    Percentage {
        /// Share of the order total.
        percent: Percentage,

        /// Largest discount allowed, in minor units.
        max_discount: Option<u64>,
    },

    /// A fixed amount in minor units.
    Fixed(u64),
}

/// Coupon
#[derive(Debug, Clone)]
pub struct Coupon {
    /// Coupon identifier.
    pub id: Uuid,

    /// Code the shopper types; matched case-insensitively.
    pub code: String,

    /// Discount rule.
    pub discount: CouponDiscount,

    /// Minimum order total in minor units.
    pub min_order_amount: Option<u64>,

    /// Start of the validity window.
    pub valid_from: Option<Timestamp>,

    /// End of the validity window.
    pub valid_until: Option<Timestamp>,

    /// Total number of redemptions allowed.
    pub usage_limit: Option<u32>,

    /// Number of redemptions allowed per shopper.
    pub per_user_limit: Option<u32>,

    /// Number of redemptions so far.
    pub used_count: u32,

    /// Whether the coupon can be used at all.
    pub is_active: bool,
}

impl Coupon {
    /// Check whether `code` refers to this coupon.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code.trim())
    }

    /// Validate the coupon for an order and compute its discount in minor units.
    ///
    /// `user_usage` is the number of times the shopper has already redeemed the coupon.
    ///
    /// # Errors
    ///
    /// Returns the first [`CouponRejection`] that applies, checking in order: active,
    /// validity window, minimum order, usage limit, per-user limit.
    pub fn evaluate(
        &self,
        order_total: u64,
        now: Timestamp,
        user_usage: u32,
    ) -> Result<u64, CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }

        if self.valid_from.is_some_and(|from| now < from) {
            return Err(CouponRejection::NotYetValid);
        }

        if self.valid_until.is_some_and(|until| now > until) {
            return Err(CouponRejection::Expired);
        }

        if let Some(minimum) = self.min_order_amount
            && order_total < minimum
        {
            return Err(CouponRejection::BelowMinimumOrder { minimum });
        }

        if self.usage_limit.is_some_and(|limit| self.used_count >= limit) {
            return Err(CouponRejection::UsageLimitReached);
        }

        if self.per_user_limit.is_some_and(|limit| user_usage >= limit) {
            return Err(CouponRejection::PerUserLimitReached);
        }

        self.discount_for(order_total)
    }

    /// The discount this coupon gives on `order_total`, ignoring eligibility checks.
    ///
    /// # Errors
    ///
    /// Returns [`CouponRejection::InvalidDiscount`] if a percentage cannot be calculated.
    pub fn discount_for(&self, order_total: u64) -> Result<u64, CouponRejection> {
        let discount = match self.discount {
            CouponDiscount::Percentage {
                percent,
                max_discount,
            } => {
                let discount = discounts::percent_of_minor(&percent, order_total)?;

                max_discount.map_or(discount, |cap| discount.min(cap))
            }
            CouponDiscount::Fixed(amount) => amount,
        };

        Ok(discounts::clamp_to(discount, order_total))
    }
}

/// Find a coupon by code and evaluate it.
///
/// # Errors
///
/// Returns [`CouponRejection::NotFound`] when `coupon` is `None`, otherwise the result of
/// [`Coupon::evaluate`].
pub fn evaluate_coupon(
    coupon: Option<&Coupon>,
    order_total: u64,
    now: Timestamp,
    user_usage: u32,
) -> Result<AppliedCoupon, CouponRejection> {
    let coupon = coupon.ok_or(CouponRejection::NotFound)?;
    let discount = coupon.evaluate(order_total, now, user_usage)?;

    Ok(AppliedCoupon {
        coupon_id: coupon.id,
        code: coupon.code.clone(),
        discount,
    })
}

/// A coupon accepted for the current order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCoupon {
    /// Coupon identifier.
    pub coupon_id: Uuid,

    /// Canonical coupon code.
    pub code: String,

    /// Discount in minor units.
    pub discount: u64,
}

/// The checkout's single coupon slot.
///
/// Applying a coupon replaces whatever was applied before; coupons never stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponSlot {
    applied: Option<AppliedCoupon>,
}

impl CouponSlot {
    /// Apply a coupon, replacing any previous one.
    pub fn apply(&mut self, coupon: AppliedCoupon) {
        self.applied = Some(coupon);
    }

    /// Remove the applied coupon.
    pub fn remove(&mut self) {
        self.applied = None;
    }

    /// The applied coupon, if any.
    pub fn applied(&self) -> Option<&AppliedCoupon> {
        self.applied.as_ref()
    }

    /// Current discount in minor units; zero when nothing is applied.
    pub fn discount(&self) -> u64 {
        self.applied.as_ref().map_or(0, |coupon| coupon.discount)
    }

    /// Whether the code input accepts a new code.
    pub fn accepts_input(&self) -> bool {
        self.applied.is_none()
    }
}
