//! Loyalty
//!
//! Points balances, tiers, redemption at checkout and conversion into wallet
//! currency.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{discounts::DiscountError, pricing::PricingError};

mod conversion;
mod redemption;
mod tier;

pub use conversion::{ConversionQuote, ConversionRule, PendingPoints, convertible_points};
pub use redemption::{LoyaltySettings, RedemptionQuote, points_for_order};
pub use tier::{Tier, TierProgress};

/// Errors raised by loyalty calculations. Validation variants are shown to the shopper.
#[derive(Debug, Error, PartialEq)]
pub enum LoyaltyError {
    /// Not enough points to redeem anything.
    #[error("You need at least {minimum} points to redeem")]
    BelowMinimumRedemption {
        /// Required available balance.
        minimum: u64,
    },

    /// More points selected than the order allows.
    #[error("You can redeem at most {maximum} points on this order")]
    ExceedsRedeemable {
        /// Largest redeemable amount for the order.
        maximum: u64,
    },

    /// Conversion is switched off.
    #[error("Points conversion is currently unavailable")]
    ConversionDisabled,

    /// Fewer points selected than the conversion minimum.
    #[error("You need to convert at least {minimum} points")]
    BelowMinimumConversion {
        /// Smallest convertible amount.
        minimum: u64,
    },

    /// More points selected than are spendable.
    #[error("You only have {available} points available")]
    InsufficientPoints {
        /// Spendable points.
        available: u64,
    },

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped discount error.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// A shopper's points balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyPoints {
    /// Current balance, including points still held pending.
    pub total_points: u64,

    /// Points earned over the account's lifetime.
    pub lifetime_earned: u64,

    /// Points spent over the account's lifetime.
    pub lifetime_spent: u64,

    /// Tier as last recorded by the backend.
    pub tier: Tier,
}

impl LoyaltyPoints {
    /// Empty balance for a shopper who has not earned anything yet.
    pub fn new() -> Self {
        Self {
            total_points: 0,
            lifetime_earned: 0,
            lifetime_spent: 0,
            tier: Tier::Bronze,
        }
    }

    /// The tier to display.
    ///
    /// Never lower than the recorded tier, so a stale or corrected lifetime
    /// total cannot demote a shopper.
    pub fn tier(&self) -> Tier {
        self.tier.max(Tier::for_lifetime_earned(self.lifetime_earned))
    }

    /// Progress towards the next tier.
    pub fn progress(&self) -> TierProgress {
        TierProgress::new(self.tier(), self.lifetime_earned)
    }
}

impl Default for LoyaltyPoints {
    fn default() -> Self {
        Self::new()
    }
}
