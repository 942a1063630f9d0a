//! Loyalty Records

use larder::loyalty::{LoyaltyPoints, PendingPoints, RedemptionQuote, Tier, TierProgress};

/// Everything the loyalty screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoyaltySummary {
    pub points: LoyaltyPoints,
    pub tier: Tier,
    pub progress: TierProgress,

    /// Points that can be redeemed or converted right now.
    pub available_points: u64,

    /// Points still inside their return window, soonest first.
    pub pending: Vec<PendingPoints>,
}

impl LoyaltySummary {
    #[must_use]
    pub fn new(points: LoyaltyPoints, available_points: u64, pending: Vec<PendingPoints>) -> Self {
        Self {
            points,
            tier: points.tier(),
            progress: points.progress(),
            available_points,
            pending,
        }
    }
}

/// Redemption limits for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionOffer {
    pub quote: RedemptionQuote,

    /// Discount in minor units if every redeemable point is used.
    pub max_discount: u64,
}

/// Result of converting points into wallet balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionReceipt {
    pub points: u64,

    /// Amount credited, in minor units.
    pub amount: u64,

    /// Wallet balance after the credit.
    pub balance: u64,
}
