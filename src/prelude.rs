//! Larder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        Cart, CartError, CartItem, CartState, CartStorage, CartStorageError, CartStore,
        FileCartStorage, MemoryCartStorage, NewCartItem, ScheduledDelivery,
    },
    checkout::{CheckoutSummary, OrderLine, order_lines},
    coupons::{AppliedCoupon, Coupon, CouponDiscount, CouponRejection, CouponSlot, evaluate_coupon},
    discounts::DiscountError,
    geo::{Address, BoundingBox, Coordinates, GeocodeOutcome},
    loyalty::{
        ConversionQuote, ConversionRule, LoyaltyError, LoyaltyPoints, LoyaltySettings,
        PendingPoints, RedemptionQuote, Tier, TierProgress, convertible_points,
    },
    pricing::{PricingError, store_currency},
    recommendations::{CatalogEntry, PastOrder, RecommendationSource, Recommendations},
    reviews::{ReviewDraft, ReviewError},
    wallet::{
        Direction, PaymentMethod, TopUpDialog, TopUpError, TopUpStep, WalletTransaction,
        WalletView,
    },
};
