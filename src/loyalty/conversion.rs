//! Converting points into wallet currency

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::pricing::{self, PricingError};

use super::LoyaltyError;

/// Rule for exchanging points into wallet balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRule {
    /// Major currency units credited per point.
    pub currency_per_point: Decimal,

    /// Smallest number of points that may be converted at once.
    pub min_points_to_convert: u64,

    /// Whether conversion is offered at all.
    pub is_active: bool,
}

/// Points earned on an order that is still inside its return window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPoints {
    /// Points held.
    pub points: u64,

    /// When the points become spendable.
    pub unlocks_at: Timestamp,
}

impl PendingPoints {
    /// Whether the points are still held at `now`.
    pub fn is_locked(&self, now: Timestamp) -> bool {
        self.unlocks_at > now
    }
}

/// Points that may be spent or converted at `now`.
///
/// `total_points` includes pending points; any that are still locked are excluded.
pub fn convertible_points(total_points: u64, pending: &[PendingPoints], now: Timestamp) -> u64 {
    let locked = pending
        .iter()
        .filter(|entry| entry.is_locked(now))
        .fold(0_u64, |locked, entry| locked.saturating_add(entry.points));

    total_points.saturating_sub(locked)
}

/// A validated conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionQuote {
    /// Points to debit.
    pub points: u64,

    /// Wallet credit in minor units.
    pub amount: u64,
}

impl ConversionQuote {
    /// Validate a conversion of `selected` points.
    ///
    /// Runs entirely locally so that invalid requests never reach the backend.
    ///
    /// # Errors
    ///
    /// - [`LoyaltyError::ConversionDisabled`]: the rule is inactive.
    /// - [`LoyaltyError::BelowMinimumConversion`]: fewer points than the rule's minimum.
    /// - [`LoyaltyError::InsufficientPoints`]: more points than are convertible.
    /// - [`LoyaltyError::Pricing`]: the credit cannot be represented.
    pub fn new(
        selected: u64,
        convertible: u64,
        rule: &ConversionRule,
        currency: &Currency,
    ) -> Result<Self, LoyaltyError> {
        if !rule.is_active {
            return Err(LoyaltyError::ConversionDisabled);
        }

        if selected < rule.min_points_to_convert || selected == 0 {
            return Err(LoyaltyError::BelowMinimumConversion {
                minimum: rule.min_points_to_convert.max(1),
            });
        }

        if selected > convertible {
            return Err(LoyaltyError::InsufficientPoints {
                available: convertible,
            });
        }

        let credit = Decimal::from(selected)
            .checked_mul(rule.currency_per_point)
            .ok_or(PricingError::AmountOverflow)?;

        Ok(Self {
            points: selected,
            amount: pricing::to_minor(credit, currency)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    fn rule() -> ConversionRule {
        ConversionRule {
            currency_per_point: Decimal::new(5, 1),
            min_points_to_convert: 200,
            is_active: true,
        }
    }

    #[test]
    fn locked_pending_points_are_excluded() -> TestResult {
        let now = Timestamp::now();
        let pending = [
            PendingPoints {
                points: 120,
                unlocks_at: now.checked_add(72.hours())?,
            },
            PendingPoints {
                points: 80,
                unlocks_at: now.checked_sub(1.hour())?,
            },
        ];

        assert_eq!(convertible_points(1_000, &pending, now), 880);

        Ok(())
    }

    #[test]
    fn pending_points_unlock_at_expiry() {
        let now = Timestamp::now();
        let pending = [PendingPoints {
            points: 120,
            unlocks_at: now,
        }];

        assert_eq!(convertible_points(120, &pending, now), 120);
    }

    #[test]
    fn conversion_credits_points_times_rate() -> TestResult {
        let quote = ConversionQuote::new(300, 1_000, &rule(), iso::INR)?;

        assert_eq!(quote.points, 300);
        assert_eq!(quote.amount, 150_00);

        Ok(())
    }

    #[test]
    fn conversion_below_minimum_is_rejected() {
        assert_eq!(
            ConversionQuote::new(199, 1_000, &rule(), iso::INR),
            Err(LoyaltyError::BelowMinimumConversion { minimum: 200 })
        );
    }

    #[test]
    fn conversion_beyond_balance_is_rejected() {
        assert_eq!(
            ConversionQuote::new(500, 450, &rule(), iso::INR),
            Err(LoyaltyError::InsufficientPoints { available: 450 })
        );
    }

    #[test]
    fn inactive_rule_rejects_everything() {
        let rule = ConversionRule {
            is_active: false,
            ..rule()
        };

        assert_eq!(
            ConversionQuote::new(500, 1_000, &rule, iso::INR),
            Err(LoyaltyError::ConversionDisabled)
        );
    }
}
