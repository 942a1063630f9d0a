//! Loyalty tiers

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loyalty rank derived from lifetime points earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// From 0 points.
    Bronze,

    /// From 500 points.
    Silver,

    /// From 2000 points.
    Gold,

    /// From 5000 points.
    Platinum,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Lifetime points needed to reach this tier.
    pub fn threshold(self) -> u64 {
        match self {
            Tier::Bronze => 0,
            Tier::Silver => 500,
            Tier::Gold => 2_000,
            Tier::Platinum => 5_000,
        }
    }

    /// Highest tier whose threshold does not exceed `lifetime_earned`.
    pub fn for_lifetime_earned(lifetime_earned: u64) -> Self {
        Self::ALL
            .into_iter()
            .rev()
            .find(|tier| tier.threshold() <= lifetime_earned)
            .unwrap_or(Tier::Bronze)
    }

    /// The next tier up, `None` for platinum.
    pub fn next(self) -> Option<Self> {
        match self {
            Tier::Bronze => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => None,
        }
    }

    /// Lowercase name, as stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTier(s.to_string()))
    }
}

/// A tier name the backend sent that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown loyalty tier `{0}`")]
pub struct UnknownTier(pub String);

/// Where a shopper sits between their tier and the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierProgress {
    /// Current tier.
    pub tier: Tier,

    /// Next tier, if any.
    pub next: Option<Tier>,

    /// Percentage of the way to the next tier, in `0..=100`.
    pub percent: Decimal,

    /// Lifetime points still needed for the next tier.
    pub points_to_next: u64,
}

impl TierProgress {
    /// Progress of `lifetime_earned` within `tier`.
    pub fn new(tier: Tier, lifetime_earned: u64) -> Self {
        let Some(next) = tier.next() else {
            return Self {
                tier,
                next: None,
                percent: Decimal::ONE_HUNDRED,
                points_to_next: 0,
            };
        };

        let current = tier.threshold();
        let span = Decimal::from(next.threshold() - current);
        let earned = Decimal::from(lifetime_earned.saturating_sub(current));

        let percent = (earned / span * Decimal::ONE_HUNDRED)
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
            .round_dp(1);

        Self {
            tier,
            next: Some(next),
            percent,
            points_to_next: next.threshold().saturating_sub(lifetime_earned),
        }
    }
}
