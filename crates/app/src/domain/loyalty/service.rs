//! Loyalty Service

use async_trait::async_trait;
use jiff::Timestamp;
use larder::{
    loyalty::{ConversionQuote, LoyaltyError, RedemptionQuote, convertible_points},
    pricing::store_currency,
};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        loyalty::{
            LoyaltyServiceError,
            records::{ConversionReceipt, LoyaltySummary, RedemptionOffer},
            repository::PgLoyaltyRepository,
        },
        users::UserUuid,
        wallet::{records::NewWalletTransaction, repository::PgWalletRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgLoyaltyService {
    db: Db,
    repository: PgLoyaltyRepository,
    wallets: PgWalletRepository,
}

impl PgLoyaltyService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgLoyaltyRepository::new(),
            wallets: PgWalletRepository::new(),
        }
    }
}

#[async_trait]
impl LoyaltyService for PgLoyaltyService {
    #[tracing::instrument(
        name = "loyalty.service.summary",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn summary(&self, user: UserUuid) -> Result<LoyaltySummary, LoyaltyServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin_user_transaction(user).await?;

        let points = self.repository.points(&mut tx, user).await?;
        let pending = self.repository.locked_points(&mut tx, user, now).await?;

        tx.commit().await?;

        let available = convertible_points(points.total_points, &pending, now);

        Ok(LoyaltySummary::new(points, available, pending))
    }

    #[tracing::instrument(
        name = "loyalty.service.quote_redemption",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn quote_redemption(
        &self,
        user: UserUuid,
        order_total: u64,
    ) -> Result<RedemptionOffer, LoyaltyServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin_user_transaction(user).await?;

        let settings = self.repository.settings(&mut tx).await?;
        let points = self.repository.points(&mut tx, user).await?;
        let pending = self.repository.locked_points(&mut tx, user, now).await?;

        tx.commit().await?;

        let available = convertible_points(points.total_points, &pending, now);
        let quote = RedemptionQuote::new(available, order_total, &settings)?;

        let max_discount = if quote.eligible {
            quote.discount_for(quote.max_redeemable_points)?
        } else {
            0
        };

        Ok(RedemptionOffer {
            quote,
            max_discount,
        })
    }

    #[tracing::instrument(
        name = "loyalty.service.convert_to_wallet",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn convert_to_wallet(
        &self,
        user: UserUuid,
        points: u64,
    ) -> Result<ConversionReceipt, LoyaltyServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin_user_transaction(user).await?;

        let Some(rule) = self.repository.conversion_rule(&mut tx).await? else {
            return Err(LoyaltyError::ConversionDisabled.into());
        };

        let balance = self.repository.points(&mut tx, user).await?;
        let pending = self.repository.locked_points(&mut tx, user, now).await?;
        let convertible = convertible_points(balance.total_points, &pending, now);

        let quote = ConversionQuote::new(points, convertible, &rule, store_currency())?;

        if !self.repository.debit_points(&mut tx, user, quote.points).await? {
            warn!(points, convertible, "points were spent during conversion");

            return Err(LoyaltyError::InsufficientPoints {
                available: convertible,
            }
            .into());
        }

        self.repository
            .record_conversion(&mut tx, user, quote.points)
            .await?;

        let wallet_balance = self.wallets.credit(&mut tx, user, quote.amount).await?;

        self.wallets
            .create_transaction(
                &mut tx,
                user,
                &NewWalletTransaction::points_conversion(quote.amount, quote.points),
            )
            .await?;

        tx.commit().await?;

        info!(
            points = quote.points,
            amount = quote.amount,
            balance = wallet_balance,
            "converted points to wallet balance"
        );

        Ok(ConversionReceipt {
            points: quote.points,
            amount: quote.amount,
            balance: wallet_balance,
        })
    }
}

#[automock]
#[async_trait]
pub trait LoyaltyService: Send + Sync {
    /// Balance, tier, progress and pending points for the loyalty screen.
    async fn summary(&self, user: UserUuid) -> Result<LoyaltySummary, LoyaltyServiceError>;

    /// How many points may be redeemed against an order total in minor units.
    async fn quote_redemption(
        &self,
        user: UserUuid,
        order_total: u64,
    ) -> Result<RedemptionOffer, LoyaltyServiceError>;

    /// Turn `points` into wallet balance.
    ///
    /// Requests that fail the conversion rule are refused without writing anything.
    async fn convert_to_wallet(
        &self,
        user: UserUuid,
        points: u64,
    ) -> Result<ConversionReceipt, LoyaltyServiceError>;
}

#[cfg(test)]
mod tests {
    use larder::loyalty::Tier;
    use sqlx::query;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::wallet::WalletService,
        test::{TestContext, helpers},
    };

    async fn seed_conversion_rule(ctx: &TestContext, active: bool) -> TestResult {
        query(
            "INSERT INTO loyalty_rules (rule_type, currency_per_point, min_points_to_convert, is_active) \
             VALUES ('conversion', 0.5, 200, $1)",
        )
        .bind(active)
        .execute(ctx.db.pool())
        .await?;

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn summary_excludes_locked_points() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        helpers::seed_points(&ctx, user, 1_000, 2_400).await?;
        helpers::seed_pending_points(&ctx, user, 150).await?;

        let summary = ctx.loyalty.summary(user).await?;

        assert_eq!(summary.available_points, 850);
        assert_eq!(summary.tier, Tier::Gold);
        assert_eq!(summary.pending.len(), 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn conversion_moves_points_into_wallet() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        seed_conversion_rule(&ctx, true).await?;
        helpers::seed_points(&ctx, user, 1_000, 1_000).await?;

        let receipt = ctx.loyalty.convert_to_wallet(user, 400).await?;

        assert_eq!(receipt.amount, 200_00);
        assert_eq!(receipt.balance, 200_00);
        assert_eq!(ctx.loyalty.summary(user).await?.points.total_points, 600);
        assert_eq!(ctx.wallet.wallet(user).await?.balance, 200_00);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn conversion_below_minimum_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        seed_conversion_rule(&ctx, true).await?;
        helpers::seed_points(&ctx, user, 1_000, 1_000).await?;

        let result = ctx.loyalty.convert_to_wallet(user, 150).await;

        assert!(matches!(
            result,
            Err(LoyaltyServiceError::Rejected(
                LoyaltyError::BelowMinimumConversion { minimum: 200 }
            ))
        ));
        assert_eq!(ctx.loyalty.summary(user).await?.points.total_points, 1_000);
        assert_eq!(ctx.wallet.wallet(user).await?.balance, 0);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn conversion_without_rule_is_unavailable() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.loyalty.convert_to_wallet(UserUuid::new(), 500).await;

        assert!(matches!(
            result,
            Err(LoyaltyServiceError::Rejected(LoyaltyError::ConversionDisabled))
        ));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn redemption_is_capped_by_order_total() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        helpers::seed_points(&ctx, user, 5_000, 5_000).await?;

        // defaults: 10 paise per point, 20% cap
        let offer = ctx.loyalty.quote_redemption(user, 1_000_00).await?;

        assert_eq!(offer.quote.max_redeemable_points, 2_000);
        assert_eq!(offer.max_discount, 200_00);

        Ok(())
    }
}
