//! Wallet Service

use async_trait::async_trait;
use larder::{
    pricing::store_currency,
    wallet::{PaymentMethod, RECENT_TRANSACTIONS, TopUpError, WalletTransaction, WalletView, minimum_top_up},
};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        users::UserUuid,
        wallet::{
            WalletServiceError, records::NewWalletTransaction, repository::PgWalletRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgWalletService {
    db: Db,
    repository: PgWalletRepository,
}

impl PgWalletService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgWalletRepository::new(),
        }
    }
}

#[async_trait]
impl WalletService for PgWalletService {
    #[tracing::instrument(
        name = "wallet.service.wallet",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn wallet(&self, user: UserUuid) -> Result<WalletView, WalletServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let balance = self.repository.balance(&mut tx, user).await?;

        let transactions = self
            .repository
            .recent_transactions(&mut tx, user, RECENT_TRANSACTIONS)
            .await?;

        tx.commit().await?;

        Ok(WalletView::new(
            balance,
            transactions.into_iter().map(WalletTransaction::from).collect(),
        ))
    }

    #[tracing::instrument(
        name = "wallet.service.add_funds",
        skip(self),
        fields(user_uuid = %user, method = %method),
        err
    )]
    async fn add_funds(
        &self,
        user: UserUuid,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<WalletTransaction, WalletServiceError> {
        let minimum = minimum_top_up(store_currency()).map_err(TopUpError::from)?;

        if amount < minimum {
            return Err(TopUpError::BelowMinimum { minimum }.into());
        }

        let mut tx = self.db.begin_user_transaction(user).await?;

        let balance = self.repository.credit(&mut tx, user, amount).await?;

        let record = self
            .repository
            .create_transaction(&mut tx, user, &NewWalletTransaction::top_up(amount, method))
            .await?;

        tx.commit().await?;

        info!(
            transaction_uuid = %record.uuid,
            amount,
            balance,
            "added funds to wallet"
        );

        Ok(record.into())
    }
}

#[automock]
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Balance plus the five most recent transactions.
    async fn wallet(&self, user: UserUuid) -> Result<WalletView, WalletServiceError>;

    /// Credit a completed (simulated) payment to the wallet.
    async fn add_funds(
        &self,
        user: UserUuid,
        amount: u64,
        method: PaymentMethod,
    ) -> Result<WalletTransaction, WalletServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn new_shoppers_have_an_empty_wallet() -> TestResult {
        let ctx = TestContext::new().await;

        let view = ctx.wallet.wallet(UserUuid::new()).await?;

        assert_eq!(view.balance, 0);
        assert!(view.recent.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn add_funds_credits_balance_and_records_transaction() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        ctx.wallet.add_funds(user, 500_00, PaymentMethod::Upi).await?;
        let transaction = ctx.wallet.add_funds(user, 250_00, PaymentMethod::Card).await?;

        let view = ctx.wallet.wallet(user).await?;

        assert_eq!(view.balance, 750_00);
        assert_eq!(view.recent.len(), 2);
        assert_eq!(view.recent.first().map(|tx| tx.id), Some(transaction.id));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a container runtime"]
    async fn amounts_below_minimum_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();

        let result = ctx.wallet.add_funds(user, 9_99, PaymentMethod::Upi).await;

        assert!(matches!(
            result,
            Err(WalletServiceError::Rejected(TopUpError::BelowMinimum {
                minimum: 10_00
            }))
        ));
        assert_eq!(ctx.wallet.wallet(user).await?.balance, 0);

        Ok(())
    }
}
