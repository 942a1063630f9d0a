//! Coupons Service

use async_trait::async_trait;
use jiff::Timestamp;
use larder::coupons::{AppliedCoupon, Coupon, CouponRejection, evaluate_coupon};
use mockall::automock;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        coupons::{CouponsServiceError, repository::PgCouponsRepository},
        orders::records::OrderUuid,
        users::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponsService {
    db: Db,
    repository: PgCouponsRepository,
}

impl PgCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCouponsRepository::new(),
        }
    }
}

#[async_trait]
impl CouponsService for PgCouponsService {
    #[tracing::instrument(
        name = "coupons.service.apply_coupon",
        skip(self),
        fields(user_uuid = %user),
        err
    )]
    async fn apply_coupon(
        &self,
        user: UserUuid,
        code: String,
        order_total: u64,
    ) -> Result<AppliedCoupon, CouponsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let Some(record) = self.repository.find_coupon(&mut tx, &code).await? else {
            return Err(CouponRejection::NotFound.into());
        };

        let user_usage = self
            .repository
            .count_user_usage(&mut tx, record.uuid, user)
            .await?;

        tx.commit().await?;

        let coupon = Coupon::try_from(record)?;

        Ok(evaluate_coupon(
            Some(&coupon),
            order_total,
            Timestamp::now(),
            user_usage,
        )?)
    }

    #[tracing::instrument(
        name = "coupons.service.redeem_coupon",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn redeem_coupon(
        &self,
        user: UserUuid,
        code: String,
        order: OrderUuid,
        order_total: u64,
    ) -> Result<AppliedCoupon, CouponsServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let Some(record) = self.repository.lock_coupon(&mut tx, &code).await? else {
            return Err(CouponRejection::NotFound.into());
        };

        let coupon_uuid = record.uuid;

        let user_usage = self
            .repository
            .count_user_usage(&mut tx, coupon_uuid, user)
            .await?;

        let coupon = Coupon::try_from(record)?;
        let applied = evaluate_coupon(Some(&coupon), order_total, Timestamp::now(), user_usage)?;

        if !self
            .repository
            .increment_used_count(&mut tx, coupon_uuid)
            .await?
        {
            warn!(coupon_uuid = %coupon_uuid, "usage limit reached during redemption");

            return Err(CouponRejection::UsageLimitReached.into());
        }

        self.repository
            .create_usage(&mut tx, coupon_uuid, user, order, applied.discount)
            .await?;

        tx.commit().await?;

        info!(coupon_uuid = %coupon_uuid, discount = applied.discount, "redeemed coupon");

        Ok(applied)
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Validate a coupon code against an order total and compute its discount.
    ///
    /// Nothing is written; the coupon is only counted as used by [`Self::redeem_coupon`].
    async fn apply_coupon(
        &self,
        user: UserUuid,
        code: String,
        order_total: u64,
    ) -> Result<AppliedCoupon, CouponsServiceError>;

    /// Re-validate a coupon under a row lock and record its use against `order`.
    ///
    /// Usage limits hold under concurrent redemptions.
    async fn redeem_coupon(
        &self,
        user: UserUuid,
        code: String,
        order: OrderUuid,
        order_total: u64,
    ) -> Result<AppliedCoupon, CouponsServiceError>;
}
