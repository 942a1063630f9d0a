//! Coupons Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::{decode_amount, encode_amount},
    domain::{
        coupons::records::{CouponRecord, CouponUuid},
        orders::records::OrderUuid,
        users::UserUuid,
    },
};

const FIND_COUPON_BY_CODE_SQL: &str = include_str!("sql/find_coupon_by_code.sql");
const LOCK_COUPON_BY_CODE_SQL: &str = include_str!("sql/lock_coupon_by_code.sql");
const COUNT_USER_USAGE_SQL: &str = include_str!("sql/count_user_usage.sql");
const CREATE_USAGE_SQL: &str = include_str!("sql/create_usage.sql");
const INCREMENT_USED_COUNT_SQL: &str = include_str!("sql/increment_used_count.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCouponsRepository;

impl PgCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(FIND_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find a coupon and hold a row lock on it until the transaction ends.
    pub(crate) async fn lock_coupon(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Postgres, CouponRecord>(LOCK_COUPON_BY_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn count_user_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
    ) -> Result<u32, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_USAGE_SQL)
            .bind(coupon.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    pub(crate) async fn create_usage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
        user: UserUuid,
        order: OrderUuid,
        discount: u64,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_USAGE_SQL)
            .bind(coupon.into_uuid())
            .bind(user.into_uuid())
            .bind(order.into_uuid())
            .bind(encode_amount("discount", discount)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Count one more redemption. Returns `false` when the usage limit is already reached.
    pub(crate) async fn increment_used_count(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        coupon: CouponUuid,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(INCREMENT_USED_COUNT_SQL)
            .bind(coupon.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }
}

fn decode_limit(column: &str, value: Option<i32>) -> Result<Option<u32>, sqlx::Error> {
    value
        .map(|v| {
            u32::try_from(v).map_err(|e| sqlx::Error::ColumnDecode {
                index: column.to_string(),
                source: Box::new(e),
            })
        })
        .transpose()
}

fn decode_optional_amount(column: &str, value: Option<i64>) -> Result<Option<u64>, sqlx::Error> {
    value.map(|v| decode_amount(column, v)).transpose()
}

impl<'r> FromRow<'r, PgRow> for CouponRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CouponUuid::from_uuid(row.try_get("id")?),
            code: row.try_get("code")?,
            discount_type: row.try_get("discount_type")?,
            discount_percentage: row.try_get("discount_percentage")?,
            discount_amount: decode_optional_amount(
                "discount_amount",
                row.try_get("discount_amount")?,
            )?,
            max_discount: decode_optional_amount("max_discount", row.try_get("max_discount")?)?,
            min_order_amount: decode_optional_amount(
                "min_order_amount",
                row.try_get("min_order_amount")?,
            )?,
            valid_from: row
                .try_get::<Option<SqlxTimestamp>, _>("valid_from")?
                .map(SqlxTimestamp::to_jiff),
            valid_until: row
                .try_get::<Option<SqlxTimestamp>, _>("valid_until")?
                .map(SqlxTimestamp::to_jiff),
            usage_limit: decode_limit("usage_limit", row.try_get("usage_limit")?)?,
            per_user_limit: decode_limit("per_user_limit", row.try_get("per_user_limit")?)?,
            used_count: decode_limit("used_count", Some(row.try_get("used_count")?))?
                .unwrap_or_default(),
            is_active: row.try_get("is_active")?,
        })
    }
}
