//! Loyalty Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use larder::loyalty::{ConversionRule, LoyaltyPoints, LoyaltySettings, PendingPoints, Tier};
use sqlx::{Postgres, Row, Transaction, postgres::PgRow, query};

use crate::{
    database::{decode_amount, encode_amount},
    domain::users::UserUuid,
};

const GET_POINTS_SQL: &str = include_str!("sql/get_points.sql");
const GET_SETTINGS_SQL: &str = include_str!("sql/get_settings.sql");
const GET_CONVERSION_RULE_SQL: &str = include_str!("sql/get_conversion_rule.sql");
const LIST_LOCKED_POINTS_SQL: &str = include_str!("sql/list_locked_points.sql");
const DEBIT_POINTS_SQL: &str = include_str!("sql/debit_points.sql");
const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");

/// Kind recorded on `loyalty_transactions` for points turned into wallet balance.
const CONVERTED: &str = "converted";

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLoyaltyRepository;

impl PgLoyaltyRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The shopper's balance; shoppers who never earned points get an empty one.
    pub(crate) async fn points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<LoyaltyPoints, sqlx::Error> {
        query(GET_POINTS_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?
            .map_or(Ok(LoyaltyPoints::new()), |row| decode_points(&row))
    }

    /// Store-wide settings, falling back to the defaults when none are configured.
    pub(crate) async fn settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<LoyaltySettings, sqlx::Error> {
        query(GET_SETTINGS_SQL)
            .fetch_optional(&mut **tx)
            .await?
            .map_or(Ok(LoyaltySettings::default()), |row| decode_settings(&row))
    }

    /// The current conversion rule, preferring an active one.
    pub(crate) async fn conversion_rule(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<ConversionRule>, sqlx::Error> {
        query(GET_CONVERSION_RULE_SQL)
            .fetch_optional(&mut **tx)
            .await?
            .map(|row| decode_rule(&row))
            .transpose()
    }

    /// Pending points that are still locked at `now`.
    pub(crate) async fn locked_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<Vec<PendingPoints>, sqlx::Error> {
        query(LIST_LOCKED_POINTS_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(decode_pending)
            .collect()
    }

    /// Spend `points` if that many are unlocked. Returns `false` otherwise.
    pub(crate) async fn debit_points(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        points: u64,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(DEBIT_POINTS_SQL)
            .bind(user.into_uuid())
            .bind(encode_amount("points", points)?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected == 1)
    }

    pub(crate) async fn record_conversion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        points: u64,
    ) -> Result<(), sqlx::Error> {
        let spent = encode_amount("points", points)?;

        query(CREATE_TRANSACTION_SQL)
            .bind(user.into_uuid())
            .bind(-spent)
            .bind(CONVERTED)
            .bind("Converted to wallet balance")
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

fn decode_points(row: &PgRow) -> Result<LoyaltyPoints, sqlx::Error> {
    let tier: String = row.try_get("tier")?;

    Ok(LoyaltyPoints {
        total_points: decode_amount("total_points", row.try_get("total_points")?)?,
        lifetime_earned: decode_amount("lifetime_earned", row.try_get("lifetime_earned")?)?,
        lifetime_spent: decode_amount("lifetime_spent", row.try_get("lifetime_spent")?)?,
        tier: tier.parse::<Tier>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "tier".to_string(),
            source: Box::new(e),
        })?,
    })
}

fn decode_settings(row: &PgRow) -> Result<LoyaltySettings, sqlx::Error> {
    Ok(LoyaltySettings {
        point_value: decode_amount("point_value", row.try_get("point_value")?)?,
        max_redeem_percentage: row.try_get("max_redeem_percentage")?,
        min_redeem_points: decode_amount("min_redeem_points", row.try_get("min_redeem_points")?)?,
        points_per_currency_unit: row.try_get("points_per_currency_unit")?,
    })
}

fn decode_rule(row: &PgRow) -> Result<ConversionRule, sqlx::Error> {
    Ok(ConversionRule {
        currency_per_point: row.try_get("currency_per_point")?,
        min_points_to_convert: decode_amount(
            "min_points_to_convert",
            row.try_get("min_points_to_convert")?,
        )?,
        is_active: row.try_get("is_active")?,
    })
}

fn decode_pending(row: &PgRow) -> Result<PendingPoints, sqlx::Error> {
    Ok(PendingPoints {
        points: decode_amount("points", row.try_get("points")?)?,
        unlocks_at: row.try_get::<SqlxTimestamp, _>("unlocks_at")?.to_jiff(),
    })
}
