//! Recommendations Repository

use larder::recommendations::PastOrder;
use sqlx::{Postgres, Row, Transaction, query};

use crate::domain::users::UserUuid;

const RECENT_ORDERS_SQL: &str = include_str!("sql/recent_orders.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRecommendationsRepository;

impl PgRecommendationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// The shopper's latest orders as product names, newest first.
    pub(crate) async fn recent_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        limit: u32,
    ) -> Result<Vec<PastOrder>, sqlx::Error> {
        query(RECENT_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(i64::from(limit))
            .fetch_all(&mut **tx)
            .await?
            .iter()
            .map(|row| -> Result<PastOrder, sqlx::Error> {
                Ok(PastOrder {
                    items: row.try_get("items")?,
                })
            })
            .collect()
    }
}
