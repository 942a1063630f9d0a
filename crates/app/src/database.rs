//! Database connection management

use sqlx::{PgPool, Postgres, Transaction, query};

use crate::domain::users::UserUuid;

/// SQL used to expose the signed-in user to row-level security policies.
///
/// Policies read the subject the same way the hosted backend does, from
/// `request.jwt.claims ->> 'sub'`.
pub const SET_USER_CONTEXT_SQL: &str = "SELECT set_config('request.jwt.claims', $1, true)";

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a transaction with no user context, for public catalog reads.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction fails.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Begin a transaction scoped to `user` for RLS policies.
    ///
    /// # Errors
    ///
    /// Returns an error when starting the transaction or setting user context fails.
    pub async fn begin_user_transaction(
        &self,
        user: UserUuid,
    ) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let claims = serde_json::json!({ "sub": user.into_uuid(), "role": "authenticated" });

        query(SET_USER_CONTEXT_SQL)
            .bind(claims.to_string())
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Convert a stored `BIGINT` amount to minor units.
pub(crate) fn decode_amount(column: &str, value: i64) -> Result<u64, sqlx::Error> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert minor units to a `BIGINT` bind parameter.
pub(crate) fn encode_amount(column: &str, value: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(Box::new(ColumnOverflow {
        column: column.to_string(),
        source: e,
    })))
}

#[derive(Debug, thiserror::Error)]
#[error("value for `{column}` does not fit in a BIGINT")]
struct ColumnOverflow {
    column: String,
    #[source]
    source: std::num::TryFromIntError,
}
