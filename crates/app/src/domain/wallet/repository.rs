//! Wallet Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use larder::wallet::{Direction, PaymentMethod};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::{decode_amount, encode_amount},
    domain::{
        users::UserUuid,
        wallet::records::{NewWalletTransaction, WalletTransactionRecord, WalletTransactionUuid},
    },
};

const GET_BALANCE_SQL: &str = include_str!("sql/get_balance.sql");
const LIST_TRANSACTIONS_SQL: &str = include_str!("sql/list_transactions.sql");
const CREDIT_WALLET_SQL: &str = include_str!("sql/credit_wallet.sql");
const CREATE_TRANSACTION_SQL: &str = include_str!("sql/create_transaction.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgWalletRepository;

impl PgWalletRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Current balance. A shopper without a wallet row has a zero balance.
    pub(crate) async fn balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let balance: Option<i64> = query_scalar(GET_BALANCE_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        balance.map_or(Ok(0), |balance| decode_amount("balance", balance))
    }

    pub(crate) async fn recent_transactions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        limit: usize,
    ) -> Result<Vec<WalletTransactionRecord>, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(LIST_TRANSACTIONS_SQL)
            .bind(user.into_uuid())
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&mut **tx)
            .await
    }

    /// Add `amount` to the balance, creating the wallet on first credit. Returns the new balance.
    pub(crate) async fn credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        amount: u64,
    ) -> Result<u64, sqlx::Error> {
        let balance: i64 = query_scalar(CREDIT_WALLET_SQL)
            .bind(user.into_uuid())
            .bind(encode_amount("balance", amount)?)
            .fetch_one(&mut **tx)
            .await?;

        decode_amount("balance", balance)
    }

    pub(crate) async fn create_transaction(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        transaction: &NewWalletTransaction,
    ) -> Result<WalletTransactionRecord, sqlx::Error> {
        query_as::<Postgres, WalletTransactionRecord>(CREATE_TRANSACTION_SQL)
            .bind(user.into_uuid())
            .bind(encode_amount("amount", transaction.amount)?)
            .bind(transaction.direction.as_str())
            .bind(&transaction.description)
            .bind(transaction.payment_method.map(PaymentMethod::as_str))
            .fetch_one(&mut **tx)
            .await
    }
}

fn decode_direction(value: &str) -> Result<Direction, sqlx::Error> {
    match value {
        "credit" => Ok(Direction::Credit),
        "debit" => Ok(Direction::Debit),
        other => Err(sqlx::Error::ColumnDecode {
            index: "direction".to_string(),
            source: format!("unknown direction `{other}`").into(),
        }),
    }
}

impl<'r> FromRow<'r, PgRow> for WalletTransactionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let payment_method = row
            .try_get::<Option<String>, _>("payment_method")?
            .map(|method| method.parse::<PaymentMethod>())
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "payment_method".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: WalletTransactionUuid::from_uuid(row.try_get("id")?),
            amount: decode_amount("amount", row.try_get("amount")?)?,
            direction: decode_direction(row.try_get("direction")?)?,
            description: row.try_get("description")?,
            payment_method,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
