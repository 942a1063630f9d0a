//! Wallet Handlers

use larder::wallet::WalletTransaction;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) mod get;
pub(crate) mod top_up;

/// Wallet Transaction Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WalletTransactionResponse {
    pub uuid: Uuid,

    /// Amount in minor units
    pub amount: u64,

    /// credit or debit
    pub direction: String,

    pub description: String,

    pub created_at: String,
}

impl From<WalletTransaction> for WalletTransactionResponse {
    fn from(transaction: WalletTransaction) -> Self {
        Self {
            uuid: transaction.id,
            amount: transaction.amount,
            direction: transaction.direction.to_string(),
            description: transaction.description,
            created_at: transaction.created_at.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use larder::wallet::{Direction, WalletTransaction};
    use uuid::Uuid;

    pub(super) fn make_credit(amount: u64, description: &str) -> WalletTransaction {
        WalletTransaction {
            id: Uuid::now_v7(),
            amount,
            direction: Direction::Credit,
            description: description.to_string(),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }
}
