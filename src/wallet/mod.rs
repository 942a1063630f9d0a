//! Wallet
//!
//! The wallet balance is maintained by the backend; this module only shapes
//! what the shopper sees and validates top-up requests before they are sent.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod top_up;

pub use top_up::{PaymentMethod, TopUpDialog, TopUpError, TopUpRequest, TopUpStep, minimum_top_up};

/// Number of transactions shown alongside the balance.
pub const RECENT_TRANSACTIONS: usize = 5;

/// Direction of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Money into the wallet.
    Credit,

    /// Money out of the wallet.
    Debit,
}

impl Direction {
    /// Lowercase name, as stored by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Transaction identifier.
    pub id: Uuid,

    /// Amount in minor units.
    pub amount: u64,

    /// Credit or debit.
    pub direction: Direction,

    /// Human readable description.
    pub description: String,

    /// When the transaction was recorded.
    pub created_at: Timestamp,
}

/// Balance plus the latest transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletView {
    /// Authoritative balance in minor units.
    pub balance: u64,

    /// Most recent transactions, newest first.
    pub recent: Vec<WalletTransaction>,
}

impl WalletView {
    /// Build the view from a balance and any number of transactions.
    pub fn new(balance: u64, transactions: Vec<WalletTransaction>) -> Self {
        Self {
            balance,
            recent: recent_transactions(transactions, RECENT_TRANSACTIONS),
        }
    }
}

/// The `limit` newest transactions, newest first.
pub fn recent_transactions(
    mut transactions: Vec<WalletTransaction>,
    limit: usize,
) -> Vec<WalletTransaction> {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    transactions.truncate(limit);

    transactions
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use super::*;

    fn transaction(created_at: Timestamp, amount: u64) -> WalletTransaction {
        WalletTransaction {
            id: Uuid::now_v7(),
            amount,
            direction: Direction::Credit,
            description: "Wallet top-up".to_string(),
            created_at,
        }
    }

    #[test]
    fn view_keeps_five_newest_first() -> TestResult {
        let start = Timestamp::now();
        let transactions = (0..8_i64)
            .map(|hour| -> TestResult<_> {
                let amount = u64::try_from(hour)?;

                Ok(transaction(start.checked_add(hour.hours())?, amount))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let view = WalletView::new(500_00, transactions);

        let amounts: Vec<_> = view.recent.iter().map(|tx| tx.amount).collect();

        assert_eq!(amounts, vec![7, 6, 5, 4, 3]);

        Ok(())
    }

    #[test]
    fn fewer_transactions_than_limit_are_all_kept() {
        let view = WalletView::new(0, vec![transaction(Timestamp::now(), 10_00)]);

        assert_eq!(view.recent.len(), 1);
    }
}
