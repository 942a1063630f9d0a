//! Wallet Records

use jiff::Timestamp;
use larder::wallet::{Direction, PaymentMethod, WalletTransaction};

use crate::uuids::TypedUuid;

#[derive(Debug)]
pub struct WalletTransactionRow;

/// Wallet transaction UUID
pub type WalletTransactionUuid = TypedUuid<WalletTransactionRow>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletTransactionRecord {
    pub uuid: WalletTransactionUuid,
    pub amount: u64,
    pub direction: Direction,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: Timestamp,
}

impl From<WalletTransactionRecord> for WalletTransaction {
    fn from(record: WalletTransactionRecord) -> Self {
        Self {
            id: record.uuid.into_uuid(),
            amount: record.amount,
            direction: record.direction,
            description: record.description,
            created_at: record.created_at,
        }
    }
}

/// A wallet movement about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWalletTransaction {
    pub amount: u64,
    pub direction: Direction,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
}

impl NewWalletTransaction {
    /// A credit from a simulated payment.
    #[must_use]
    pub fn top_up(amount: u64, method: PaymentMethod) -> Self {
        Self {
            amount,
            direction: Direction::Credit,
            description: format!("Added via {}", method_label(method)),
            payment_method: Some(method),
        }
    }

    /// A credit from converted loyalty points.
    #[must_use]
    pub fn points_conversion(amount: u64, points: u64) -> Self {
        Self {
            amount,
            direction: Direction::Credit,
            description: format!("Converted {points} loyalty points"),
            payment_method: None,
        }
    }
}

fn method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Upi => "UPI",
        PaymentMethod::Card => "card",
        PaymentMethod::NetBanking => "net banking",
    }
}
